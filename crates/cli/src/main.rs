mod config;
mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use mcp::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather::{AccuWeather, WeatherTools};

use config::{Config, env_with_dotenv, read_dotenv};
use error::Result;

const CONFIG_FILE: &str = "weather-mcp.toml";
const DOTENV_FILE: &str = ".env";
const SERVER_NAME: &str = "Weather";
const INSTRUCTIONS: &str = "Look up a location key with search_location or \
get_location_by_coordinates, then pass it to get_current_weather or get_forecast.";

#[derive(Parser)]
#[command(name = "weather-mcp")]
#[command(about = "MCP server for AccuWeather location and forecast lookups", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./weather-mcp.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };
    // A pending blocking stdin read would otherwise keep the runtime alive.
    std::process::exit(code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries protocol frames; everything human-facing goes to stderr.
    eprintln!("Starting MCP Weather server v{}...", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log.level);

    let endpoint = config.endpoint()?;
    info!(base_url = %endpoint.base_url(), "upstream configured");

    let tools = WeatherTools::new(AccuWeather::new(endpoint));
    let server = Server::new(SERVER_NAME, env!("CARGO_PKG_VERSION"), tools)
        .with_instructions(INSTRUCTIONS);

    tokio::select! {
        result = server.serve_stdio() => {
            result?;
            info!("stdin closed, exiting");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, exiting");
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None if Path::new(CONFIG_FILE).exists() => Config::load(CONFIG_FILE)?,
        None => Config::default(),
    };
    let dotenv = read_dotenv(DOTENV_FILE)?;
    config.apply_env(env_with_dotenv(|name| std::env::var(name).ok(), &dotenv));
    Ok(config)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
