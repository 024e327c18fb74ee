//! The weather tool set exposed to MCP hosts.

use mcp::{Tool, ToolError, ToolHandler};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::client::{AccuWeather, FORECAST_DAYS};
use crate::fetch::{Fetch, HttpFetcher};
use crate::summary::{Coordinates, NO_LOCATION_FOUND, NO_WEATHER_DATA};
use crate::Result;

pub const GET_LOCATION_BY_COORDINATES: &str = "get_location_by_coordinates";
pub const SEARCH_LOCATION: &str = "search_location";
pub const GET_CURRENT_WEATHER: &str = "get_current_weather";
pub const GET_FORECAST: &str = "get_forecast";

#[derive(Debug, Deserialize)]
struct CoordinatesArgs {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct LocationKeyArgs {
    location_key: String,
}

#[derive(Debug, Deserialize)]
struct ForecastArgs {
    location_key: String,
    #[serde(default = "default_days")]
    days: i64,
}

fn default_days() -> i64 {
    FORECAST_DAYS
}

/// Location and weather tools backed by AccuWeather.
///
/// Each method returns the plain-text summary handed back to the host.
/// Empty upstream answers are successful results with a fixed message.
pub struct WeatherTools<F = HttpFetcher> {
    client: AccuWeather<F>,
    tools: Vec<Tool>,
}

impl<F: Fetch> WeatherTools<F> {
    pub fn new(client: AccuWeather<F>) -> Self {
        Self {
            client,
            tools: tool_definitions(),
        }
    }

    pub async fn get_location_by_coordinates(&self, latitude: f64, longitude: f64) -> Result<String> {
        let summary = self
            .client
            .locate_by_coordinates(Coordinates::new(latitude, longitude))
            .await?;
        Ok(summary.located())
    }

    pub async fn search_location(&self, query: &str) -> Result<String> {
        Ok(match self.client.search_location(query).await? {
            Some(summary) => summary.found(),
            None => NO_LOCATION_FOUND.to_string(),
        })
    }

    pub async fn get_current_weather(&self, location_key: &str) -> Result<String> {
        Ok(match self.client.current_conditions(location_key).await? {
            Some(summary) => summary.to_string(),
            None => NO_WEATHER_DATA.to_string(),
        })
    }

    pub async fn get_forecast(&self, location_key: &str, days: i64) -> Result<String> {
        let summary = self.client.forecast(location_key, days).await?;
        Ok(summary.to_string())
    }
}

impl<F: Fetch + 'static> ToolHandler for WeatherTools<F> {
    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, name: &str, arguments: Value) -> std::result::Result<String, ToolError> {
        let result = match name {
            GET_LOCATION_BY_COORDINATES => {
                let args: CoordinatesArgs = parse_args(arguments)?;
                self.get_location_by_coordinates(args.latitude, args.longitude)
                    .await
            }
            SEARCH_LOCATION => {
                let args: SearchArgs = parse_args(arguments)?;
                self.search_location(&args.query).await
            }
            GET_CURRENT_WEATHER => {
                let args: LocationKeyArgs = parse_args(arguments)?;
                self.get_current_weather(&args.location_key).await
            }
            GET_FORECAST => {
                let args: ForecastArgs = parse_args(arguments)?;
                self.get_forecast(&args.location_key, args.days).await
            }
            other => return Err(ToolError::NotFound(other.to_string())),
        };

        result.map_err(|e| ToolError::Execution(e.to_string()))
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> std::result::Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            GET_LOCATION_BY_COORDINATES,
            "Get location information (city name, location key) from latitude and longitude. \
             Useful for reverse geocoding a position before asking for weather.",
            json!({
                "type": "object",
                "properties": {
                    "latitude": {"type": "number", "description": "Latitude in decimal degrees"},
                    "longitude": {"type": "number", "description": "Longitude in decimal degrees"}
                },
                "required": ["latitude", "longitude"]
            }),
        ),
        Tool::new(
            SEARCH_LOCATION,
            "Search for a location by name (city name) to get its location key. \
             Useful for finding the key needed by the weather tools.",
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "City name to search for"}
                },
                "required": ["query"]
            }),
        ),
        Tool::new(
            GET_CURRENT_WEATHER,
            "Get current weather conditions for a specific location key.",
            json!({
                "type": "object",
                "properties": {
                    "location_key": {"type": "string", "description": "Location key from a location lookup"}
                },
                "required": ["location_key"]
            }),
        ),
        Tool::new(
            GET_FORECAST,
            "Get the weather forecast for the next days (default 5).",
            json!({
                "type": "object",
                "properties": {
                    "location_key": {"type": "string", "description": "Location key from a location lookup"},
                    "days": {
                        "type": "integer",
                        "description": "Number of days; currently always a 5-day forecast",
                        "default": FORECAST_DAYS
                    }
                },
                "required": ["location_key"]
            }),
        ),
    ]
}
