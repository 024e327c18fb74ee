//! AccuWeather lookups exposed as MCP tools.
//!
//! Four stateless tools, each a single GET against the upstream API:
//!
//! - `get_location_by_coordinates`: reverse geocode a latitude/longitude.
//! - `search_location`: forward geocode a city name, best match only.
//! - `get_current_weather`: current conditions for a location key.
//! - `get_forecast`: five-day outlook with headline.
//!
//! Every tool returns one plain-text summary. Fields missing upstream are
//! rendered as [`PLACEHOLDER`]; an empty search or observation list is a
//! normal result with a fixed message, while HTTP and parse failures are
//! errors.
//!
//! # Example
//!
//! ```no_run
//! use weather::{AccuWeather, Endpoint, WeatherTools};
//!
//! # async fn example() -> weather::Result<()> {
//! let endpoint = Endpoint::new(weather::DEFAULT_BASE_URL, "your-api-key")?;
//! let tools = WeatherTools::new(AccuWeather::new(endpoint));
//!
//! let found = tools.search_location("Jakarta").await?;
//! println!("{found}");
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoint;
mod error;
mod fetch;
mod summary;
mod tools;
mod types;

#[cfg(test)]
mod testing;

pub use client::{AccuWeather, FORECAST_DAYS};
pub use endpoint::{DEFAULT_BASE_URL, Endpoint};
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher, MAX_REDIRECTS, USER_AGENT};
pub use summary::{
    ConditionSummary, Coordinates, DailySummary, ForecastSummary, LocationSummary, NO_HEADLINE,
    NO_LOCATION_FOUND, NO_WEATHER_DATA, PLACEHOLDER, date_part,
};
pub use tools::{
    GET_CURRENT_WEATHER, GET_FORECAST, GET_LOCATION_BY_COORDINATES, SEARCH_LOCATION, WeatherTools,
};
