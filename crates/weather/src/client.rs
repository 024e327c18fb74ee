//! AccuWeather lookups: one GET per call, typed summaries out.

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::fetch::{Fetch, HttpFetcher};
use crate::summary::{Coordinates, ConditionSummary, ForecastSummary, LocationSummary};
use crate::types::{DailyForecastResponse, Location, Observation};
use crate::{Error, Result};

/// Length of the only forecast window requested upstream.
pub const FORECAST_DAYS: i64 = 5;

/// AccuWeather API client.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent lookups.
#[derive(Debug, Clone)]
pub struct AccuWeather<F = HttpFetcher> {
    endpoint: Endpoint,
    fetcher: F,
}

impl AccuWeather<HttpFetcher> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_fetcher(endpoint, HttpFetcher)
    }
}

impl<F: Fetch> AccuWeather<F> {
    /// Use a custom fetcher (e.g. a recording fake in tests).
    pub fn with_fetcher(endpoint: Endpoint, fetcher: F) -> Self {
        Self { endpoint, fetcher }
    }

    /// Reverse geocode a coordinate pair to its city.
    pub async fn locate_by_coordinates(&self, coordinates: Coordinates) -> Result<LocationSummary> {
        let q = coordinates.query();
        let url = self.endpoint.url(
            &["locations", "v1", "cities", "geoposition", "search"],
            &[("q", q.as_str())],
        )?;
        let location: Location = self.get_json(url).await?;
        Ok(location.into())
    }

    /// Search cities by free text and keep the first candidate.
    ///
    /// Returns `None` when the upstream has no candidates.
    pub async fn search_location(&self, query: &str) -> Result<Option<LocationSummary>> {
        let url = self
            .endpoint
            .url(&["locations", "v1", "cities", "search"], &[("q", query)])?;
        let candidates: Vec<Location> = self.get_json(url).await?;
        debug!(candidates = candidates.len(), "city search answered");
        Ok(candidates.into_iter().next().map(LocationSummary::from))
    }

    /// Current conditions for a location key.
    ///
    /// Returns `None` when the upstream has no observation.
    pub async fn current_conditions(&self, location_key: &str) -> Result<Option<ConditionSummary>> {
        let url = self
            .endpoint
            .url(&["currentconditions", "v1", location_key], &[])?;
        let observations: Vec<Observation> = self.get_json(url).await?;
        Ok(observations.into_iter().next().map(ConditionSummary::from))
    }

    /// Daily forecast for a location key, temperatures in Celsius.
    ///
    /// `days` is accepted for callers but the five-day endpoint is always used.
    pub async fn forecast(&self, location_key: &str, days: i64) -> Result<ForecastSummary> {
        if days != FORECAST_DAYS {
            warn!(days, "only the {FORECAST_DAYS}-day forecast is available, ignoring days");
        }
        let url = self.endpoint.url(
            &["forecasts", "v1", "daily", "5day", location_key],
            &[("metric", "true")],
        )?;
        let response: DailyForecastResponse = self.get_json(url).await?;
        Ok(response.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.fetcher.get(url).await?;
        serde_json::from_str(&body).map_err(|e| Error::UpstreamParse(e.to_string()))
    }
}
