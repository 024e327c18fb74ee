//! Upstream endpoint configuration and request URL construction.

use reqwest::Url;

use crate::{Error, Result};

/// AccuWeather's public API origin.
pub const DEFAULT_BASE_URL: &str = "https://dataservice.accuweather.com";

/// Where and as whom to call the upstream API.
///
/// Built once at startup and never mutated; every lookup borrows it.
#[derive(Clone)]
pub struct Endpoint {
    base_url: Url,
    api_key: String,
}

impl Endpoint {
    /// Validate and build an endpoint.
    ///
    /// The base URL must be `http` or `https`. It may carry a path prefix,
    /// which is kept in front of every API path.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("API key is empty".into()));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base URL must be http or https, got {}",
                base_url.scheme()
            )));
        }

        Ok(Self { base_url, api_key })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request URL from path segments and extra query pairs.
    ///
    /// Segments are percent-encoded individually, so an opaque location key
    /// cannot escape its path position. `apikey` is always the first pair.
    pub(crate) fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .extend_pairs(query);
        Ok(url)
    }
}

// The key never appears in logs or debug output.
impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}
