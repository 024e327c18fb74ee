//! HTTP GET seam between lookups and the network.

use std::future::Future;

use reqwest::Url;
use reqwest::redirect::Policy;
use tracing::{debug, warn};

use crate::{Error, Result};

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = concat!("weather-mcp/", env!("CARGO_PKG_VERSION"));

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Longest slice of an error body kept for diagnostics.
const MAX_ERROR_DETAIL: usize = 200;

/// Issues a single GET and returns the response body.
///
/// Implementations must report a non-2xx status as [`Error::UpstreamHttp`].
pub trait Fetch: Send + Sync {
    fn get(&self, url: Url) -> impl Future<Output = Result<String>> + Send;
}

/// Fetcher backed by a fresh `reqwest::Client` per request.
///
/// The client lives only for the duration of one `get`, so nothing outlives
/// the call whether it succeeds or fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl Fetch for HttpFetcher {
    async fn get(&self, url: Url) -> Result<String> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        // The query carries the API key; log the path only.
        let path = url.path().to_string();
        debug!(%path, "GET upstream");

        let response = client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("no details").to_string()
            } else {
                body.trim().chars().take(MAX_ERROR_DETAIL).collect()
            };
            warn!(%path, status = status.as_u16(), "upstream rejected request");
            return Err(Error::UpstreamHttp {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .text()
            .await
            .map_err(|e| Error::Network(e.without_url().to_string()))
    }
}
