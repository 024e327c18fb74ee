use thiserror::Error;

/// Errors from weather lookups.
///
/// An upstream answer with no matches is not an error; lookups report it as
/// an empty result instead.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The upstream API answered with a non-2xx status.
    #[error("upstream returned HTTP {status}: {detail}")]
    UpstreamHttp { status: u16, detail: String },

    /// The upstream body was not JSON, or not the expected shape.
    #[error("failed to parse upstream response: {0}")]
    UpstreamParse(String),

    /// The request never produced a status (connect, TLS, redirect loop).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint configuration is unusable.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of an upstream rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
