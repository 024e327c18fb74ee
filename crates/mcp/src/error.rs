//! MCP error types.

use thiserror::Error;

/// Errors that stop the server loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("response writer stopped unexpectedly")]
    WriterClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors a tool handler reports back for a single `tools/call`.
///
/// `NotFound` and `InvalidInput` are protocol-level mistakes by the caller and
/// become JSON-RPC errors. `Execution` is a failure of the tool itself and is
/// returned as a tool result with `isError` set.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Execution(String),
}
