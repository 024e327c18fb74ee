//! Tool handler trait.

use crate::error::ToolError;
use crate::protocol::Tool;
use serde_json::Value;
use std::future::Future;

/// Trait for the tools a server exposes.
///
/// Implementations advertise tool definitions and execute calls by name. The
/// server holds the handler in an `Arc` and may run several calls at once.
pub trait ToolHandler: Send + Sync + 'static {
    /// Tool definitions returned by `tools/list`.
    fn tools(&self) -> &[Tool];

    /// Execute a tool call, returning its text output.
    fn call(
        &self,
        name: &str,
        arguments: Value,
    ) -> impl Future<Output = Result<String, ToolError>> + Send;
}
