//! MCP (Model Context Protocol) server library.
//!
//! This crate provides a minimal server that exposes tools to an MCP host
//! over stdio, one JSON-RPC message per line.
//!
//! # Example
//!
//! ```no_run
//! use mcp::{Server, Tool, ToolError, ToolHandler};
//! use serde_json::{Value, json};
//!
//! struct Greeter {
//!     tools: Vec<Tool>,
//! }
//!
//! impl ToolHandler for Greeter {
//!     fn tools(&self) -> &[Tool] {
//!         &self.tools
//!     }
//!
//!     async fn call(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
//!         match name {
//!             "greet" => Ok(format!("Hello, {}!", arguments["name"])),
//!             other => Err(ToolError::NotFound(other.to_string())),
//!         }
//!     }
//! }
//!
//! # async fn example() -> mcp::Result<()> {
//! let greeter = Greeter {
//!     tools: vec![Tool::new("greet", "Say hello", json!({"type": "object"}))],
//! };
//!
//! Server::new("greeter", "0.1.0", greeter).serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod handler;
mod protocol;
mod server;

pub use error::{Error, Result, ToolError};
pub use handler::ToolHandler;
pub use protocol::{
    CallToolParams, CallToolResult, ClientInfo, InitializeParams, InitializeResult, JSONRPC_VERSION,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, LATEST_PROTOCOL_VERSION, ListToolsResult, RequestId,
    ServerCapabilities, ServerInfo, Tool, ToolContent, ToolsCapability,
};
pub use server::{MAX_MESSAGE_SIZE, Server};
