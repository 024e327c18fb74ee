//! MCP server loop (read requests, dispatch, write responses).

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result, ToolError};
use crate::handler::ToolHandler;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, LATEST_PROTOCOL_VERSION, ListToolsResult,
    RequestId, ServerCapabilities, ServerInfo, ToolsCapability,
};

/// Maximum size of a single incoming message (1MB).
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Responses queued for the writer before request tasks start waiting.
const WRITE_QUEUE_DEPTH: usize = 64;

/// An MCP server speaking newline-delimited JSON-RPC.
pub struct Server<H> {
    info: ServerInfo,
    instructions: Option<String>,
    handler: H,
}

impl<H: ToolHandler> Server<H> {
    /// Create a server that exposes the handler's tools.
    pub fn new(name: impl Into<String>, version: impl Into<String>, handler: H) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                version: version.into(),
            },
            instructions: None,
            handler,
        }
    }

    /// Usage hints sent to the client in the initialize result.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Serve over the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Each request runs in its own task. Returns once the reader reaches EOF
    /// and every in-flight response has been written.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let server = Arc::new(self);
        let (tx, rx) = mpsc::channel::<String>(WRITE_QUEUE_DEPTH);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.len() > MAX_MESSAGE_SIZE {
                warn!(size = line.len(), max = MAX_MESSAGE_SIZE, "rejecting oversized message");
                let response = JsonRpcResponse::failure(
                    None,
                    JsonRpcError::invalid_request(format!(
                        "message too large: {} bytes (max {MAX_MESSAGE_SIZE})",
                        line.len()
                    )),
                );
                send(&tx, &response).await?;
                continue;
            }

            let request = match parse_request(line) {
                Ok(request) => request,
                Err((id, error)) => {
                    warn!(%error, "rejecting incoming message");
                    send(&tx, &JsonRpcResponse::failure(id, error)).await?;
                    continue;
                }
            };

            if request.is_notification() {
                server.handle_notification(&request);
                continue;
            }

            let server = Arc::clone(&server);
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = server.handle_request(request).await;
                if let Err(e) = send(&tx, &response).await {
                    error!(error = %e, "failed to queue response");
                }
            });
        }

        debug!("input closed, draining pending responses");
        drop(tx);
        writer_task.await.map_err(|_| Error::WriterClosed)??;
        Ok(())
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("client finished initialization"),
            method => debug!(method, "ignoring notification"),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, id = ?request.id, "handling request");
        let result = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => to_value(&ListToolsResult {
                tools: self.handler.tools().to_vec(),
            }),
            "tools/call" => self.call_tool(request.params).await,
            method => Err(JsonRpcError::method_not_found(method)),
        };
        JsonRpcResponse::from_result(request.id, result)
    }

    fn initialize(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(params) => serde_json::from_value(params)
                .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?,
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = ?client.version, "client connected");
        }

        let protocol_version = params
            .protocol_version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| LATEST_PROTOCOL_VERSION.to_string());

        to_value(&InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
            },
            server_info: self.info.clone(),
            instructions: self.instructions.clone(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("missing params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
            })?;

        let arguments = params
            .arguments
            .unwrap_or_else(|| Value::Object(Default::default()));

        let result = match self.handler.call(&params.name, arguments).await {
            Ok(text) => CallToolResult::text(text),
            Err(ToolError::Execution(message)) => {
                warn!(tool = %params.name, error = %message, "tool call failed");
                CallToolResult::error(message)
            }
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidInput(_))) => {
                return Err(JsonRpcError::invalid_params(e.to_string()));
            }
        };

        to_value(&result)
    }
}

/// Parse one line into a request.
///
/// Invalid JSON is a parse error with a null id. Valid JSON that is not a
/// JSON-RPC 2.0 request is an invalid request, answered with its id when one
/// can be recovered.
fn parse_request(
    line: &str,
) -> std::result::Result<JsonRpcRequest, (Option<RequestId>, JsonRpcError)> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| (None, JsonRpcError::parse_error(e.to_string())))?;

    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| (id.clone(), JsonRpcError::invalid_request(e.to_string())))?;

    if request.jsonrpc != JSONRPC_VERSION {
        let message = format!("unsupported jsonrpc version: {}", request.jsonrpc);
        return Err((id, JsonRpcError::invalid_request(message)));
    }

    Ok(request)
}

fn to_value(value: &impl Serialize) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal(e.to_string()))
}

async fn send(tx: &mpsc::Sender<String>, response: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(response)?;
    tx.send(json).await.map_err(|_| Error::WriterClosed)
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<String>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(json) = rx.recv().await {
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Tool;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::io::AsyncReadExt;

    struct EchoTools {
        tools: Vec<Tool>,
    }

    impl EchoTools {
        fn new() -> Self {
            Self {
                tools: vec![
                    Tool::new(
                        "echo",
                        "Echo the text back",
                        json!({"type": "object", "properties": {"text": {"type": "string"}}}),
                    ),
                    Tool::new("fail", "Always fails", json!({"type": "object"})),
                ],
            }
        }
    }

    impl ToolHandler for EchoTools {
        fn tools(&self) -> &[Tool] {
            &self.tools
        }

        async fn call(&self, name: &str, arguments: Value) -> std::result::Result<String, ToolError> {
            match name {
                "echo" => arguments["text"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| ToolError::InvalidInput("missing text".into())),
                "fail" => Err(ToolError::Execution("upstream returned HTTP 500".into())),
                other => Err(ToolError::NotFound(other.to_string())),
            }
        }
    }

    /// Feed `input` to a fresh server and collect responses keyed by id.
    async fn run(input: &str) -> HashMap<String, Value> {
        let (out_writer, mut out_reader) = tokio::io::duplex(MAX_MESSAGE_SIZE);
        let server = Server::new("test", "0.0.0", EchoTools::new());
        server.serve(input.as_bytes(), out_writer).await.unwrap();

        let mut output = String::new();
        out_reader.read_to_string(&mut output).await.unwrap();
        output
            .lines()
            .map(|line| {
                let value: Value = serde_json::from_str(line).unwrap();
                (value["id"].to_string(), value)
            })
            .collect()
    }

    #[tokio::test]
    async fn initialize_advertises_tools() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"host"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
        ))
        .await;

        assert_eq!(responses.len(), 1);
        let result = &responses["1"]["result"];
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], "test");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn initialize_without_version_uses_latest() {
        let responses = run("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\n").await;
        assert_eq!(
            responses["1"]["result"]["protocolVersion"],
            LATEST_PROTOCOL_VERSION
        );
    }

    #[tokio::test]
    async fn lists_tools() {
        let responses = run("{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n").await;
        let tools = responses["2"]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "echo");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn call_tool_returns_text() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"echo","arguments":{"text":"hi"}}}"#,
            "\n"
        ))
        .await;
        let result = &responses["\"a\""]["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "hi");
    }

    #[tokio::test]
    async fn failed_tool_sets_is_error() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"fail"}}"#,
            "\n"
        ))
        .await;
        let result = &responses["3"]["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "upstream returned HTTP 500");
    }

    #[tokio::test]
    async fn unknown_tool_and_bad_arguments_are_invalid_params() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"nope"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"echo","arguments":{}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call"}"#,
            "\n",
        ))
        .await;
        for id in ["4", "5", "6"] {
            assert_eq!(responses[id]["error"]["code"], JsonRpcError::INVALID_PARAMS, "id {id}");
        }
    }

    #[tokio::test]
    async fn unknown_method_is_reported() {
        let responses =
            run("{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"resources/list\"}\n").await;
        assert_eq!(
            responses["7"]["error"]["code"],
            JsonRpcError::METHOD_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn malformed_json_gets_parse_error() {
        let responses = run("{not json\n\n{\"jsonrpc\":\"2.0\",\"id\":8,\"method\":\"ping\"}\n").await;
        assert_eq!(responses["null"]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(responses["8"]["result"], json!({}));
    }

    #[tokio::test]
    async fn non_request_json_is_invalid_request() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":9}"#,
            "\n",
            r#"{"jsonrpc":"1.0","id":10,"method":"ping"}"#,
            "\n",
            r#"[1,2]"#,
            "\n",
        ))
        .await;
        assert_eq!(responses.len(), 3);
        for id in ["9", "10", "null"] {
            assert_eq!(responses[id]["error"]["code"], JsonRpcError::INVALID_REQUEST, "id {id}");
        }
    }

    #[tokio::test]
    async fn null_id_request_is_answered() {
        let responses = run("{\"jsonrpc\":\"2.0\",\"id\":null,\"method\":\"ping\"}\n").await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses["null"]["result"], json!({}));
    }
}
