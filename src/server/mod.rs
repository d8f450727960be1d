use crate::core::errors::ToolError;
use crate::exchange::HyperliquidClient;
use crate::tools;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "hyperliquid-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// JSON-RPC 2.0 adapter over the tool dispatcher, speaking the MCP method
/// set (`initialize`, `tools/list`, `tools/call`).
///
/// One adapter serves any newline-delimited JSON transport; the bundled
/// binary wires it to stdio.
pub struct McpServer {
    client: Arc<HyperliquidClient>,
}

impl McpServer {
    pub fn new(client: Arc<HyperliquidClient>) -> Self {
        Self { client }
    }

    fn success(id: Value, result: Value) -> Value {
        json!({ "jsonrpc": "2.0", "id": id, "result": result })
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message.into() }
        })
    }

    /// Handle one JSON-RPC request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: Value) -> Option<Value> {
        let Some(body) = request.as_object() else {
            return Some(Self::error(
                Value::Null,
                INVALID_REQUEST,
                "Invalid Request: not a JSON object",
            ));
        };

        let id = body.get("id").cloned().unwrap_or(Value::Null);

        if body.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return Some(Self::error(
                id,
                INVALID_REQUEST,
                "Invalid Request: missing or invalid jsonrpc",
            ));
        }

        let Some(method) = body.get("method").and_then(Value::as_str) else {
            return Some(Self::error(
                id,
                INVALID_REQUEST,
                "Invalid Request: missing method",
            ));
        };

        let params = body.get("params").cloned().unwrap_or(Value::Null);
        debug!(method, "handling request");

        match method {
            "initialize" => Some(Self::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION }
                }),
            )),
            // Notification: no reply.
            "initialized" | "notifications/initialized" => None,
            "tools/list" => Some(Self::success(
                id,
                json!({ "tools": tools::all_tools() }),
            )),
            "tools/call" => Some(self.handle_tool_call(id, &params).await),
            _ => Some(Self::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            )),
        }
    }

    async fn handle_tool_call(&self, id: Value, params: &Value) -> Value {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Self::error(id, INVALID_PARAMS, "Invalid params: missing tool name");
        };

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        match tools::dispatch(&self.client, name, arguments).await {
            Ok(reply) => Self::success(id, json!({ "content": reply.content })),
            Err(ToolError::MethodNotFound(_)) => Self::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: tool '{name}' not available"),
            ),
            // Handler failures become a textual reply; a fault in one tool
            // call never takes the server down.
            Err(e) => {
                warn!(tool = name, error = %e, "tool call failed");
                Self::success(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": format!("Error: {e}") }],
                        "isError": true
                    }),
                )
            }
        }
    }

    /// Serve newline-delimited JSON-RPC over stdin/stdout until EOF.
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Value>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(_) => Some(Self::error(
                    Value::Null,
                    PARSE_ERROR,
                    "Parse error: invalid JSON",
                )),
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                stdout.write_all(&out).await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }
}
