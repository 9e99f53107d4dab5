//! MCP server over stdio.
//!
//! Messages are newline-delimited JSON-RPC 2.0, one per line. The loop
//! handles one message at a time: a tool call is awaited to completion
//! before the next line is read. stdout carries protocol frames only;
//! all logging goes to stderr.

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::dispatcher::Dispatcher;
use super::protocol::*;

pub struct McpServer {
    name: String,
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(name: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    /// Reads messages until EOF, writing one response line per request.
    ///
    /// Lines are read as raw bytes: a line that is not valid UTF-8 or
    /// not valid JSON gets a parse error and the loop carries on.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut frame = serde_json::to_vec(&response)?;
                frame.push(b'\n');
                writer.write_all(&frame).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handles one raw line. Returns `None` for notifications.
    pub async fn handle_message(&self, line: impl AsRef<[u8]>) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(line.as_ref()) {
            Ok(value) => value,
            Err(e) => {
                warn!("Invalid JSON on input: {e}");
                return Some(JsonRpcResponse::error(
                    JsonRpcId::Null,
                    JsonRpcError::parse_error(format!("Invalid JSON: {e}")),
                ));
            }
        };

        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok())
            .unwrap_or(JsonRpcId::Null);

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Invalid JSON-RPC message: {e}");
                Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {e}")),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }
        let id = request.id.unwrap_or(JsonRpcId::Null);

        debug!("MCP request: {}", request.method);

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            other => {
                warn!("Unknown MCP method: {other}");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(other))
            }
        };

        Some(response)
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => info!("MCP client initialized"),
            other => debug!("Ignoring notification: {other}"),
        }
    }

    fn handle_initialize(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        if let Some(client) = &params.client_info {
            info!(
                "MCP client: {} {} (protocol {})",
                client.name,
                client.version,
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        respond(id, &result)
    }

    fn handle_tools_list(&self, id: JsonRpcId) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: self.dispatcher.catalog().declarations(),
        };
        respond(id, &result)
    }

    async fn handle_tools_call(&self, id: JsonRpcId, params: Option<Value>) -> JsonRpcResponse {
        let params = match params.map(serde_json::from_value::<CallToolParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tools/call params: {e}")),
                )
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing tools/call params"),
                )
            }
        };

        info!("Tool call: {}", params.name);
        let result = self.dispatcher.dispatch(&params.name, params.arguments).await;
        respond(id, &result)
    }
}

fn respond<T: Serialize>(id: JsonRpcId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            JsonRpcError::internal_error(format!("Failed to serialize result: {e}")),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::registry::RegistryClient;
    use crate::tools::ToolCatalog;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_for(base_url: &str) -> McpServer {
        let registry = RegistryClient::new(&RegistryConfig {
            base_url: base_url.to_string(),
            ..RegistryConfig::default()
        })
        .unwrap();
        McpServer::new(
            "ardf-mcp-server",
            Dispatcher::new(ToolCatalog::new(Arc::new(registry))),
        )
    }

    fn test_server() -> McpServer {
        server_for("http://127.0.0.1:3001")
    }

    async fn call(server: &McpServer, message: Value) -> Value {
        let response = server
            .handle_message(&message.to_string())
            .await
            .expect("expected a response");
        serde_json::to_value(response).unwrap()
    }

    // ── message handling ────────────────────────────────

    #[tokio::test]
    async fn test_initialize() {
        let server = test_server();
        let response = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "claude-desktop", "version": "1.0"}
                }
            }),
        )
        .await;
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "ardf-mcp-server");
        assert_eq!(response["result"]["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialize_without_params() {
        let server = test_server();
        let response = call(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "initialize"})).await;
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let server = test_server();
        let response = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_null_id_request_gets_response() {
        let server = test_server();
        let response = call(&server, json!({"jsonrpc": "2.0", "id": null, "method": "ping"})).await;
        assert!(response["id"].is_null());
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = test_server();
        let response = call(&server, json!({"jsonrpc": "2.0", "id": "p1", "method": "ping"})).await;
        assert_eq!(response["id"], "p1");
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_list_returns_catalog() {
        let server = test_server();
        let response = call(&server, json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"})).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["discover_skills", "get_skill_details", "list_skills"]);
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["intent"]));
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool_is_result_not_rpc_error() {
        let server = test_server();
        let response = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": {"name": "nope", "arguments": {}}
            }),
        )
        .await;
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(
            response["result"]["content"][0]["text"],
            "Error: Unknown tool: nope"
        );
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let server = test_server();
        let response = call(&server, json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call"})).await;
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = test_server();
        let response =
            call(&server, json!({"jsonrpc": "2.0", "id": 6, "method": "resources/list"})).await;
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], 6);
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = test_server();
        let response = server.handle_message("{not json").await.unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["error"]["code"], -32700);
        assert!(value["id"].is_null());
    }

    #[tokio::test]
    async fn test_missing_method_is_invalid_request() {
        let server = test_server();
        let response = call(&server, json!({"jsonrpc": "2.0", "id": 7})).await;
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], 7);
    }

    // ── stdio loop ──────────────────────────────────────

    #[tokio::test]
    async fn test_serve_line_protocol() {
        let registry = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/skills/discover"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"skills": []})))
            .mount(&registry)
            .await;

        let server = server_for(&registry.uri());
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"discover_skills","arguments":{"intent":"send emails"}}}"#,
        ]
        .join("\n");

        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let responses: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["isError"], false);
        let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("No skills found for intent"));
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8_line() {
        let server = test_server();
        let input: &[u8] = b"\xff\xfe\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";

        let mut output = Vec::new();
        server.serve(input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let responses: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[1]["id"], 1);
        assert_eq!(responses[1]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_serve_handles_last_line_without_newline() {
        let server = test_server();
        let input = r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#;

        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let response: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(response["id"], 9);
    }
}
