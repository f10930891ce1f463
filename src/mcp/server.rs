//! MCP Server implementation
//!
//! Dispatches JSON-RPC envelopes to the tool registry. The HTTP interceptor
//! and the stdio transport share this dispatcher.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{McpError, Result};
use crate::mcp::tools::ToolRegistry;
use crate::mcp::types::*;

/// MCP Server for the mock tools
#[derive(Debug, Clone)]
pub struct McpServer {
    /// Tool registry, fixed at construction
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Handle a raw request body, returning the HTTP status and the envelope
    pub async fn handle_message(&self, body: &[u8]) -> (StatusCode, JsonRpcResponse) {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "request body is not valid JSON");
                return (
                    StatusCode::BAD_REQUEST,
                    JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string())),
                );
            }
        };

        // Recover the id before shape validation so even rejected envelopes can echo it.
        let id = value.get("id").cloned();

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    JsonRpcResponse::error(id, JsonRpcError::invalid_request(e.to_string())),
                );
            }
        };

        self.handle_request(request).await
    }

    /// Handle a parsed request envelope
    pub async fn handle_request(&self, request: JsonRpcRequest) -> (StatusCode, JsonRpcResponse) {
        tracing::debug!(method = %request.method, "dispatching request");

        let outcome = match request.method.as_str() {
            methods::LIST_TOOLS => self.handle_list_tools(),
            methods::CALL_TOOL => self.handle_call_tool(request.params).await,
            other => Err(McpError::MethodNotFound {
                method: other.to_string(),
            }
            .into()),
        };

        Self::reply(request.id, outcome)
    }

    /// Turn a dispatch outcome into the HTTP status and envelope
    pub fn reply(id: Option<Value>, outcome: Result<Value>) -> (StatusCode, JsonRpcResponse) {
        match outcome {
            Ok(result) => (StatusCode::OK, JsonRpcResponse::success(id, result)),
            Err(e) if e.is_internal() => {
                tracing::warn!(error = %e, "internal error during dispatch");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    JsonRpcResponse::error(id, JsonRpcError::from(&e)),
                )
            }
            Err(e) => (StatusCode::OK, JsonRpcResponse::error(id, JsonRpcError::from(&e))),
        }
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.registry.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params = params.ok_or_else(|| McpError::InvalidParams {
            message: "missing tool parameters".to_string(),
        })?;
        let params: CallToolParams =
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams {
                message: e.to_string(),
            })?;

        let arguments = params.arguments.unwrap_or(Value::Null);
        let result = self.registry.call_tool(&params.name, arguments).await?;
        Ok(serde_json::to_value(result)?)
    }

    /// Serve newline-delimited envelopes until the reader is exhausted
    pub async fn serve_lines<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let (status, response) = self.handle_message(line.as_bytes()).await;
            tracing::debug!(status = status.as_u16(), "stdio request handled");

            let mut response_str = serde_json::to_string(&response)?;
            response_str.push('\n');
            writer.write_all(response_str.as_bytes()).await?;
            writer.flush().await?;
        }

        Ok(())
    }

    /// Run the server on stdio
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve_lines(stdin, stdout).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn server() -> McpServer {
        McpServer::new(Arc::new(ToolRegistry::builtin()))
    }

    async fn send(body: Value) -> (StatusCode, Value) {
        let bytes = serde_json::to_vec(&body).unwrap();
        let (status, response) = server().handle_message(&bytes).await;
        (status, serde_json::to_value(response).unwrap())
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (status, response) = send(json!({"method": "tools/list", "id": 7})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["id"], 7);
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let (status, response) = server().handle_message(b"{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.unwrap().code, -32700);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_non_object_body_is_invalid_request() {
        let (status, response) = send(json!([1, 2, 3])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_invalid_request_echoes_id() {
        let (_, response) = send(json!({"method": 5, "id": "abc"})).await;
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], "abc");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (status, response) = send(json!({"method": "resources/list", "id": 1})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["error"]["code"], -32601);
        assert!(response.get("result").is_none());
    }

    #[tokio::test]
    async fn test_missing_method_is_not_found() {
        let (_, response) = send(json!({"id": 2})).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[test]
    fn test_internal_error_reply() {
        let failure = std::io::Error::new(std::io::ErrorKind::Other, "handler crashed");
        let (status, response) = McpServer::reply(Some(json!(12)), Err(failure.into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.id, Some(json!(12)));
        assert!(response.result.is_none());

        let error = response.error.unwrap();
        assert_eq!(error.code, -32603);
        assert!(error.message.starts_with("Internal error"));
    }

    #[test]
    fn test_serialization_failure_is_internal() {
        let bad: serde_json::Error = serde_json::from_str::<Value>("{").unwrap_err();
        let (status, response) = McpServer::reply(None, Err(bad.into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.unwrap().code, -32603);
        assert!(response.id.is_none());
    }

    #[test]
    fn test_protocol_error_reply_is_ok_status() {
        let err = McpError::ToolNotFound {
            name: "ghost".to_string(),
        };
        let (status, response) = McpServer::reply(Some(json!("r1")), Err(err.into()));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_call_tool_missing_params() {
        let (status, response) = send(json!({"method": "tools/call", "id": 3})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_call_tool_without_arguments() {
        let (_, response) = send(json!({
            "method": "tools/call",
            "params": {"name": "get_profile"}
        }))
        .await;
        assert_eq!(response["result"]["content"][0]["type"], "text");
        assert!(response.get("id").is_none());
    }

    #[tokio::test]
    async fn test_serve_lines() {
        let input = concat!(
            r#"{"method":"tools/list","id":1}"#,
            "\n\n",
            "garbage\n",
            r#"{"method":"tools/call","params":{"name":"search_organizations","arguments":{"query":"Acme"}},"id":2}"#,
            "\n"
        );
        let mut output = Vec::new();
        server()
            .serve_lines(tokio::io::BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["error"]["code"], -32700);
        assert_eq!(responses[2]["id"], 2);
        assert!(responses[2]["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Acme Corporation"));
    }
}
