//! MCP protocol type definitions
//!
//! Request and response envelopes for the mock tool-invocation protocol.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{codes, MockMcpError};

/// JSON-RPC version
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (accepted but not checked)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,

    /// Request ID, any JSON value. `None` means the member was absent.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,

    /// Method name
    #[serde(default)]
    pub method: String,

    /// Method parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Keeps an explicit `null` distinct from a missing member.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version
    pub jsonrpc: String,

    /// Result (on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error (on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Echoed request ID, omitted when the request had none
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,

    /// Error message
    pub message: String,
}

impl JsonRpcError {
    /// Parse error (-32700)
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: codes::PARSE_ERROR,
            message: format!("Parse error: {}", message.into()),
        }
    }

    /// Invalid request (-32600)
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: codes::INVALID_REQUEST,
            message: format!("Invalid Request: {}", message.into()),
        }
    }

    /// Internal error (-32603)
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: codes::INTERNAL_ERROR,
            message: format!("Internal error: {}", message.into()),
        }
    }
}

impl From<&MockMcpError> for JsonRpcError {
    fn from(err: &MockMcpError) -> Self {
        if err.is_internal() {
            return Self::internal_error(err.to_string());
        }
        // Protocol errors already carry a readable message; skip the wrapper prefix.
        let message = match err {
            MockMcpError::Mcp(inner) => inner.to_string(),
            other => other.to_string(),
        };
        Self {
            code: err.rpc_code(),
            message,
        }
    }
}

/// Tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Tool name
    pub name: String,

    /// Tool description
    pub description: String,

    /// Input schema (JSON Schema)
    pub input_schema: Value,
}

/// List tools result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Available tools
    pub tools: Vec<Tool>,
}

/// Call tool params
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Tool name
    pub name: String,

    /// Tool arguments
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Tool result content item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolResultContent {
    /// Text content
    #[serde(rename = "text")]
    Text { text: String },
}

/// Call tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    /// Result content
    pub content: Vec<ToolResultContent>,
}

impl CallToolResult {
    /// Create a text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent::Text { text: text.into() }],
        }
    }

    /// Wrap a handler's result object as a pretty-printed text item
    pub fn json(value: &Value) -> crate::error::Result<Self> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }
}

/// MCP methods
pub mod methods {
    pub const LIST_TOOLS: &str = "tools/list";
    pub const CALL_TOOL: &str = "tools/call";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::McpError;

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.id, Some(json!(1)));
        assert!(req.params.is_none());
    }

    #[test]
    fn test_request_id_absent_vs_null() {
        let absent: JsonRpcRequest = serde_json::from_str(r#"{"method":"tools/list"}"#).unwrap();
        assert_eq!(absent.id, None);

        let null: JsonRpcRequest =
            serde_json::from_str(r#"{"method":"tools/list","id":null}"#).unwrap();
        assert_eq!(null.id, Some(Value::Null));
    }

    #[test]
    fn test_response_omits_missing_id() {
        let resp = JsonRpcResponse::success(None, json!({"tools": []}));
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("error").is_none());
        assert_eq!(value["jsonrpc"], "2.0");
    }

    #[test]
    fn test_response_echoes_null_id() {
        let resp = JsonRpcResponse::error(
            Some(Value::Null),
            JsonRpcError::invalid_request("nope"),
        );
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"id\":null"));
        assert!(!json.contains("\"result\""));
    }

    #[test]
    fn test_error_from_mcp_error() {
        let err: MockMcpError = McpError::ToolNotFound {
            name: "ghost".to_string(),
        }
        .into();
        let rpc = JsonRpcError::from(&err);
        assert_eq!(rpc.code, -32602);
        assert_eq!(rpc.message, "Tool not found: ghost");
    }

    #[test]
    fn test_tool_result_content_shape() {
        let result = CallToolResult::json(&json!({"ok": true})).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        let text = value["content"][0]["text"].as_str().unwrap();
        let inner: Value = serde_json::from_str(text).unwrap();
        assert_eq!(inner, json!({"ok": true}));
    }
}
