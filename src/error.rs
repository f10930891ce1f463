//! Error types for the mock MCP endpoint
//!
//! Every error maps onto a JSON-RPC error code so the dispatcher can surface
//! it in the response body instead of failing the request.

use thiserror::Error;

/// JSON-RPC error codes used by the endpoint
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Main error type for the mock MCP endpoint
#[derive(Error, Debug)]
pub enum MockMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {value}")]
    InvalidPort { value: String },

    #[error("Invalid host address: {value}")]
    InvalidHost { value: String },

    #[error("Endpoint path must start with '/': {path}")]
    InvalidPath { path: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },
}

impl MockMcpError {
    /// JSON-RPC code reported for this error
    pub fn rpc_code(&self) -> i32 {
        match self {
            MockMcpError::Mcp(McpError::MethodNotFound { .. }) => codes::METHOD_NOT_FOUND,
            MockMcpError::Mcp(_) => codes::INVALID_PARAMS,
            _ => codes::INTERNAL_ERROR,
        }
    }

    /// Whether the error is unexpected, as opposed to a caller mistake
    pub fn is_internal(&self) -> bool {
        self.rpc_code() == codes::INTERNAL_ERROR
    }
}

/// Result type alias for mock MCP operations
pub type Result<T> = std::result::Result<T, MockMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = McpError::ToolNotFound {
            name: "delete_everything".to_string(),
        };
        assert_eq!(err.to_string(), "Tool not found: delete_everything");
    }

    #[test]
    fn test_error_conversion() {
        let mcp_err = McpError::InvalidParams {
            message: "missing name".to_string(),
        };
        let err: MockMcpError = mcp_err.into();
        assert!(matches!(err, MockMcpError::Mcp(_)));
    }

    #[test]
    fn test_rpc_codes() {
        let not_found: MockMcpError = McpError::ToolNotFound { name: "x".into() }.into();
        assert_eq!(not_found.rpc_code(), -32602);
        assert!(!not_found.is_internal());

        let method: MockMcpError = McpError::MethodNotFound { method: "x".into() }.into();
        assert_eq!(method.rpc_code(), -32601);

        let io: MockMcpError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert_eq!(io.rpc_code(), -32603);
        assert!(io.is_internal());
    }
}
