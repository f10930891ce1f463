//! Request interceptor
//!
//! Answers requests on the configured endpoint path with mock JSON-RPC
//! responses and leaves every other request to normal handling.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::error::Result;
use crate::mcp::server::McpServer;
use crate::mcp::types::{JsonRpcError, JsonRpcResponse};

/// Value of `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Value of `Access-Control-Allow-Headers`
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Body sent when a mock response cannot be serialized
pub const INTERNAL_ERROR_BODY: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#;

/// A locally computed response for an intercepted request
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status
    pub status: StatusCode,

    /// JSON body; `None` for pre-flight responses
    pub body: Option<JsonRpcResponse>,
}

impl MockResponse {
    /// Pre-flight answer: permissive CORS headers, no body
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    /// Fixed -32603 response used when serialization itself fails
    pub fn internal_error_http() -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            cors_headers(true),
            INTERNAL_ERROR_BODY,
        )
            .into_response()
    }

    /// Response headers: permissive CORS, plus the content type when a body is present
    pub fn headers(&self) -> HeaderMap {
        cors_headers(self.body.is_some())
    }

    /// Serialize into an HTTP response
    pub fn into_http(self) -> Result<Response> {
        let headers = self.headers();
        let response = match &self.body {
            Some(body) => {
                let bytes = serde_json::to_vec(body)?;
                (self.status, headers, bytes).into_response()
            }
            None => (self.status, headers).into_response(),
        };
        Ok(response)
    }
}

fn cors_headers(with_body: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    if with_body {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    headers
}

/// Intercepts requests to a single endpoint path
#[derive(Debug, Clone)]
pub struct Interceptor {
    /// Path that is answered locally
    endpoint_path: String,

    /// Dispatcher for the main exchange
    server: McpServer,
}

impl Interceptor {
    /// Create an interceptor for `endpoint_path`
    pub fn new(endpoint_path: impl Into<String>, server: McpServer) -> Self {
        Self {
            endpoint_path: endpoint_path.into(),
            server,
        }
    }

    /// Path this interceptor answers
    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    /// Decide how to answer a request. `None` means pass through.
    pub async fn intercept(&self, method: &Method, path: &str, body: &[u8]) -> Option<MockResponse> {
        if path != self.endpoint_path {
            return None;
        }

        if method == Method::OPTIONS {
            return Some(MockResponse::preflight());
        }

        if method == Method::POST {
            let (status, response) = self.server.handle_message(body).await;
            return Some(MockResponse {
                status,
                body: Some(response),
            });
        }

        None
    }

    /// Answer a request whose body could not be read, e.g. over the size limit.
    /// `None` means pass through.
    pub fn reject_body(
        &self,
        method: &Method,
        path: &str,
        rejection: &BytesRejection,
    ) -> Option<MockResponse> {
        if path != self.endpoint_path {
            return None;
        }

        if method == Method::OPTIONS {
            return Some(MockResponse::preflight());
        }

        if method == Method::POST {
            let error = JsonRpcError::invalid_request(rejection.body_text());
            return Some(MockResponse {
                status: rejection.status(),
                body: Some(JsonRpcResponse::error(None, error)),
            });
        }

        None
    }

    /// Build an axum router that runs the interceptor for every request
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(handle_request)
            .with_state(Arc::new(self))
    }
}

async fn handle_request(
    State(interceptor): State<Arc<Interceptor>>,
    method: Method,
    uri: Uri,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let path = uri.path();

    let mock = match body {
        Ok(body) => interceptor.intercept(&method, path, &body).await,
        Err(rejection) => {
            tracing::debug!(%method, path, error = %rejection, "request body rejected");
            interceptor.reject_body(&method, path, &rejection)
        }
    };

    let Some(mock) = mock else {
        tracing::debug!(%method, path, "passing request through");
        return StatusCode::NOT_FOUND.into_response();
    };

    tracing::info!(%method, path, status = mock.status.as_u16(), "intercepted request");

    match mock.into_http() {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize mock response");
            MockResponse::internal_error_http()
        }
    }
}

/// Bind the configured address and serve until the process exits
pub async fn serve(config: &crate::config::Config, interceptor: Interceptor) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        path = interceptor.endpoint_path(),
        "mock MCP endpoint listening"
    );

    axum::serve(listener, interceptor.into_router()).await?;
    Ok(())
}
