//! Mock MCP Endpoint Library
//!
//! A stand-in JSON-RPC backend for front-end development. Requests to one
//! fixed path are answered with canned responses imitating the Model Context
//! Protocol tool surface (`tools/list`, `tools/call`).

pub mod config;
pub mod error;
pub mod interceptor;
pub mod mcp;

pub use config::Config;
pub use error::{MockMcpError, Result};
pub use interceptor::Interceptor;
