//! MCP (Model Context Protocol) module
//!
//! Implements the mock tool registry and the JSON-RPC dispatcher.

pub mod server;
pub mod tools;
pub mod types;
