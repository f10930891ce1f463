//! Configuration management for the mock MCP endpoint
//!
//! Handles the bind address and the intercepted endpoint path.

use std::net::{IpAddr, SocketAddr};

use crate::error::{ConfigError, Result};

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port
pub const DEFAULT_PORT: u16 = 8787;

/// Default intercepted endpoint path
pub const DEFAULT_PATH: &str = "/mcp";

/// Configuration for the mock MCP endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: IpAddr,

    /// Port the HTTP server binds to
    pub port: u16,

    /// Path whose requests are answered with mock responses
    pub endpoint_path: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("MOCK_MCP_HOST") {
            Some(value) => parse_host(&value)?,
            None => parse_host(DEFAULT_HOST)?,
        };

        let port = match lookup("MOCK_MCP_PORT") {
            Some(value) => parse_port(&value)?,
            None => DEFAULT_PORT,
        };

        let endpoint_path = lookup("MOCK_MCP_PATH").unwrap_or_else(|| DEFAULT_PATH.to_string());
        validate_path(&endpoint_path)?;

        Ok(Self {
            host,
            port,
            endpoint_path,
        })
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        path: Option<String>,
    ) -> Result<Self> {
        if let Some(host) = host {
            self.host = parse_host(&host)?;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(path) = path {
            validate_path(&path)?;
            self.endpoint_path = path;
        }
        Ok(self)
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_host(value: &str) -> Result<IpAddr> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidHost {
            value: value.to_string(),
        }
        .into()
    })
}

fn parse_port(value: &str) -> Result<u16> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidPort {
            value: value.to_string(),
        }
        .into()
    })
}

fn validate_path(path: &str) -> Result<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::InvalidPath {
            path: path.to_string(),
        }
        .into())
    }
}
