//! Mock MCP Endpoint
//!
//! Serves canned tool-invocation responses so a front-end can be developed
//! against a stable fake backend.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use mock_mcp_endpoint::config::Config;
use mock_mcp_endpoint::error::{McpError, Result};
use mock_mcp_endpoint::interceptor::{self, Interceptor};
use mock_mcp_endpoint::mcp::server::McpServer;
use mock_mcp_endpoint::mcp::tools::ToolRegistry;

/// Mock MCP Endpoint
#[derive(Parser)]
#[command(name = "mock-mcp-endpoint")]
#[command(author, version, about = "Mock MCP endpoint - canned tool responses for front-end development")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the mock endpoint over HTTP (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,

        /// Endpoint path to intercept
        #[arg(long)]
        path: Option<String>,
    },

    /// Serve newline-delimited JSON-RPC on stdin/stdout
    Stdio,

    /// Print the registered tool descriptors
    Tools,

    /// Invoke a tool once and print its result
    Call {
        /// Tool name
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        arguments: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays usable for the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let registry = Arc::new(ToolRegistry::builtin());
    let server = McpServer::new(registry.clone());

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        path: None,
    });

    match command {
        Commands::Serve { host, port, path } => {
            let config = Config::new()?.with_overrides(host, port, path)?;
            interceptor::serve(&config, Interceptor::new(config.endpoint_path.clone(), server))
                .await?;
        }
        Commands::Stdio => {
            server.run_stdio().await?;
        }
        Commands::Tools => {
            let tools = registry.list_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Commands::Call { name, arguments } => {
            let arguments: Value =
                serde_json::from_str(&arguments).map_err(|e| McpError::InvalidArguments {
                    message: e.to_string(),
                })?;
            let result = registry.call_tool(&name, arguments).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
