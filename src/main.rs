mod config;
mod mcp;
mod registry;
mod tools;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::mcp::{Dispatcher, McpServer};
use crate::registry::RegistryClient;
use crate::tools::ToolCatalog;

fn print_help() {
    println!(
        "\
ardf-mcp-server v{}

MCP server that lets AI agents discover third-party APIs through
natural-language search against a skill registry. Speaks JSON-RPC
over stdio; logs go to stderr.

USAGE:
    ardf-mcp-server [OPTIONS] [CONFIG_PATH]

ARGUMENTS:
    CONFIG_PATH    Optional path to a TOML configuration file

OPTIONS:
    -h, --help       Print this help message and exit
    -V, --version    Print version and exit

ENVIRONMENT VARIABLES:
    Variables can also be referenced in the config file via ${{VAR_NAME}} syntax.

    ARDF_API_URL    Base URL of the skill registry
                    [default: http://127.0.0.1:3001]
    RUST_LOG        Log level filter for tracing
                    (e.g. debug, ardf_mcp_server=debug,warn)

EXAMPLES:
    ardf-mcp-server                                  # local registry
    ARDF_API_URL=https://ardf.example.com ardf-mcp-server
    ardf-mcp-server /etc/ardf/mcp.toml               # custom config",
        env!("CARGO_PKG_VERSION"),
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --help / --version before anything else
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("ardf-mcp-server v{}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
    }

    // stdout carries the protocol, so logs must go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ardf_mcp_server=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config_path = std::env::args().nth(1);
    if let Some(ref path) = config_path {
        info!("Loading configuration from {path}");
    }
    let config = Config::resolve(config_path.as_deref())?;

    let registry = Arc::new(RegistryClient::new(&config.registry)?);
    let catalog = ToolCatalog::new(Arc::clone(&registry));
    let tool_names = catalog.names().join(", ");
    let tool_count = catalog.len();
    let server = McpServer::new(config.server.name.clone(), Dispatcher::new(catalog));

    info!("ARDF MCP server running on stdio");
    info!("Connected to skill registry at: {}", registry.base_url());
    info!(
        "Registry timeout: {}s (connect {}s)",
        config.registry.timeout_secs, config.registry.connect_timeout_secs
    );
    info!("Available tools ({tool_count}): {tool_names}");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = server.serve(stdin, stdout) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, exiting");
            Ok(())
        }
    }
}
