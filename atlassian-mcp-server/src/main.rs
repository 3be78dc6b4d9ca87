//! Atlassian MCP Server - Confluence and Jira Cloud tools via MCP
//!
//! Resolves credentials from CLI flags, environment and config file, then
//! serves MCP over stdio.

use atlassian_mcp_server::config::{ConfigOverrides, ConfigResolver};
use atlassian_mcp_server::AtlassianMcpServer;
use clap::Parser;
use tracing::{error, info};

/// Command-line arguments; each overrides the environment and config file
#[derive(Debug, Parser)]
#[command(name = "atlassian-mcp-server", version, about)]
struct Cli {
    /// Path to a JSON config file with domain, email and apiToken
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Atlassian domain, e.g. your-company.atlassian.net
    #[arg(short, long)]
    domain: Option<String>,

    /// Account email
    #[arg(short, long)]
    email: Option<String>,

    /// API token
    #[arg(short, long)]
    token: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        ConfigOverrides {
            config_path: cli.config,
            domain: cli.domain,
            email: cli.email,
            api_token: cli.token,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configure logging for STDIO transport
    AtlassianMcpServer::configure_stdio_logging();

    info!("Starting Atlassian MCP Server...");

    let config = match ConfigResolver::from_process().resolve(&cli.into()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to start Atlassian MCP Server: {}", e);
            std::process::exit(1);
        }
    };

    let server = match AtlassianMcpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create Atlassian MCP Server: {}", e);
            eprintln!("Failed to start Atlassian MCP Server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Atlassian MCP Server running on stdio");
    server.serve_stdio().await?;

    Ok(())
}
