//! Teams MCP Server
//!
//! Exposes agent-team orchestration (teams, teammates, messages, tasks) as
//! MCP tools over stdio, forwarding every call to the orchestration daemon.
//!
//! # Environment
//!
//! - `NIGHTSHIFT_RUNTIME_URL`: remote runtime base URL, also used as the daemon URL
//! - `NIGHTSHIFT_TEAM_BACKENDS`: comma-separated backend allow-list
//! - `TEAMS_MCP_CONFIG_PATH`: config file (default `~/.nightshift/teams-mcp.toml`)
//! - `LOG_FORMAT=json`: structured log output on stderr
//!
//! Or configure in `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "teams": {
//!       "command": "./target/release/teams-mcp",
//!       "env": { "NIGHTSHIFT_RUNTIME_URL": "http://127.0.0.1:19277" }
//!     }
//!   }
//! }
//! ```

use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teams_mcp::{discovery, Config, Session, TeamsMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    tracing::info!("Starting Teams MCP server");

    let config = Config::load()?;
    tracing::info!(daemon = %config.daemon.url, "configuration loaded");

    let capabilities = discovery::discover(&config).await;
    let session = Session::new(config, capabilities)?;

    // Schema is fitted to the capabilities before serving begins
    let server = TeamsMcpServer::new(session);
    let service = server.serve(stdio()).await?;

    tracing::info!("Teams MCP server running");

    service.waiting().await?;

    tracing::info!("Teams MCP server stopped");
    Ok(())
}

/// Log to stderr (stdout carries the MCP protocol); `LOG_FORMAT=json` for JSON lines
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("teams_mcp=info".parse()?);
    let json = matches!(std::env::var("LOG_FORMAT"), Ok(v) if v.eq_ignore_ascii_case("json"));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    Ok(())
}
