//! Teams MCP Library
//!
//! Bridges agent-team orchestration tools to the orchestration daemon's HTTP
//! API. Capability discovery runs once at startup; its snapshot decides which
//! backends `spawn_teammate` advertises and accepts.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use teams_mcp::{discovery, Config, Session, TeamsMcpServer};
//!
//! let config = Config::load()?;
//! let caps = discovery::discover(&config).await;
//! let server = TeamsMcpServer::new(Session::new(config, caps)?);
//! let result = server.call_tool("task_list", serde_json::json!({"team": "proj"})).await?;
//! ```

pub mod config;
pub mod daemon;
pub mod discovery;
pub mod error;
pub mod handlers;
pub mod params;
pub mod protocol;
pub mod server;
pub mod session;
pub mod task_ids;
pub mod tool_schema;
pub mod types;

// Re-export main server type
pub use config::Config;
pub use server::TeamsMcpServer;
pub use session::Session;

// Re-export parameter types for direct API usage
pub use params::*;
