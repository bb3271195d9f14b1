//! Handler implementations for teams-mcp tools
//!
//! Organized by domain: teams, teammates, messages, tasks. Every handler
//! validates its input before the first daemon call.

mod messages;
mod tasks;
mod teammates;
mod teams;

pub use messages::*;
pub use tasks::*;
pub use teammates::*;
pub use teams::*;

use std::path::Path;

use crate::error::{ToolError, ToolResult};

/// Identity every team lead is created with
pub const LEAD_NAME: &str = "team-lead";
pub const LEAD_AGENT_TYPE: &str = "team-lead";
pub const LEAD_MODEL: &str = "claude-sonnet-4-6";
pub const LEAD_BACKEND: &str = "claude";

/// Sub-agent type used when a spawn names none
pub const DEFAULT_AGENT_TYPE: &str = "general";

/// Trimmed `value`, or a validation error naming `field`
fn require(field: &str, value: &str) -> ToolResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn require_absolute(field: &str, path: &str) -> ToolResult<String> {
    let path = require(field, path)?;
    if !Path::new(&path).is_absolute() {
        return Err(ToolError::validation(format!(
            "{} must be an absolute path, got \"{}\"",
            field, path
        )));
    }
    Ok(path)
}

/// `Some` non-blank value, trimmed
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
