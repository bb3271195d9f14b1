//! Tool-level error taxonomy
//!
//! Handlers return [`ToolResult`]; the server converts failures to MCP errors
//! at the tool boundary.

use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::daemon::DaemonError;
use crate::protocol::ProtocolError;

/// Failure of a single tool call
#[derive(Error, Debug)]
pub enum ToolError {
    /// Bad caller input, detected before any network call
    #[error("{0}")]
    Validation(String),

    /// Unknown task or teammate
    #[error("{0}")]
    NotFound(String),

    /// Message envelope rejected before sending
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The daemon call failed; `context` names what was being attempted
    #[error("{context}: {source}")]
    Daemon {
        context: String,
        #[source]
        source: DaemonError,
    },
}

pub type ToolResult<T> = Result<T, ToolError>;

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ToolError::NotFound(message.into())
    }
}

impl From<ToolError> for McpError {
    fn from(e: ToolError) -> Self {
        let message = e.to_string();
        match e {
            ToolError::Validation(_) | ToolError::Protocol(_) => {
                McpError::invalid_params(message, None)
            }
            ToolError::NotFound(_) => McpError::resource_not_found(message, None),
            ToolError::Daemon { .. } => McpError::internal_error(message, None),
        }
    }
}

/// Attach context to a failed daemon call
pub trait DaemonContext<T> {
    fn context(self, context: impl Into<String>) -> ToolResult<T>;
}

impl<T> DaemonContext<T> for Result<T, DaemonError> {
    fn context(self, context: impl Into<String>) -> ToolResult<T> {
        self.map_err(|source| ToolError::Daemon {
            context: context.into(),
            source,
        })
    }
}
