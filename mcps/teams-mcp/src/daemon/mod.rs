//! Orchestration daemon access
//!
//! The daemon owns teams, members, tasks and messages. This module only
//! speaks its HTTP contract.

pub mod client;
pub mod error;
pub mod types;

pub use client::DaemonClient;
pub use error::{ClientBuildError, DaemonError, DaemonResult};
