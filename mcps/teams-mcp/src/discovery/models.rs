//! Model listing via the backend CLI
//!
//! Runs `<backend> models` and reads its table output: one header line,
//! then one model per line.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::{ProbeError, ProbeResult};

#[instrument(skip_all, fields(program = %program.display()))]
pub async fn probe_models(program: &Path, timeout: Duration) -> ProbeResult<Vec<String>> {
    let name = program.display().to_string();

    let child = Command::new(program)
        .arg("models")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            program: name.clone(),
            source,
        })?;

    // Dropping the future on timeout kills the child
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| ProbeError::Timeout {
            program: name.clone(),
            timeout,
        })?
        .map_err(|source| ProbeError::Spawn {
            program: name.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProbeError::Exit {
            program: name,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let models = parse_model_table(&String::from_utf8_lossy(&output.stdout));
    debug!(count = models.len(), "listed models");
    Ok(models)
}

/// Skip the header line, keep every non-blank line trimmed
pub fn parse_model_table(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
