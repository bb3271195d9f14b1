//! External task id allocation
//!
//! Ids are numeric strings, one greater than the largest numeric id the
//! daemon currently reports for the team. Allocation is not coordinated with
//! other writers: two concurrent allocators can hand out the same id, and the
//! timestamp fallback can sort before or after ids allocated elsewhere. Fixing
//! that needs serialization in the daemon.

use crate::daemon::types::Task;
use crate::daemon::DaemonClient;

/// Next id for `team`, falling back to a millisecond timestamp
pub async fn next_task_id(client: &DaemonClient, team: &str) -> String {
    match client.snapshot(team).await {
        Ok(snapshot) => {
            next_id_from_tasks(&snapshot.team.tasks).unwrap_or_else(timestamp_id)
        }
        Err(e) => {
            tracing::warn!(team, error = %e, "task snapshot unavailable, using timestamp id");
            timestamp_id()
        }
    }
}

/// `max + 1` over the numeric ids, `"1"` for an empty list, `None` when
/// tasks exist but none has a numeric id.
///
/// Ids are compared and incremented as decimal strings, so ids beyond the
/// range of any integer type still yield a strictly greater successor.
pub fn next_id_from_tasks(tasks: &[Task]) -> Option<String> {
    if tasks.is_empty() {
        return Some("1".to_string());
    }

    tasks
        .iter()
        .filter(|t| !t.id.is_empty() && t.id.bytes().all(|b| b.is_ascii_digit()))
        .map(|t| strip_leading_zeros(&t.id))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(increment)
}

fn strip_leading_zeros(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    }
}

/// Add one to a string of ASCII digits
fn increment(digits: &str) -> String {
    let mut out: Vec<u8> = digits.bytes().collect();
    for digit in out.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return String::from_utf8_lossy(&out).into_owned();
        }
    }
    out.insert(0, b'1');
    String::from_utf8_lossy(&out).into_owned()
}

fn timestamp_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
