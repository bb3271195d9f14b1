//! Enabled-backend resolution

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::Backend;

/// Decide which backends a spawn may target.
///
/// An `allow_list` naming at least one known backend wins over detection:
/// unknown names are dropped, and "opencode" is dropped when no runtime URL
/// is configured. An empty or all-unknown list counts as no override; then a
/// backend is enabled iff its executable was found (plus the runtime URL for
/// backends that need it).
pub fn resolve_enabled_backends(
    allow_list: Option<&[String]>,
    executables: &BTreeMap<Backend, PathBuf>,
    runtime_configured: bool,
) -> Vec<Backend> {
    let runtime_ok = |backend: &Backend| !backend.needs_runtime() || runtime_configured;

    let mut requested: Vec<Backend> = Vec::new();
    for name in allow_list.unwrap_or_default() {
        match name.parse::<Backend>() {
            Ok(backend) if !requested.contains(&backend) => requested.push(backend),
            Ok(_) => {}
            Err(e) => tracing::warn!("ignoring backend allow-list entry: {}", e),
        }
    }

    if !requested.is_empty() {
        return requested
            .into_iter()
            .filter(|backend| {
                let ok = runtime_ok(backend);
                if !ok {
                    tracing::warn!(%backend, "backend requires a runtime URL, ignoring");
                }
                ok
            })
            .collect();
    }

    if allow_list.is_some_and(|names| !names.is_empty()) {
        tracing::warn!("backend allow-list names no known backend, falling back to detection");
    }

    Backend::ALL
        .into_iter()
        .filter(|b| executables.contains_key(b))
        .filter(runtime_ok)
        .collect()
}
