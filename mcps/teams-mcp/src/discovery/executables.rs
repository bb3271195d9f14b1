//! Executable lookup on a search path

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Find `name` in the directories of `search_path` (a `PATH`-style list).
///
/// Returns `None` when the path is unset or no directory holds an
/// executable file of that name.
pub fn find_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let paths = search_path?;
    std::env::split_paths(paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
