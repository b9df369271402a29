//! Platform-specific helpers
//!
//! Executable names and user path expansion. tfdeps
//! shells out to two external programs, `git` for fetching modules and
//! Graphviz `dot` for rasterizing graphs; both are resolved here.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the appropriate Git command name for the current platform.
///
/// - `"git.exe"` on Windows
/// - `"git"` on Unix-like systems
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Returns the Graphviz layout command name for the current platform.
#[must_use]
pub const fn get_dot_command() -> &'static str {
    if is_windows() {
        "dot.exe"
    } else {
        "dot"
    }
}

/// Locates the Graphviz `dot` executable, if installed.
pub fn find_graphviz() -> Option<PathBuf> {
    which::which(get_dot_command()).ok()
}

/// Resolves a user-supplied path, expanding `~` and environment variables.
///
/// ```rust,no_run
/// use tfdeps_cli::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let scratch = resolve_path("~/tmp/tfdeps")?;
/// let from_env = resolve_path("$TMPDIR/tfdeps")?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(path).with_context(|| format!("Failed to expand path: {path}"))?;

    Ok(PathBuf::from(expanded.as_ref()))
}
