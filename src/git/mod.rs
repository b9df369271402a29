//! Git operations wrapper for tfdeps
//!
//! tfdeps never links a git library. Every repository is fetched by the
//! system `git` binary, the same way Cargo's `git-fetch-with-cli` works, so
//! SSH agents, credential helpers and `~/.gitconfig` rewrites all apply
//! unchanged.
//!
//! The only network operation is a shallow, single-ref clone:
//!
//! ```text
//! git clone --quiet --branch <ref> --depth 1 -- <url> <scratch>/<repo>-<uuid>
//! ```
//!
//! Commands are assembled with [`command_builder::GitCommand`], which owns
//! timeouts, logging under the `git` tracing target and the mapping of
//! failures onto [`TfdepsError`].
//!
//! # Authentication
//!
//! Credentials embedded in URLs (`https://token@host/repo.git`) are passed to
//! git as-is but stripped from anything tfdeps logs; see [`strip_auth_from_url`].

pub mod command_builder;

use crate::core::TfdepsError;
use crate::git::command_builder::GitCommand;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Handle to a checked-out repository on local disk.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Wraps an existing checkout. The path is not validated.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Shallow-clones `git_ref` of `url` into `target`.
    ///
    /// `target` must not exist yet or must be empty. A `None` timeout lets git
    /// run for as long as it needs.
    ///
    /// # Errors
    ///
    /// - [`TfdepsError::GitCloneFailed`] when git exits non-zero (unknown ref,
    ///   unreachable host, authentication failure) or the timeout elapses
    /// - [`TfdepsError::GitNotFound`] when git cannot be spawned
    pub async fn clone_shallow(
        url: &str,
        git_ref: &str,
        target: impl AsRef<Path>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone_shallow(url, git_ref, target)
            .with_timeout(timeout)
            .with_context(format!("{}@{git_ref}", strip_auth_from_url(url)))
            .execute_success()
            .await?;

        Ok(Self::new(target))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Fails with [`TfdepsError::GitNotFound`] unless `git --version` runs.
///
/// Called once per analysis or scan, before the first clone.
pub async fn ensure_git_available() -> Result<()> {
    match GitCommand::version().execute_stdout().await {
        Ok(version) => {
            tracing::debug!(target: "git", "Using {}", version);
            Ok(())
        }
        Err(_) => Err(TfdepsError::GitNotFound.into()),
    }
}

/// Removes `user[:password]@` from HTTP(S) URLs for display.
///
/// ```rust
/// use tfdeps_cli::git::strip_auth_from_url;
///
/// assert_eq!(
///     strip_auth_from_url("https://token@github.com/org/infra.git"),
///     "https://github.com/org/infra.git"
/// );
/// assert_eq!(
///     strip_auth_from_url("git@github.com:org/infra.git"),
///     "git@github.com:org/infra.git"
/// );
/// ```
pub fn strip_auth_from_url(url: &str) -> String {
    let Some(protocol_end) = ["https://", "http://"]
        .iter()
        .find(|scheme| url.starts_with(**scheme))
        .map(|scheme| scheme.len())
    else {
        return url.to_string();
    };

    let rest = &url[protocol_end..];
    let host_end = rest.find('/').unwrap_or(rest.len());
    match rest[..host_end].rfind('@') {
        Some(at) => format!("{}{}", &url[..protocol_end], &rest[at + 1..]),
        None => url.to_string(),
    }
}
