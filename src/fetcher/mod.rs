//! Materializing a dependency's repository into the scratch root.
//!
//! [`ModuleFetcher`] is the seam between the resolver and the outside world.
//! Production runs use [`GitFetcher`], which makes one shallow clone per call;
//! [`CachingFetcher`] wraps any fetcher so references that share a repository
//! URL and ref share one checkout.
//!
//! Every clone lands in its own directory, `<scratch_root>/<repo>-<uuid>`, so
//! two references to the same repository at different refs (or the same ref,
//! without caching) never collide.

mod cache;

pub use cache::CachingFetcher;

use anyhow::Result;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use uuid::Uuid;

use crate::constants::{FETCH_RETRY_BASE_DELAY_MS, FETCH_RETRY_MAX_DELAY, GIT_CLONE_TIMEOUT};
use crate::core::TfdepsError;
use crate::git::{GitRepo, strip_auth_from_url};
use crate::models::DependencyRef;

/// Fetches the repository a [`DependencyRef`] points at.
///
/// Implementations return the root of a checkout of `repo_url` at `git_ref`
/// somewhere below `scratch_root`. Errors are returned, never panicked; the
/// resolver turns them into a `FetchFailed` outcome for that one reference.
pub trait ModuleFetcher {
    fn fetch(
        &self,
        dependency: &DependencyRef,
        scratch_root: &Path,
    ) -> impl Future<Output = Result<PathBuf>>;
}

/// Shallow-clones each reference with the system git.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    timeout: Option<Duration>,
    retries: usize,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self {
            timeout: Some(GIT_CLONE_TIMEOUT),
            retries: 0,
        }
    }
}

impl GitFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-clone timeout; `None` disables it.
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after a failed clone, with exponential backoff.
    pub const fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }
}

impl ModuleFetcher for GitFetcher {
    async fn fetch(&self, dependency: &DependencyRef, scratch_root: &Path) -> Result<PathBuf> {
        let target = clone_dir(scratch_root, dependency);
        let url = dependency.repo_url.as_str();
        let git_ref = dependency.git_ref.as_str();

        // 250ms, 500ms, 1s... capped
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(FETCH_RETRY_BASE_DELAY_MS / 2)
            .max_delay(FETCH_RETRY_MAX_DELAY)
            .take(self.retries);

        let mut attempt = 0usize;
        RetryIf::spawn(
            strategy,
            || {
                attempt += 1;
                let target = target.clone();
                async move {
                    if attempt > 1 {
                        tracing::debug!(
                            "Retrying clone of {} (attempt {})",
                            strip_auth_from_url(url),
                            attempt
                        );
                        remove_partial_clone(&target).await;
                    }
                    GitRepo::clone_shallow(url, git_ref, &target, self.timeout).await
                }
            },
            is_retryable,
        )
        .await?;

        Ok(target)
    }
}

// Git missing from PATH will not fix itself between attempts
fn is_retryable(error: &anyhow::Error) -> bool {
    !matches!(error.downcast_ref::<TfdepsError>(), Some(TfdepsError::GitNotFound))
}

async fn remove_partial_clone(target: &Path) {
    if tokio::fs::try_exists(target).await.unwrap_or(false)
        && let Err(e) = tokio::fs::remove_dir_all(target).await
    {
        tracing::debug!("Could not remove partial clone {}: {}", target.display(), e);
    }
}

/// `<scratch_root>/<sanitized repo name>-<uuid>`
pub fn clone_dir(scratch_root: &Path, dependency: &DependencyRef) -> PathBuf {
    let name: String = dependency
        .repo_name()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '-' })
        .collect();
    scratch_root.join(format!("{name}-{}", Uuid::new_v4().simple()))
}
