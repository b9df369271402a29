use anyhow::Result;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::ModuleFetcher;
use crate::models::DependencyRef;

/// Reuses one checkout per `(repo_url, git_ref)` for the lifetime of the fetcher.
///
/// References to different sub paths of the same repository and ref then cost
/// a single clone. Concurrent requests for the same key wait on the first
/// one instead of cloning again. A failed fetch is not remembered, so the next
/// request for that key tries again.
///
/// The cached paths live under whatever scratch root the first request used;
/// create one `CachingFetcher` per scratch root.
pub struct CachingFetcher<F> {
    inner: F,
    clones: DashMap<(String, String), Arc<OnceCell<PathBuf>>>,
}

impl<F: ModuleFetcher> CachingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            clones: DashMap::new(),
        }
    }

    /// Number of distinct repositories successfully fetched so far.
    pub fn cached_count(&self) -> usize {
        self.clones.iter().filter(|entry| entry.value().initialized()).count()
    }
}

impl<F: ModuleFetcher> ModuleFetcher for CachingFetcher<F> {
    async fn fetch(&self, dependency: &DependencyRef, scratch_root: &Path) -> Result<PathBuf> {
        let key = (dependency.repo_url.clone(), dependency.git_ref.clone());
        // Clone the cell out so the map shard is not locked across the await
        let cell = self.clones.entry(key).or_default().value().clone();

        if cell.initialized() {
            tracing::debug!("Reusing checkout of {}@{}", dependency.repo_name(), dependency.git_ref);
        }

        let path = cell.get_or_try_init(|| self.inner.fetch(dependency, scratch_root)).await?;
        Ok(path.clone())
    }
}
