//! Recursive resolution of module references.
//!
//! Starting from one entry file, the resolver extracts every git source,
//! fetches each referenced repository, locates the module directory and its
//! entry file, and recurses. The result is a [`ResolutionOutcome`] tree keyed
//! by [`DependencyRef`].
//!
//! # Error tolerance
//!
//! Only the top-level entry file is fatal: if it cannot be read,
//! [`DependencyResolver::resolve`] returns the error. Everything below it is
//! local to one reference. A failed clone, a missing module directory, a
//! missing or unreadable nested entry file all become
//! [`ResolutionOutcome::FetchFailed`] for that reference, an error is logged
//! naming the repository URL, and its siblings are resolved as usual.
//!
//! # Termination
//!
//! - A reference that is already on the active path (the chain of references
//!   from the entry file down to the current one) is recorded as
//!   [`ResolutionOutcome::CycleDetected`] and not fetched again.
//! - A reference deeper than `max_depth` is recorded as
//!   [`ResolutionOutcome::DepthLimitReached`]. Top-level references are at
//!   depth 1.
//!
//! The same reference appearing in two unrelated branches is not a cycle;
//! both branches resolve it independently.
//!
//! # Ordering and concurrency
//!
//! Children keep the order of their source lines. A reference repeated within
//! one file is resolved once, at its first position. With `max_parallel == 1`
//! resolution is strictly sequential and depth-first. Larger values resolve
//! siblings concurrently on the current task while a semaphore bounds the
//! number of fetches in flight; the resulting tree is the same either way.


use anyhow::Result;
use futures::future::{LocalBoxFuture, join_all};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;

use crate::constants::{DEFAULT_MAX_DEPTH, ENTRY_FILE_NAMES};
use crate::fetcher::ModuleFetcher;
use crate::git::strip_auth_from_url;
use crate::locator;
use crate::models::{DependencyRef, ResolutionOutcome};
use crate::source::read_dependencies;

/// Tuning knobs for a [`DependencyResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Deepest reference level that is still fetched
    pub max_depth: usize,
    /// Maximum number of concurrent fetches; 1 means sequential
    pub max_parallel: usize,
    /// Entry file names tried in each module directory, in order
    pub entry_files: Vec<String>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_parallel: 1,
            entry_files: ENTRY_FILE_NAMES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Resolves the module reference tree below an entry file.
pub struct DependencyResolver<F> {
    fetcher: F,
    options: ResolverOptions,
    fetch_slots: Semaphore,
}

impl<F: ModuleFetcher> DependencyResolver<F> {
    pub fn new(fetcher: F, options: ResolverOptions) -> Self {
        let permits = options.max_parallel.max(1);
        Self {
            fetcher,
            options,
            fetch_slots: Semaphore::new(permits),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve every reference reachable from `entry`, cloning below `scratch_root`.
    ///
    /// # Errors
    ///
    /// Only when `entry` itself cannot be read. Any failure further down is
    /// recorded in the returned tree instead.
    pub async fn resolve(&self, entry: &Path, scratch_root: &Path) -> Result<ResolutionOutcome> {
        let dependencies = read_dependencies(entry).await?;
        tracing::info!(
            "Resolving {} direct reference(s) of {}",
            dependencies.len(),
            entry.display()
        );
        Ok(self.resolve_children(dependencies, Vec::new(), scratch_root).await)
    }

    fn resolve_children<'a>(
        &'a self,
        dependencies: Vec<DependencyRef>,
        active_path: Vec<DependencyRef>,
        scratch_root: &'a Path,
    ) -> LocalBoxFuture<'a, ResolutionOutcome> {
        Box::pin(async move {
            let mut seen = HashSet::new();
            let unique: Vec<DependencyRef> =
                dependencies.into_iter().filter(|dep| seen.insert(dep.clone())).collect();

            let children = if self.options.max_parallel > 1 {
                let pending = unique.into_iter().map(|dep| {
                    let active_path = &active_path;
                    async move {
                        let outcome = self.resolve_dependency(&dep, active_path, scratch_root).await;
                        (dep, outcome)
                    }
                });
                join_all(pending).await
            } else {
                let mut children = Vec::with_capacity(unique.len());
                for dep in unique {
                    let outcome = self.resolve_dependency(&dep, &active_path, scratch_root).await;
                    children.push((dep, outcome));
                }
                children
            };

            ResolutionOutcome::from_children(children)
        })
    }

    async fn resolve_dependency(
        &self,
        dependency: &DependencyRef,
        active_path: &[DependencyRef],
        scratch_root: &Path,
    ) -> ResolutionOutcome {
        if active_path.contains(dependency) {
            let cycle = active_path
                .iter()
                .skip_while(|d| *d != dependency)
                .chain(std::iter::once(dependency))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" → ");
            tracing::warn!("Circular dependency detected: {cycle}");
            return ResolutionOutcome::CycleDetected;
        }

        let depth = active_path.len() + 1;
        if depth > self.options.max_depth {
            tracing::warn!(
                "Maximum depth {} reached at {}, not resolving further",
                self.options.max_depth,
                dependency
            );
            return ResolutionOutcome::DepthLimitReached;
        }

        let entry = match self.fetch_entry_file(dependency, scratch_root).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!(
                    "Error downloading {}: {:#}",
                    strip_auth_from_url(&dependency.repo_url),
                    e
                );
                return ResolutionOutcome::FetchFailed;
            }
        };

        let dependencies = match read_dependencies(&entry).await {
            Ok(dependencies) => dependencies,
            Err(e) => {
                tracing::error!(
                    "Error reading module of {}: {:#}",
                    strip_auth_from_url(&dependency.repo_url),
                    e
                );
                return ResolutionOutcome::FetchFailed;
            }
        };
        tracing::debug!("{} declares {} reference(s)", dependency, dependencies.len());

        let mut next_path = active_path.to_vec();
        next_path.push(dependency.clone());
        self.resolve_children(dependencies, next_path, scratch_root).await
    }

    /// Fetch, locate and pick the entry file; any step failing fails the reference.
    async fn fetch_entry_file(
        &self,
        dependency: &DependencyRef,
        scratch_root: &Path,
    ) -> Result<PathBuf> {
        let checkout = {
            let _slot = self.fetch_slots.acquire().await?;
            tracing::debug!("Fetching {}", dependency);
            self.fetcher.fetch(dependency, scratch_root).await?
        };

        let module_dir = locator::locate(&checkout, &dependency.sub_path)?;
        locator::entry_file(&module_dir, &self.options.entry_files)
    }
}
