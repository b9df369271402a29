//! One analysis run: entry file in, [`DependencyTree`] out.
//!
//! [`analyze_file`] owns everything a run needs around the resolver: the git
//! availability check, a fresh [`ScratchRoot`], the choice of fetcher and the
//! cleanup afterwards. [`analyze_directory`] repeats that for every entry file
//! below a directory and keeps going when one of them fails.
//!
//! # Scratch retention
//!
//! Each analyzed file gets its own `run-<uuid>` scratch root, deleted as soon
//! as that file is resolved. `keep_scratch` leaves it in place for inspection.

mod scratch;

pub use scratch::{ScratchRoot, default_scratch_base};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{GIT_CLONE_TIMEOUT, IGNORED_DIRS};
use crate::core::TfdepsError;
use crate::fetcher::{CachingFetcher, GitFetcher, ModuleFetcher};
use crate::git::ensure_git_available;
use crate::models::DependencyTree;
use crate::resolver::{DependencyResolver, ResolverOptions};
use crate::utils::progress::ProgressBar;

/// Settings for one run, merged from the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Parent of the per-run scratch roots
    pub scratch_dir: PathBuf,
    pub keep_scratch: bool,
    pub resolver: ResolverOptions,
    /// Per-clone timeout; `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,
    pub fetch_retries: usize,
    /// Share one clone between references with the same URL and ref
    pub reuse_clones: bool,
    pub show_progress: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_base(),
            keep_scratch: false,
            resolver: ResolverOptions::default(),
            fetch_timeout: Some(GIT_CLONE_TIMEOUT),
            fetch_retries: 0,
            reuse_clones: false,
            show_progress: true,
        }
    }
}

impl AnalyzeOptions {
    fn git_fetcher(&self) -> GitFetcher {
        GitFetcher::new().with_timeout(self.fetch_timeout).with_retries(self.fetch_retries)
    }
}

/// Outcome of scanning a directory.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Trees of entry files that declared at least one dependency, in scan order
    pub trees: Vec<DependencyTree>,
    /// Entry files without any git source
    pub skipped: Vec<PathBuf>,
    /// Entry files whose run failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl ScanReport {
    pub fn files_scanned(&self) -> usize {
        self.trees.len() + self.skipped.len() + self.failed.len()
    }
}

/// Label of an analyzed file: its containing directory with colons removed.
///
/// `C:\infra\live\main.tf` becomes `C\infra\live`.
pub fn root_label(entry: &Path) -> String {
    let dir = entry.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    dir.display().to_string().replace(':', "")
}

/// Resolve the dependency tree of a single entry file with the system git.
///
/// # Errors
///
/// - [`TfdepsError::GitNotFound`] when git is not installed
/// - [`TfdepsError::EntryFileUnreadable`] when `entry` is missing or unreadable
/// - [`TfdepsError::ScratchRootUnavailable`] when the scratch root cannot be created
pub async fn analyze_file(entry: &Path, options: &AnalyzeOptions) -> Result<DependencyTree> {
    ensure_git_available().await?;
    analyze_with_git(entry, options).await
}

async fn analyze_with_git(entry: &Path, options: &AnalyzeOptions) -> Result<DependencyTree> {
    if options.reuse_clones {
        analyze_file_with(entry, CachingFetcher::new(options.git_fetcher()), options).await
    } else {
        analyze_file_with(entry, options.git_fetcher(), options).await
    }
}

/// Like [`analyze_file`], with a caller-supplied fetcher and no git check.
pub async fn analyze_file_with<F: ModuleFetcher>(
    entry: &Path,
    fetcher: F,
    options: &AnalyzeOptions,
) -> Result<DependencyTree> {
    let metadata = tokio::fs::metadata(entry).await;
    if !metadata.as_ref().is_ok_and(std::fs::Metadata::is_file) {
        return Err(TfdepsError::EntryFileUnreadable {
            path: entry.display().to_string(),
            reason: match metadata {
                Ok(_) => "not a regular file".to_string(),
                Err(e) => e.to_string(),
            },
        }
        .into());
    }

    let scratch = ScratchRoot::create(&options.scratch_dir, options.keep_scratch).await?;
    let resolver = DependencyResolver::new(fetcher, options.resolver.clone());
    let outcome = resolver.resolve(entry, scratch.path()).await;
    scratch.finish().await;

    let outcome = outcome.with_context(|| format!("Failed to analyze {}", entry.display()))?;
    Ok(DependencyTree::new(root_label(entry), outcome))
}

/// Every file below `dir` named one of `names`, grouped by name in the given
/// order: with the defaults, all `main.tf` first, then all `terragrunt.hcl`.
///
/// Files inside `.terraform`, `.terragrunt-cache` and `.git` directories are
/// skipped. Each group is in path order.
pub fn find_entry_files<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&dir.display().to_string());
    let mut files = Vec::new();

    for name in names {
        let pattern = format!("{base}/**/{}", glob::Pattern::escape(name.as_ref()));
        let matches = glob::glob(&pattern)
            .with_context(|| format!("Invalid search pattern {pattern}"))?;
        for entry in matches {
            match entry {
                Ok(path) if !is_ignored(dir, &path) && path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping unreadable path: {}", e),
            }
        }
    }

    Ok(files)
}

fn is_ignored(base: &Path, path: &Path) -> bool {
    path.strip_prefix(base).unwrap_or(path).components().any(|c| {
        c.as_os_str().to_str().is_some_and(|name| IGNORED_DIRS.contains(&name))
    })
}

/// Analyze every entry file below `dir`.
///
/// A failure on one file is logged and recorded in [`ScanReport::failed`];
/// the scan continues with the next file.
///
/// # Errors
///
/// Only when `dir` is not a directory or git is not installed.
pub async fn analyze_directory(dir: &Path, options: &AnalyzeOptions) -> Result<ScanReport> {
    if !dir.is_dir() {
        return Err(TfdepsError::Other {
            message: format!("Not a directory: {}", dir.display()),
        }
        .into());
    }
    let entry_files = &options.resolver.entry_files;
    let files = find_entry_files(dir, entry_files)?;
    let mut report = ScanReport::default();
    if files.is_empty() {
        tracing::warn!("No {} files found in {}", entry_files.join(" or "), dir.display());
        return Ok(report);
    }
    ensure_git_available().await?;
    tracing::info!("Found {} entry file(s) in {}", files.len(), dir.display());

    let progress = ProgressBar::new(files.len() as u64, options.show_progress);
    progress.set_prefix("Analyzing files");

    for file in files {
        progress.set_message(file.display().to_string());
        tracing::info!("Analyzing file: {}", file.display());

        match analyze_with_git(&file, options).await {
            Ok(tree) if tree.is_empty() => {
                tracing::info!("No dependencies found for file: {}", file.display());
                report.skipped.push(file);
            }
            Ok(tree) => report.trees.push(tree),
            Err(e) => {
                tracing::error!("Failed to analyze {}: {:#}", file.display(), e);
                report.failed.push((file, format!("{e:#}")));
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(report)
}
