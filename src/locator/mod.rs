//! Finding a module directory and its entry file inside a fetched repository.
//!
//! Two steps, mirroring how Terraform interprets `<url>//<path>`:
//!
//! 1. [`locate`] finds the directory named by the reference's sub path.
//! 2. [`entry_file`] picks the configuration file inside it, `main.tf` first
//!    and `terragrunt.hcl` as the fallback.
//!
//! # Lookup order
//!
//! The sub path is first tried relative to the repository root, which is what
//! the reference means in practice. Only when that directory does not exist is
//! the whole checkout searched for a directory whose trailing components equal
//! the sub path. The search walks entries sorted by name and returns the first
//! hit, so when several directories share the name the lexicographically first
//! one wins. `.git` is never descended into.
//!
//! A sub path never leaves the checkout: `..` components and absolute paths
//! are rejected, and a match reached through a symlink pointing outside the
//! repository root counts as not found.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::core::TfdepsError;

/// Find the directory `sub_path` names inside `repo_root`.
///
/// An empty sub path (or `.`) names the repository root itself.
///
/// # Errors
///
/// [`TfdepsError::ModuleNotFound`] when no matching directory exists inside
/// `repo_root`, or when `sub_path` tries to step outside of it.
pub fn locate(repo_root: &Path, sub_path: &str) -> Result<PathBuf> {
    let not_found = || -> anyhow::Error {
        TfdepsError::ModuleNotFound {
            sub_path: sub_path.to_string(),
            repo: repo_root.display().to_string(),
        }
        .into()
    };

    if escapes_root(sub_path) {
        tracing::warn!("Refusing sub path '{}': it points outside the repository", sub_path);
        return Err(not_found());
    }

    let components = sub_path_components(sub_path);
    if components.is_empty() {
        return Ok(repo_root.to_path_buf());
    }

    let direct = components.iter().fold(repo_root.to_path_buf(), |acc, c| acc.join(c));
    if direct.is_dir() && is_within(repo_root, &direct) {
        return Ok(direct);
    }

    tracing::debug!(
        "'{}' is not at the root of {}, searching the checkout",
        sub_path,
        repo_root.display()
    );

    let found = WalkDir::new(repo_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .find(|entry| ends_with_components(entry.path(), &components))
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_within(repo_root, path));

    found.ok_or_else(not_found)
}

/// Pick the entry file inside `module_dir`, trying `candidates` in order.
///
/// # Errors
///
/// Logs a warning and returns [`TfdepsError::EntryFileMissing`] when none of
/// the candidates exists as a file.
pub fn entry_file<S: AsRef<str>>(module_dir: &Path, candidates: &[S]) -> Result<PathBuf> {
    for name in candidates {
        let candidate = module_dir.join(name.as_ref());
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let names: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
    tracing::warn!("No {} file was found in {}", names.join(" or "), module_dir.display());
    Err(TfdepsError::EntryFileMissing {
        dir: module_dir.display().to_string(),
    }
    .into())
}

fn escapes_root(sub_path: &str) -> bool {
    sub_path.starts_with(['/', '\\'])
        || Path::new(sub_path).is_absolute()
        || Path::new(sub_path).has_root()
        || sub_path.split(['/', '\\']).any(|c| c == ".." || c.contains(':'))
}

// Both sides canonicalized so symlinks inside the clone cannot lead out of it
fn is_within(repo_root: &Path, path: &Path) -> bool {
    match (repo_root.canonicalize(), path.canonicalize()) {
        (Ok(root), Ok(path)) => path.starts_with(root),
        _ => false,
    }
}

fn sub_path_components(sub_path: &str) -> Vec<&str> {
    sub_path.split(['/', '\\']).filter(|c| !c.is_empty() && *c != ".").collect()
}

fn ends_with_components(path: &Path, components: &[&str]) -> bool {
    let tail: Vec<_> = path
        .components()
        .rev()
        .take(components.len())
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();

    tail.len() == components.len() && tail.iter().rev().zip(components).all(|(a, b)| a == b)
}
