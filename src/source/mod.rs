//! Extraction of module references from Terraform and Terragrunt files.
//!
//! Only one textual form is recognized, one line at a time:
//!
//! ```text
//! source = "git::<url>//<path>?ref=<tag>"
//! ```
//!
//! Whitespace around `=` is tolerated. Everything else in the file is ignored;
//! this is not an HCL parser, so a `source` string split over several lines is
//! not picked up. Lines that do not match are skipped silently since most lines
//! of a configuration file are not source declarations.
//!
//! # Matching rules
//!
//! - The quoted value runs to the last `"` on the line.
//! - `<url>` runs up to the last `//` that is followed by a path and `?ref=`,
//!   so scheme separators such as `https://` stay part of the URL.
//! - `<tag>` is the remainder of the value after `?ref=`.
//!
//! # Examples
//!
//! ```rust
//! use tfdeps_cli::source::extract_dependencies;
//!
//! let content = r#"
//! module "vpc" {
//!   source = "git::https://example.com/repo.git//modules/vpc?ref=v1.2.3"
//! }
//! "#;
//!
//! let deps = extract_dependencies(content);
//! assert_eq!(deps.len(), 1);
//! assert_eq!(deps[0].repo_url, "https://example.com/repo.git");
//! assert_eq!(deps[0].sub_path, "modules/vpc");
//! assert_eq!(deps[0].git_ref, "v1.2.3");
//! ```

use anyhow::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::core::TfdepsError;
use crate::models::DependencyRef;

static SOURCE_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"source\s*=\s*"(.+)""#).expect("valid source regex"));

static GIT_SOURCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git::(.+)//(.+)\?ref=(.+)").expect("valid git source regex"));

/// Extract the dependency declared on a single line, if any.
#[must_use]
pub fn extract_source(line: &str) -> Option<DependencyRef> {
    let value = SOURCE_ASSIGNMENT.captures(line)?.get(1)?.as_str();
    let caps = GIT_SOURCE.captures(value)?;

    Some(DependencyRef::new(&caps[1], &caps[2], &caps[3]))
}

/// Extract every dependency from file contents, in source line order.
///
/// Pure text to data; no filesystem or network access.
#[must_use]
pub fn extract_dependencies(content: &str) -> Vec<DependencyRef> {
    extract_from_lines(content.lines())
}

/// Extract every dependency from an already split sequence of lines.
pub fn extract_from_lines<'a, I>(lines: I) -> Vec<DependencyRef>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter_map(extract_source).collect()
}

/// Read an entry file and extract its dependencies.
///
/// Invalid UTF-8 is replaced rather than rejected, matching how the rest of
/// the file is treated as opaque text.
pub async fn read_dependencies(path: &Path) -> Result<Vec<DependencyRef>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| TfdepsError::EntryFileUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let dependencies = extract_dependencies(&content);
    tracing::debug!(
        "Found {} dependency reference(s) in {}",
        dependencies.len(),
        path.display()
    );
    Ok(dependencies)
}
