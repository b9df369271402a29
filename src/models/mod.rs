//! Shared data models for module dependency resolution.
//!
//! These types flow through the whole pipeline:
//!
//! - [`DependencyRef`] is produced by the source extractor from a single
//!   `source = "git::<url>//<path>?ref=<tag>"` line.
//! - [`ResolutionOutcome`] is what the resolver records for each reference.
//! - [`DependencyTree`] ties the outcome of one analyzed entry file to the label
//!   of the directory it lives in.
//!
//! All of them are immutable once built. The resolver assembles outcomes
//! bottom-up and hands the finished tree to the projector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one module reference: repository URL, in-repo sub path and pinned ref.
///
/// Equality and hashing are structural, so two lines naming the same URL, path
/// and ref produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyRef {
    /// Git URL as written after the `git::` prefix
    pub repo_url: String,
    /// Sub directory named after the `//` separator
    pub sub_path: String,
    /// Tag or branch named by `?ref=`
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl DependencyRef {
    pub fn new(
        repo_url: impl Into<String>,
        sub_path: impl Into<String>,
        git_ref: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            sub_path: sub_path.into(),
            git_ref: git_ref.into(),
        }
    }

    /// Short repository name used for scratch directory names and log context.
    ///
    /// `https://example.com/org/network.git` → `network`
    pub fn repo_name(&self) -> &str {
        self.repo_url
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .map(|name| name.trim_end_matches(".git"))
            .filter(|name| !name.is_empty())
            .unwrap_or("repo")
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}//{}?ref={}", self.repo_url, self.sub_path, self.git_ref)
    }
}

/// Result of resolving one [`DependencyRef`].
///
/// Each variant is explicit so "no children because the module declares none"
/// can never be confused with "no children because it could not be fetched".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Entry file found and parsed, no dependency lines in it.
    NoDependencies,
    /// Entry file declared at least one dependency; each was resolved in turn.
    ///
    /// Children are kept in source-line order. Keys are unique: a reference
    /// repeated within one file is resolved once, at its first position.
    Resolved(Vec<(DependencyRef, ResolutionOutcome)>),
    /// Clone, module lookup, or entry file discovery failed.
    FetchFailed,
    /// The reference is already on the active resolution path.
    CycleDetected,
    /// Resolution stopped at the configured maximum depth.
    DepthLimitReached,
}

impl ResolutionOutcome {
    /// Wraps resolved children, falling back to [`NoDependencies`](Self::NoDependencies)
    /// when the list is empty.
    pub fn from_children(children: Vec<(DependencyRef, ResolutionOutcome)>) -> Self {
        if children.is_empty() {
            Self::NoDependencies
        } else {
            Self::Resolved(children)
        }
    }

    /// Children of a resolved outcome; empty for every other variant.
    pub fn children(&self) -> &[(DependencyRef, ResolutionOutcome)] {
        match self {
            Self::Resolved(children) => children,
            _ => &[],
        }
    }

    /// Looks up the outcome recorded for a direct child.
    pub fn get(&self, dependency: &DependencyRef) -> Option<&ResolutionOutcome> {
        self.children().iter().find(|(dep, _)| dep == dependency).map(|(_, outcome)| outcome)
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::CycleDetected | Self::DepthLimitReached)
    }

    /// Number of outcomes in this subtree that are leaves
    /// (`NoDependencies` or one of the failure sentinels).
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Resolved(children) => children.iter().map(|(_, o)| o.leaf_count()).sum(),
            _ => 1,
        }
    }
}

/// The resolved dependencies of one analyzed entry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTree {
    /// Label of the analyzed file (its containing directory, colons removed)
    pub root_label: String,
    /// Outcome for the entry file itself
    pub outcome: ResolutionOutcome,
}

impl DependencyTree {
    pub fn new(root_label: impl Into<String>, outcome: ResolutionOutcome) -> Self {
        Self {
            root_label: root_label.into(),
            outcome,
        }
    }

    /// True when the entry file declared no dependencies at all.
    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, ResolutionOutcome::NoDependencies)
    }

    /// Every reference in the tree whose outcome is a failure sentinel,
    /// in depth-first order.
    pub fn failures(&self) -> Vec<(&DependencyRef, &ResolutionOutcome)> {
        let mut failures = Vec::new();
        collect_failures(&self.outcome, &mut failures);
        failures
    }

    /// Total number of references in the tree, duplicates across branches included.
    pub fn dependency_count(&self) -> usize {
        fn count(outcome: &ResolutionOutcome) -> usize {
            outcome.children().iter().map(|(_, child)| 1 + count(child)).sum()
        }
        count(&self.outcome)
    }
}

fn collect_failures<'a>(
    outcome: &'a ResolutionOutcome,
    out: &mut Vec<(&'a DependencyRef, &'a ResolutionOutcome)>,
) {
    for (dependency, child) in outcome.children() {
        if child.is_failure() {
            out.push((dependency, child));
        }
        collect_failures(child, out);
    }
}
