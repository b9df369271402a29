//! Projection of resolved dependencies into a renderable labeled tree.
//!
//! [`project`] turns a [`DependencyTree`] into a [`NamedNode`] tree, which
//! every output format consumes:
//!
//! - [`render::render_text`] - the indented report
//! - [`render::render_box_tree`] - the box-drawing tree
//! - [`render::render`] into a [`GraphSink`], e.g. [`DotGraph`] for Graphviz
//! - `serde_json` directly, since [`NamedNode`] is serializable
//!
//! # Labels
//!
//! A reference becomes `"<url> // <path> // <ref>"` with every `:` replaced
//! by `/`, so `https://host/r.git` renders as `https///host/r.git`. Colons
//! are not valid in Graphviz node names without quoting, and the
//! substitution keeps URLs readable.
//!
//! Failure outcomes get a single synthetic child whose label says what went
//! wrong. Sibling labels may repeat; they are never merged.

pub mod graph;
pub mod render;

pub use graph::DotGraph;
pub use render::{GraphSink, NodeHandle, render, render_box_tree, render_text};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CYCLE_DETECTED_LABEL, DEPTH_LIMIT_LABEL, FETCH_FAILED_LABEL, LABEL_SEPARATOR,
};
use crate::models::{DependencyRef, DependencyTree, ResolutionOutcome};

/// A labeled node with ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedNode {
    pub label: String,
    #[serde(default)]
    pub children: Vec<NamedNode>,
}

impl NamedNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<NamedNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True for the synthetic leaves attached to failed references.
    pub fn is_error_leaf(&self) -> bool {
        self.is_leaf()
            && matches!(
                self.label.as_str(),
                FETCH_FAILED_LABEL | CYCLE_DETECTED_LABEL | DEPTH_LIMIT_LABEL
            )
    }

    /// Nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Childless nodes in this subtree, including `self` when it has no children.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }
}

/// Display label of a reference: `url // path // ref` with colons turned into slashes.
pub fn label_for(dependency: &DependencyRef) -> String {
    [dependency.repo_url.as_str(), &dependency.sub_path, &dependency.git_ref]
        .join(LABEL_SEPARATOR)
        .replace(':', "/")
}

/// Project a whole tree; the root node carries the tree's root label.
pub fn project(tree: &DependencyTree) -> NamedNode {
    project_outcome(tree.root_label.clone(), &tree.outcome)
}

/// Project one outcome under the given label.
pub fn project_outcome(label: String, outcome: &ResolutionOutcome) -> NamedNode {
    let children = match outcome {
        ResolutionOutcome::NoDependencies => Vec::new(),
        ResolutionOutcome::Resolved(children) => children
            .iter()
            .map(|(dependency, child)| project_outcome(label_for(dependency), child))
            .collect(),
        ResolutionOutcome::FetchFailed => vec![NamedNode::leaf(FETCH_FAILED_LABEL)],
        ResolutionOutcome::CycleDetected => vec![NamedNode::leaf(CYCLE_DETECTED_LABEL)],
        ResolutionOutcome::DepthLimitReached => vec![NamedNode::leaf(DEPTH_LIMIT_LABEL)],
    };
    NamedNode::with_children(label, children)
}
