//! Renderers over [`NamedNode`] trees.
//!
//! All renderers walk the tree depth-first in child order, so every output
//! agrees on shape.

use colored::Colorize;

use super::NamedNode;
use crate::constants::NO_FURTHER_DEPENDENCIES;

/// Opaque handle to a node registered with a [`GraphSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub usize);

/// Receiver of graph nodes and edges.
///
/// Every call to `add_node` creates a new node, even when the label was seen
/// before; that is how repeated labels stay distinct in the drawing.
pub trait GraphSink {
    fn add_node(&mut self, label: &str) -> NodeHandle;
    fn add_edge(&mut self, from: NodeHandle, to: NodeHandle);
}

/// Register `node` and its descendants with `sink`; returns the root's handle.
///
/// Each child is added and linked to its parent before its own subtree, so
/// nodes and edges both arrive in pre-order.
pub fn render<S: GraphSink + ?Sized>(node: &NamedNode, sink: &mut S) -> NodeHandle {
    let root = sink.add_node(&node.label);
    render_children(node, root, sink);
    root
}

fn render_children<S: GraphSink + ?Sized>(node: &NamedNode, parent: NodeHandle, sink: &mut S) {
    for child in &node.children {
        let handle = sink.add_node(&child.label);
        sink.add_edge(parent, handle);
        render_children(child, handle, sink);
    }
}

/// Indented listing, two spaces per level.
///
/// Each childless node is followed by a `No further dependencies` line one
/// level deeper.
pub fn render_text(node: &NamedNode, indent: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(node.node_count() + node.leaf_count());
    push_text(node, indent, &mut lines);
    lines
}

fn push_text(node: &NamedNode, indent: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}", "  ".repeat(indent), node.label));
    if node.is_leaf() {
        lines.push(format!("{}{}", "  ".repeat(indent + 1), NO_FURTHER_DEPENDENCIES));
    } else {
        for child in &node.children {
            push_text(child, indent + 1, lines);
        }
    }
}

/// Box-drawing tree, one line per node, with terminal colors.
///
/// ```text
/// live/prod
/// ├── https///example.com/net.git // modules/vpc // v1
/// │   └── ERROR DOWNLOADING
/// └── https///example.com/app.git // svc // v3
/// ```
pub fn render_box_tree(node: &NamedNode) -> Vec<String> {
    let mut lines = vec![node.label.cyan().bold().to_string()];
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        push_box(child, "", i + 1 == count, &mut lines);
    }
    lines
}

fn push_box(node: &NamedNode, prefix: &str, is_last: bool, lines: &mut Vec<String>) {
    let connector = if is_last { "└── " } else { "├── " };
    let label = if node.is_error_leaf() {
        node.label.red().bold().to_string()
    } else if node.is_leaf() {
        node.label.normal().to_string()
    } else {
        node.label.cyan().to_string()
    };
    lines.push(format!("{}{}{}", prefix.bright_black(), connector.bright_black(), label));

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        push_box(child, &child_prefix, i + 1 == count, lines);
    }
}
