//! Graphviz output through petgraph.

use anyhow::{Context, Result};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::render::{GraphSink, NodeHandle};
use crate::core::TfdepsError;
use crate::utils::platform::find_graphviz;

/// A directed graph of labels, serializable as DOT.
///
/// Edges carry an empty label; `Config::EdgeNoLabel` keeps it out of the
/// output, but `Dot` still needs a displayable edge weight.
#[derive(Debug, Default)]
pub struct DotGraph {
    graph: DiGraph<String, &'static str>,
}

impl GraphSink for DotGraph {
    fn add_node(&mut self, label: &str) -> NodeHandle {
        NodeHandle(self.graph.add_node(label.to_string()).index())
    }

    fn add_edge(&mut self, from: NodeHandle, to: NodeHandle) {
        self.graph.add_edge(NodeIndex::new(from.0), NodeIndex::new(to.0), "");
    }
}

impl DotGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }

    /// Write the graph to `path`.
    ///
    /// `.dot` and `.gv` files receive DOT text. Any other extension is used as
    /// the Graphviz output format (`png`, `svg`, `pdf`...) and the DOT text is
    /// piped through `dot -T<ext>`.
    ///
    /// # Errors
    ///
    /// [`TfdepsError::GraphRenderFailed`] when the extension is missing,
    /// Graphviz is not installed, or `dot` exits non-zero.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| TfdepsError::GraphRenderFailed {
                reason: format!(
                    "{} has no extension; use .dot, .gv or an image format such as .png",
                    path.display()
                ),
            })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        if matches!(format.as_str(), "dot" | "gv") {
            tokio::fs::write(path, self.to_dot())
                .await
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            tracing::info!("Wrote DOT graph to {}", path.display());
            return Ok(());
        }

        self.rasterize(&format, path).await
    }

    async fn rasterize(&self, format: &str, path: &Path) -> Result<()> {
        let dot = find_graphviz().ok_or_else(|| TfdepsError::GraphRenderFailed {
            reason: "Graphviz 'dot' was not found in PATH".to_string(),
        })?;

        tracing::debug!("Rendering {} with {} -T{}", path.display(), dot.display(), format);
        let mut child = Command::new(&dot)
            .arg(format!("-T{format}"))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TfdepsError::GraphRenderFailed {
                reason: format!("failed to start {}: {e}", dot.display()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(self.to_dot().as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(TfdepsError::GraphRenderFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        tracing::info!("Wrote {} graph to {}", format, path.display());
        Ok(())
    }
}
