//! Flags and output helpers shared by `analyze` and `scan`.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use super::CliConfig;
use crate::analyzer::AnalyzeOptions;
use crate::config::Config;
use crate::tree::{DotGraph, NamedNode, render, render_box_tree, render_text};

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented listing, two spaces per level
    #[default]
    Text,
    /// Box-drawing tree with colors
    Tree,
    /// JSON of the labeled tree
    Json,
}

/// Run settings accepted by every command.
///
/// Each flag, when given, overrides the matching config file key.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write a graph: .dot/.gv for DOT text, any other extension is rendered by Graphviz
    #[arg(short, long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Keep cloned repositories after the run
    #[arg(long)]
    pub keep_scratch: bool,

    /// Directory that receives the per-run clone directories
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Deepest reference level that is still fetched
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Maximum concurrent clones; 1 resolves strictly in order
    #[arg(short = 'j', long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Clone each repository and ref only once per run
    #[arg(long)]
    pub reuse_clones: bool,

    /// Per-clone timeout in seconds; 0 disables it
    #[arg(long, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,

    /// Extra clone attempts after a failure
    #[arg(long, value_name = "N")]
    pub fetch_retries: Option<usize>,
}

impl RunArgs {
    /// The flags as a config layer; switches that were not given stay unset.
    pub fn overrides(&self) -> Config {
        Config {
            scratch_dir: self.scratch_dir.as_ref().map(|p| p.display().to_string()),
            keep_scratch: self.keep_scratch.then_some(true),
            max_depth: self.max_depth,
            fetch_timeout_secs: self.fetch_timeout,
            fetch_retries: self.fetch_retries,
            max_parallel: self.max_parallel,
            reuse_clones: self.reuse_clones.then_some(true),
            entry_files: None,
        }
    }

    /// Config file overlaid with these flags.
    pub async fn load_options(&self, cli: &CliConfig) -> Result<AnalyzeOptions> {
        let file = Config::load_with_optional(cli.config_path.clone()).await?;
        let mut options = file.merge(self.overrides()).to_options()?;
        options.show_progress = !cli.no_progress;
        Ok(options)
    }
}

/// One tree in the requested format.
pub fn format_node(node: &NamedNode, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(node, 0).join("\n"),
        OutputFormat::Tree => render_box_tree(node).join("\n"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(node).context("Failed to serialize dependency tree")?
        }
    })
}

/// Draw every tree into one graph and write it to `path`.
pub async fn write_graph(nodes: &[NamedNode], path: &Path) -> Result<()> {
    let mut graph = DotGraph::new();
    for node in nodes {
        render(node, &mut graph);
    }
    tracing::debug!(
        "Graph has {} node(s) and {} edge(s)",
        graph.node_count(),
        graph.edge_count()
    );
    graph.write(path).await
}
