//! `tfdeps analyze <FILE>`

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{RunArgs, format_node, write_graph};
use crate::analyzer::analyze_file;
use crate::tree::project;

#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// The main.tf or terragrunt.hcl file to analyze
    pub file: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

impl AnalyzeCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let options = self.run.load_options(cli).await?;
        tracing::debug!("Analyzing {} with {:?}", self.file.display(), options);

        let tree = analyze_file(&self.file, &options).await?;
        let node = project(&tree);
        println!("{}", format_node(&node, self.run.format)?);

        let failures = tree.failures();
        if !failures.is_empty() {
            tracing::warn!(
                "{} of {} reference(s) in {} could not be fully resolved",
                failures.len(),
                tree.dependency_count(),
                self.file.display()
            );
        }

        if let Some(path) = &self.run.graph {
            write_graph(std::slice::from_ref(&node), path).await?;
            tracing::info!("Graph written to {}", path.display());
        }
        Ok(())
    }
}
