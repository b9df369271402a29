//! `tfdeps scan <DIR>`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{OutputFormat, RunArgs, format_node, write_graph};
use crate::analyzer::{ScanReport, analyze_directory};
use crate::core::TfdepsError;
use crate::tree::{NamedNode, project};

#[derive(Args, Debug)]
pub struct ScanCommand {
    /// Directory to search for main.tf and terragrunt.hcl files
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ScanCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let options = self.run.load_options(cli).await?;
        let report = analyze_directory(&self.dir, &options).await?;
        let nodes: Vec<NamedNode> = report.trees.iter().map(project).collect();

        if self.run.format == OutputFormat::Json {
            println!(
                "{}",
                serde_json::to_string_pretty(&nodes).context("Failed to serialize dependency trees")?
            );
        } else {
            print_report(&report, &nodes, self.run.format)?;
        }

        if let Some(path) = &self.run.graph {
            if nodes.is_empty() {
                tracing::warn!("No dependencies found; not writing {}", path.display());
            } else {
                write_graph(&nodes, path).await?;
                tracing::info!("Graph written to {}", path.display());
            }
        }

        if !report.failed.is_empty() {
            return Err(TfdepsError::Other {
                message: format!(
                    "{} of {} file(s) could not be analyzed",
                    report.failed.len(),
                    report.files_scanned()
                ),
            }
            .into());
        }
        Ok(())
    }
}

fn print_report(report: &ScanReport, nodes: &[NamedNode], format: OutputFormat) -> Result<()> {
    for node in nodes {
        println!("{}", format_node(node, format)?);
        println!();
    }

    for file in &report.skipped {
        println!("No dependencies found for file: {}", file.display());
    }

    for (file, reason) in &report.failed {
        eprintln!("{} {}: {}", "Failed to analyze".red(), file.display(), reason);
    }

    println!(
        "{} file(s) scanned: {} with dependencies, {} without, {} failed",
        report.files_scanned(),
        report.trees.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(())
}
