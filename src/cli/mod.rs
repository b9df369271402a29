//! Command-line interface for tfdeps.
//!
//! # Commands
//!
//! - `analyze <FILE>` - resolve the module dependencies of one `main.tf` or
//!   `terragrunt.hcl`
//! - `scan <DIR>` - do the same for every entry file below a directory
//!
//! Both print a report to stdout and can also write a Graphviz graph:
//!
//! ```bash
//! tfdeps analyze live/prod/main.tf
//! tfdeps analyze live/prod/main.tf --format tree --graph deps.png
//! tfdeps scan live --max-parallel 4 --reuse-clones --format json
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - debug logging
//! - `--quiet` - errors only
//! - `--no-progress` - no progress bar (also `TFDEPS_NO_PROGRESS`)
//! - `--config` - path to a config file (also `TFDEPS_CONFIG`)
//!
//! Logs go to stderr. `RUST_LOG` overrides the verbosity flags.

mod analyze;
pub mod common;
mod scan;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime settings taken from the global flags.
///
/// Kept separate from [`Cli`] so commands can be driven programmatically.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub log_level: String,
    pub no_progress: bool,
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: DEFAULT_LOG_FILTER.to_string(),
            ..Self::default()
        }
    }

    /// The filter for this run; `RUST_LOG` wins when set.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }

    /// Install the global subscriber, writing to stderr.
    ///
    /// Later calls are no-ops.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Library warnings only; the CLI's own progress messages at info.
const DEFAULT_LOG_FILTER: &str = "warn,tfdeps_cli::cli=info";

#[derive(Parser, Debug)]
#[command(
    name = "tfdeps",
    about = "Resolve and visualize Terraform/Terragrunt module dependencies pinned to Git refs",
    version,
    long_about = "tfdeps follows every `source = \"git::<url>//<path>?ref=<tag>\"` reference \
                  in a Terraform or Terragrunt file, clones each module at its pinned ref, \
                  and reports the full transitive dependency tree."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a config file (defaults to ~/.tfdeps/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the dependency tree of one main.tf or terragrunt.hcl file
    Analyze(analyze::AnalyzeCommand),

    /// Resolve every main.tf and terragrunt.hcl below a directory
    Scan(scan::ScanCommand),
}

impl Cli {
    /// Set up logging from the global flags and run the subcommand.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            DEFAULT_LOG_FILTER.to_string()
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Run the subcommand with an explicit [`CliConfig`]; logging is left alone.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Analyze(cmd) => cmd.execute(&config).await,
            Commands::Scan(cmd) => cmd.execute(&config).await,
        }
    }
}
