//! tfdeps - transitive module dependency trees for Terraform and Terragrunt
//!
//! Infrastructure code pins shared modules to Git refs:
//!
//! ```hcl
//! module "vpc" {
//!   source = "git::https://example.com/org/network.git//modules/vpc?ref=v1.4.0"
//! }
//! ```
//!
//! Each of those modules may pin further modules in turn. tfdeps clones every
//! referenced repository at its pinned ref, finds the module inside it, reads
//! that module's own references and keeps going until the whole tree is known.
//! Failed clones, cycles and overly deep chains become visible leaves of the
//! tree instead of aborting the run.
//!
//! # Pipeline
//!
//! 1. [`source`] extracts [`models::DependencyRef`] values from file contents
//! 2. [`fetcher`] shallow-clones a repository at a ref into a scratch directory
//! 3. [`locator`] finds the module directory and its entry file in the clone
//! 4. [`resolver`] drives 1-3 recursively into a [`models::ResolutionOutcome`]
//! 5. [`tree`] projects outcomes into labeled nodes and renders them as text,
//!    a box-drawing tree, JSON or a Graphviz graph
//!
//! [`analyzer`] wraps one run (git check, scratch root, cleanup) and scans
//! whole directories. [`cli`] is the `tfdeps` binary's command surface.
//!
//! # Supporting Modules
//!
//! - [`config`] - optional `~/.tfdeps/config.toml`
//! - [`core`] - [`core::TfdepsError`] and user-facing error formatting
//! - [`git`] - system git wrapper with timeouts
//! - [`utils`] - platform helpers and progress bars
//! - [`constants`] - timeouts, limits, file names and labels
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tfdeps_cli::analyzer::{AnalyzeOptions, analyze_file};
//! use tfdeps_cli::tree::{project, render_text};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tree = analyze_file(Path::new("live/prod/main.tf"), &AnalyzeOptions::default()).await?;
//! for line in render_text(&project(&tree), 0) {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod fetcher;
pub mod git;
pub mod locator;
pub mod models;
pub mod resolver;
pub mod source;
pub mod tree;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
