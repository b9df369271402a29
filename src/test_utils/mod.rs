//! Test utilities for tfdeps
//!
//! Helpers for building real git repositories of Terraform modules in
//! temporary directories and for turning on logging inside tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use tfdeps_cli::test_utils::{ModuleRepoFixture, init_test_logging};
//!
//! # fn example() -> anyhow::Result<()> {
//! init_test_logging(None);
//! let temp = tempfile::tempdir()?;
//! let repo = ModuleRepoFixture::create(temp.path().join("modules.git"))?;
//! repo.write_module("vpc", "")?;
//! repo.commit_and_tag("v1")?;
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod git_helper;

pub use fixtures::{ModuleRepoFixture, file_url, source_line};
pub use git_helper::TestGit;

use regex::Regex;
use std::sync::{LazyLock, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

/// Removes terminal color codes, leaving the text as a plain terminal shows it.
///
/// Use this instead of `colored::control::set_override`, which changes color
/// output for every test in the process.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=tfdeps_cli=debug,git=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
