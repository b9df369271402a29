//! Progress indicators
//!
//! A thin wrapper over `indicatif` with tfdeps styling. Bars are hidden when
//! the `TFDEPS_NO_PROGRESS` environment variable is set, when `--no-progress`
//! is passed, or when stderr is not a terminal (indicatif's own check).
//!
//! ```rust
//! use tfdeps_cli::utils::progress::ProgressBar;
//!
//! let progress = ProgressBar::new(3, true);
//! progress.set_prefix("Scanning");
//! for file in ["a/main.tf", "b/main.tf", "c/terragrunt.hcl"] {
//!     progress.set_message(file);
//!     progress.inc(1);
//! }
//! progress.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// Environment variable that disables every progress indicator.
pub const NO_PROGRESS_ENV: &str = "TFDEPS_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// A progress bar with consistent styling.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a bar for `len` units of work; hidden unless `enabled`.
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            bar.set_style(default_style());
            bar
        };
        Self {
            inner: bar,
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("━╸━")
}
