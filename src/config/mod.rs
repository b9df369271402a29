//! Configuration for tfdeps
//!
//! All settings are optional. They come from a TOML file and can be
//! overridden per run by command-line flags.
//!
//! # Location
//!
//! The first of these that is set wins:
//!
//! 1. `--config <PATH>`
//! 2. `$TFDEPS_CONFIG`
//! 3. `~/.tfdeps/config.toml` (`%LOCALAPPDATA%\tfdeps\config.toml` on Windows)
//!
//! An explicitly named file must exist. The default file is optional.
//!
//! # Format
//!
//! ```toml
//! scratch_dir = "~/tmp/tfdeps"   # parent of per-run clone directories
//! keep_scratch = false           # leave clones on disk after the run
//! max_depth = 32                 # deepest reference level that is fetched
//! fetch_timeout_secs = 120       # per clone; 0 disables the timeout
//! fetch_retries = 0              # extra clone attempts with backoff
//! max_parallel = 1               # concurrent clones; 1 is strictly sequential
//! reuse_clones = false           # one clone per (url, ref) per run
//! entry_files = ["main.tf", "terragrunt.hcl"]
//! ```
//!
//! Unknown keys are rejected so typos do not go unnoticed.

mod global;

pub use global::{CONFIG_ENV, Config};
