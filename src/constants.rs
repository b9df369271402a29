//! Global constants used throughout the tfdeps codebase.
//!
//! Timeouts, recursion limits, file names and labels that more than one
//! module relies on live here so the magic values stay discoverable.

use std::time::Duration;

/// Timeout for a single shallow clone (120 seconds).
///
/// Shallow clones usually finish in a few seconds; the limit exists so a
/// credential prompt or a stalled connection cannot hang the whole run.
pub const GIT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for quick git queries such as `git --version`.
pub const GIT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Starting delay for clone retry backoff (250ms), doubled per attempt.
pub const FETCH_RETRY_BASE_DELAY_MS: u64 = 250;

/// Maximum delay between clone retries.
pub const FETCH_RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

/// Default maximum recursion depth below the analyzed entry file.
///
/// Guards against reference chains that never terminate. Real module trees
/// rarely go deeper than five or six levels.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Entry files looked up inside a module directory, in priority order.
pub const ENTRY_FILE_NAMES: &[&str] = &["main.tf", "terragrunt.hcl"];

/// Directory names never descended into when scanning for entry files.
pub const IGNORED_DIRS: &[&str] = &[".terraform", ".terragrunt-cache", ".git"];

/// Name of the per-user scratch directory under the system temp dir.
pub const SCRATCH_DIR_NAME: &str = "tfdeps";

/// Separator placed between the URL, path and ref of a projected label.
pub const LABEL_SEPARATOR: &str = " // ";

/// Text printed beneath childless nodes in the indented report.
pub const NO_FURTHER_DEPENDENCIES: &str = "No further dependencies";

/// Label of the synthetic leaf attached to a reference that could not be fetched.
pub const FETCH_FAILED_LABEL: &str = "ERROR DOWNLOADING";

/// Label of the synthetic leaf attached to a reference that closes a cycle.
pub const CYCLE_DETECTED_LABEL: &str = "CIRCULAR DEPENDENCY";

/// Label of the synthetic leaf attached where the depth guard stopped recursion.
pub const DEPTH_LIMIT_LABEL: &str = "MAX DEPTH REACHED";
