//! Error handling for tfdeps
//!
//! Two layers, the same way the rest of the crate is built:
//! 1. [`TfdepsError`] - strongly-typed failure modes raised by the library
//! 2. [`ErrorContext`] - a user-facing wrapper with details and a suggestion
//!
//! Library functions return [`anyhow::Result`] and attach context with
//! `.context(...)`. Typed errors travel inside the `anyhow::Error` and are
//! recovered at the CLI edge by [`user_friendly_error`].
//!
//! # Recoverable vs fatal
//!
//! Clone failures, missing module directories and missing entry files are
//! *local* to one dependency. The resolver never lets them escape: it logs a
//! diagnostic and records a `FetchFailed` outcome instead. Only an unreadable
//! top-level entry file, an unusable scratch root, invalid configuration or a
//! graph rendering failure reach the user as an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tfdeps_cli::core::{TfdepsError, user_friendly_error};
//!
//! let err = anyhow::Error::from(TfdepsError::GitNotFound);
//! let ctx = user_friendly_error(err);
//! ctx.display(); // colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for tfdeps operations.
#[derive(Error, Debug)]
pub enum TfdepsError {
    /// A git command returned a non-zero exit code or timed out
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git sub-command that failed (e.g. `clone`)
        operation: String,
        /// Captured standard error
        stderr: String,
    },

    /// The `git` executable could not be found on PATH
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Shallow clone of a dependency repository failed
    #[error("Failed to clone repository: {url}")]
    GitCloneFailed {
        /// URL that was being cloned
        url: String,
        /// Git's explanation
        reason: String,
    },

    /// The referenced sub directory does not exist inside the fetched repository
    #[error("Module directory '{sub_path}' not found in {repo}")]
    ModuleNotFound {
        sub_path: String,
        repo: String,
    },

    /// Neither recognized entry file exists in the module directory
    #[error("No main.tf or terragrunt.hcl file was found in {dir}")]
    EntryFileMissing {
        dir: String,
    },

    /// An entry file exists but could not be read
    #[error("Cannot read entry file {path}")]
    EntryFileUnreadable {
        path: String,
        reason: String,
    },

    /// The run's scratch root could not be created
    #[error("Cannot create scratch directory {path}")]
    ScratchRootUnavailable {
        path: String,
        reason: String,
    },

    /// Configuration file is missing keys, has bad values or does not parse
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Writing or rasterizing the dependency graph failed
    #[error("Failed to render dependency graph: {reason}")]
    GraphRenderFailed {
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{message}")]
    Other {
        message: String,
    },
}

/// A [`TfdepsError`] with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: TfdepsError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: TfdepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add an explanation of what went wrong, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// [`TfdepsError`] values anywhere in the chain get tailored suggestions;
/// I/O errors get filesystem guidance; anything else is shown with its full
/// context chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    let error = match error.downcast::<TfdepsError>() {
        Ok(tfdeps_error) => return create_error_context(tfdeps_error),
        Err(other) => other,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let ctx = ErrorContext::new(TfdepsError::IoError(std::io::Error::new(
            io_error.kind(),
            io_error.to_string(),
        )));
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ctx
                .with_suggestion("Check file ownership and permissions of the input and scratch directories"),
            std::io::ErrorKind::NotFound => {
                ctx.with_suggestion("Check that the file or directory exists and the path is correct")
            }
            _ => ctx,
        };
    }

    // Typed error further down the chain: keep the outer message as details
    let root_message = error.to_string();
    if let Some(typed) = error.chain().find_map(|e| e.downcast_ref::<TfdepsError>()) {
        let mut ctx = create_error_context(shallow_copy(typed));
        if ctx.details.is_none() {
            ctx.details = Some(root_message);
        }
        return ctx;
    }

    let ctx = ErrorContext::new(TfdepsError::Other {
        message: root_message,
    });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join(": "))
    }
}

// io::Error is not Clone, so typed errors found by reference are rebuilt
fn shallow_copy(error: &TfdepsError) -> TfdepsError {
    match error {
        TfdepsError::GitCommandError { operation, stderr } => TfdepsError::GitCommandError {
            operation: operation.clone(),
            stderr: stderr.clone(),
        },
        TfdepsError::GitNotFound => TfdepsError::GitNotFound,
        TfdepsError::GitCloneFailed { url, reason } => TfdepsError::GitCloneFailed {
            url: url.clone(),
            reason: reason.clone(),
        },
        TfdepsError::ModuleNotFound { sub_path, repo } => TfdepsError::ModuleNotFound {
            sub_path: sub_path.clone(),
            repo: repo.clone(),
        },
        TfdepsError::EntryFileMissing { dir } => TfdepsError::EntryFileMissing {
            dir: dir.clone(),
        },
        TfdepsError::EntryFileUnreadable { path, reason } => TfdepsError::EntryFileUnreadable {
            path: path.clone(),
            reason: reason.clone(),
        },
        TfdepsError::ScratchRootUnavailable { path, reason } => {
            TfdepsError::ScratchRootUnavailable {
                path: path.clone(),
                reason: reason.clone(),
            }
        }
        TfdepsError::ConfigError { message } => TfdepsError::ConfigError {
            message: message.clone(),
        },
        TfdepsError::GraphRenderFailed { reason } => TfdepsError::GraphRenderFailed {
            reason: reason.clone(),
        },
        TfdepsError::IoError(e) => TfdepsError::IoError(std::io::Error::new(e.kind(), e.to_string())),
        TfdepsError::Other { message } => TfdepsError::Other {
            message: message.clone(),
        },
    }
}

fn create_error_context(error: TfdepsError) -> ErrorContext {
    match &error {
        TfdepsError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("tfdeps shells out to git to fetch every referenced module repository"),

        TfdepsError::GitCloneFailed { reason, .. } => {
            let details = reason.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Check the repository URL and ref, and that your git credentials can reach it")
                .with_details(details)
        }

        TfdepsError::GitCommandError { stderr, .. } => {
            let details = stderr.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Try running the git command manually for more details")
                .with_details(details)
        }

        TfdepsError::EntryFileUnreadable { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Pass a readable main.tf or terragrunt.hcl file")
                .with_details(details)
        }

        TfdepsError::ScratchRootUnavailable { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Point --scratch-dir (or scratch_dir in the config file) at a writable location")
                .with_details(details)
        }

        TfdepsError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax and keys of your tfdeps config file"),

        TfdepsError::GraphRenderFailed { .. } => ErrorContext::new(error).with_suggestion(
            "Install Graphviz ('dot') or write the graph with a .dot extension instead",
        ),

        TfdepsError::ModuleNotFound { .. }
        | TfdepsError::EntryFileMissing { .. }
        | TfdepsError::IoError(_)
        | TfdepsError::Other { .. } => ErrorContext::new(error),
    }
}
