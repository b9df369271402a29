//! Core error types for tfdeps.
//!
//! - [`TfdepsError`] - every failure mode the library raises
//! - [`ErrorContext`] - user-friendly wrapper with details and suggestions
//! - [`user_friendly_error`] - converts any `anyhow::Error` for CLI display

pub mod error;

pub use error::{ErrorContext, TfdepsError, user_friendly_error};
