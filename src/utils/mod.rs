//! Cross-platform utilities shared by the rest of the crate
//!
//! - [`platform`] - git and Graphviz executable lookup, home directory and path expansion
//! - [`progress`] - progress indicators that stay out of the way in CI and tests

pub mod platform;
pub mod progress;
