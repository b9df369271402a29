//! Integration test suite for tfdeps
//!
//! Every test builds real git repositories of Terraform modules in a
//! temporary directory and resolves against them through `file://` URLs, so
//! no network access is needed. Only `git` must be installed.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **analyze**: single file resolution through the library
//! - **cycles**: circular references and the depth limit
//! - **scan**: directory scans
//! - **cli**: the `tfdeps` binary

#[path = "../common/mod.rs"]
mod common;

mod analyze;
mod cli;
mod cycles;
mod scan;
