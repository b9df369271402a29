//! Shared helpers for the tfdeps integration tests
//!
//! A [`TestWorkspace`] owns one temporary directory holding fixture git
//! repositories under `repos/`, the analyzed configuration under `live/`,
//! and the scratch directory the runs clone into.

#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tfdeps_cli::analyzer::AnalyzeOptions;
use tfdeps_cli::models::DependencyRef;
use tfdeps_cli::test_utils::{ModuleRepoFixture, init_test_logging};
use tfdeps_cli::tree::label_for;

pub struct TestWorkspace {
    temp: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        init_test_logging(None);
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("repos"))?;
        fs::create_dir_all(temp.path().join("live"))?;
        fs::create_dir_all(temp.path().join("home"))?;
        Ok(Self {
            temp,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// A new, empty fixture repository at `repos/<name>`.
    pub fn repo(&self, name: &str) -> Result<ModuleRepoFixture> {
        ModuleRepoFixture::create(self.path().join("repos").join(name))
    }

    /// `file://` URL a repository created with [`repo`](Self::repo) will have.
    pub fn repo_url(&self, name: &str) -> String {
        tfdeps_cli::test_utils::file_url(&self.path().join("repos").join(name))
    }

    /// Write `live/<relative>` and return its path.
    pub fn write_live(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join("live").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.path().join("scratch")
    }

    /// Number of run directories left in the scratch dir.
    pub fn scratch_runs(&self) -> usize {
        fs::read_dir(self.scratch_dir()).map(|entries| entries.count()).unwrap_or(0)
    }

    pub fn options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            scratch_dir: self.scratch_dir(),
            show_progress: false,
            ..AnalyzeOptions::default()
        }
    }

    /// `tfdeps <subcommand> <target> --scratch-dir <scratch>`, isolated from
    /// the user's config and log settings. More flags can be appended.
    pub fn tfdeps(&self, subcommand: &str, target: &Path) -> Command {
        let mut cmd = Command::cargo_bin("tfdeps").expect("tfdeps binary");
        cmd.env("HOME", self.path().join("home"))
            .env("TFDEPS_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("TFDEPS_CONFIG")
            .env_remove("RUST_LOG")
            .arg(subcommand)
            .arg(target)
            .arg("--scratch-dir")
            .arg(self.scratch_dir());
        cmd
    }
}

/// Label of a reference as it appears in reports.
pub fn label(url: &str, sub_path: &str, git_ref: &str) -> String {
    label_for(&DependencyRef::new(url, sub_path, git_ref))
}

/// A single `module` block sourcing `url//sub_path?ref=git_ref`.
pub fn module_block(name: &str, url: &str, sub_path: &str, git_ref: &str) -> String {
    format!(
        "module \"{name}\" {{\n{}\n}}\n",
        tfdeps_cli::test_utils::source_line(url, sub_path, git_ref)
    )
}
