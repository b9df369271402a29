//! Local git repositories holding Terraform modules
//!
//! A [`ModuleRepoFixture`] is a real git repository on disk whose commits are
//! tagged, so `git clone --branch <tag> --depth 1 file://...` works against it
//! exactly as it would against a remote.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::git_helper::TestGit;

/// A git repository of Terraform modules used as a clone source in tests.
///
/// ```rust,no_run
/// use tfdeps_cli::test_utils::ModuleRepoFixture;
///
/// # fn example() -> anyhow::Result<()> {
/// let temp = tempfile::tempdir()?;
/// let repo = ModuleRepoFixture::create(temp.path().join("network.git"))?;
/// repo.write_module("modules/vpc", "variable \"cidr\" {}\n")?;
/// repo.commit_and_tag("v1")?;
///
/// let line = repo.source_line("modules/vpc", "v1");
/// assert!(line.contains("?ref=v1"));
/// # Ok(())
/// # }
/// ```
pub struct ModuleRepoFixture {
    pub path: PathBuf,
    git: TestGit,
}

impl ModuleRepoFixture {
    /// Create an empty repository with a configured test user.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create fixture repo at {}", path.display()))?;

        let git = TestGit::new(&path);
        git.init()?;
        git.config_user()?;

        Ok(Self {
            path,
            git,
        })
    }

    /// Write a file at `relative` inside the working tree.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let target = self.path.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(target)
    }

    /// Write `<sub_path>/main.tf`.
    pub fn write_module(&self, sub_path: &str, content: &str) -> Result<PathBuf> {
        self.write_file(&format!("{sub_path}/main.tf"), content)
    }

    /// Write `<sub_path>/terragrunt.hcl`.
    pub fn write_terragrunt_module(&self, sub_path: &str, content: &str) -> Result<PathBuf> {
        self.write_file(&format!("{sub_path}/terragrunt.hcl"), content)
    }

    /// Stage everything, commit and tag the result.
    pub fn commit_and_tag(&self, tag: &str) -> Result<()> {
        self.git.add_all()?;
        self.git.commit(&format!("Release {tag}"))?;
        self.git.tag(tag)?;
        Ok(())
    }

    /// `file://` URL of the repository.
    pub fn url(&self) -> String {
        file_url(&self.path)
    }

    /// A `source = "git::..."` line pointing at `sub_path` at `tag`.
    pub fn source_line(&self, sub_path: &str, tag: &str) -> String {
        source_line(&self.url(), sub_path, tag)
    }

    pub fn git(&self) -> &TestGit {
        &self.git
    }
}

/// `file://` URL for a local path, with forward slashes on every platform.
pub fn file_url(path: &Path) -> String {
    let display = path.display().to_string().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{display}")
    } else {
        format!("file:///{display}")
    }
}

/// A Terraform `source` assignment for a git module.
pub fn source_line(url: &str, sub_path: &str, tag: &str) -> String {
    format!("  source = \"git::{url}//{sub_path}?ref={tag}\"")
}
