//! Type-safe Git command builder for consistent command execution
//!
//! This module provides a fluent API for building and executing Git commands,
//! so every invocation shares the same timeout handling, logging and error
//! mapping.

use anyhow::Result;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::{GIT_CLONE_TIMEOUT, GIT_QUERY_TIMEOUT};
use crate::core::TfdepsError;
use crate::utils::platform::get_git_command;

/// Builder for constructing and executing a single Git command.
///
/// # Examples
///
/// ```rust,no_run
/// use tfdeps_cli::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// GitCommand::clone_shallow("https://example.com/infra.git", "v1.0.0", "/tmp/scratch/infra")
///     .with_context("infra//modules/vpc")
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: 120 seconds
/// - **Output capture**: always; git never writes to the user's terminal
/// - **Prompts**: disabled via `GIT_TERMINAL_PROMPT=0`, so a missing credential
///   fails fast instead of waiting for input
pub struct GitCommand {
    /// Command arguments to pass to Git (e.g., ["clone", "url", "path"])
    args: Vec<String>,

    /// Environment variables to set for the Git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for command completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages
    context: Option<String>,

    /// For clone commands, store the URL for better error messages
    clone_url: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            env_vars: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
            timeout_duration: Some(GIT_CLONE_TIMEOUT),
            context: None,
            clone_url: None,
        }
    }
}

impl GitCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a custom timeout for the command (None for no timeout)
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (typically the dependency being fetched).
    ///
    /// With context, log messages carry the identifier:
    /// ```text
    /// (infra//modules/vpc) Executing command: git clone --quiet ...
    /// ```
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The full argument list as it will be passed to git.
    pub fn full_args(&self) -> Vec<String> {
        self.args.clone()
    }

    fn operation(full_args: &[String]) -> String {
        full_args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Execute the command and return the output
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let full_args = self.full_args();
        let operation = Self::operation(&full_args);
        let ctx = self.context.as_deref().map(|c| format!("({c}) ")).unwrap_or_default();

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args);
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // A timed-out clone must not keep writing into the scratch directory
        cmd.kill_on_drop(true);

        tracing::debug!(
            target: "git",
            "{}Executing command: {} {}",
            ctx,
            git_command,
            full_args.join(" ")
        );

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.map_err(|e| map_spawn_error(e, &full_args))?
            } else {
                tracing::warn!(
                    target: "git",
                    "{}Command timed out after {} seconds: git {}",
                    ctx,
                    duration.as_secs(),
                    full_args.join(" ")
                );
                let stderr = format!(
                    "Git command timed out after {} seconds. This may indicate network \
                     connectivity issues or an authentication prompt waiting for input",
                    duration.as_secs()
                );
                return Err(match self.clone_url {
                    Some(url) => TfdepsError::GitCloneFailed {
                        url,
                        reason: stderr,
                    },
                    None => TfdepsError::GitCommandError {
                        operation,
                        stderr,
                    },
                }
                .into());
            }
        } else {
            output_future.await.map_err(|e| map_spawn_error(e, &full_args))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            tracing::debug!(
                target: "git",
                "{}Command failed with exit code: {:?}",
                ctx,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "git", "{}Error: {}", ctx, stderr.trim());
            }

            let error = if operation == "clone" {
                TfdepsError::GitCloneFailed {
                    url: self.clone_url.unwrap_or_else(|| "unknown".to_string()),
                    reason: stderr,
                }
            } else {
                TfdepsError::GitCommandError {
                    operation,
                    stderr,
                }
            };
            return Err(error.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !stderr.trim().is_empty() {
            tracing::debug!(target: "git", "{}{}", ctx, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "git::perf", "{}Git {} took {:.2}s", ctx, operation, elapsed.as_secs_f64());
        } else {
            tracing::debug!(target: "git::perf", "{}Git {} took {}ms", ctx, operation, elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout as a trimmed string
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command and check for success, discarding output
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

fn map_spawn_error(error: std::io::Error, full_args: &[String]) -> anyhow::Error {
    if error.kind() == std::io::ErrorKind::NotFound {
        TfdepsError::GitNotFound.into()
    } else {
        anyhow::Error::from(error).context(format!("Failed to execute git {}", full_args.join(" ")))
    }
}

/// Output from a Git command
pub struct GitCommandOutput {
    /// Standard output from the Git command
    pub stdout: String,
    /// Standard error output from the Git command
    pub stderr: String,
}

// Convenience builders for the commands tfdeps runs

impl GitCommand {
    /// Shallow, single-branch clone of `git_ref` into `target`.
    ///
    /// Equivalent to `git clone --quiet --branch <ref> --depth 1 -- <url> <target>`.
    /// `--branch` accepts tags as well as branch names; commit SHAs are not
    /// supported by a shallow clone of this form. The `--` keeps a url that
    /// starts with `-` from being read as an option.
    pub fn clone_shallow(url: &str, git_ref: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args([
            "clone",
            "--quiet",
            "--branch",
            git_ref,
            "--depth",
            "1",
            "--",
            url,
        ]);
        cmd.args.push(target.as_ref().display().to_string());
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    /// `git --version`, used to check that git is callable at all.
    pub fn version() -> Self {
        Self::new().arg("--version").with_timeout(Some(GIT_QUERY_TIMEOUT))
    }
}
