use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::analyzer::{AnalyzeOptions, default_scratch_base};
use crate::core::TfdepsError;
use crate::resolver::ResolverOptions;
use crate::utils::platform::resolve_path;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "TFDEPS_CONFIG";

/// Settings from the config file, or from flags, before defaults are applied.
///
/// Every field is optional so two layers can be merged with
/// [`merge`](Self::merge); unset fields fall back to built-in defaults in
/// [`to_options`](Self::to_options).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_scratch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_retries: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reuse_clones: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_files: Option<Vec<String>>,
}

impl Config {
    /// Load from `path`, else `$TFDEPS_CONFIG`, else the default location.
    ///
    /// # Errors
    ///
    /// [`TfdepsError::ConfigError`] when an explicitly named file is missing,
    /// or when any file found does not parse.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let explicit = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(TfdepsError::ConfigError {
                    message: format!("config file {} does not exist", path.display()),
                }
                .into());
            }
            return Self::load_from(&path).await;
        }

        match Self::default_path() {
            Ok(path) if path.is_file() => Self::load_from(&path).await,
            _ => Ok(Self::default()),
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| TfdepsError::ConfigError {
            message: format!("{}: {}", path.display(), e.message()),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `~/.tfdeps/config.toml`, or `%LOCALAPPDATA%\tfdeps\config.toml` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("tfdeps")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".tfdeps")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            scratch_dir: other.scratch_dir.or(self.scratch_dir),
            keep_scratch: other.keep_scratch.or(self.keep_scratch),
            max_depth: other.max_depth.or(self.max_depth),
            fetch_timeout_secs: other.fetch_timeout_secs.or(self.fetch_timeout_secs),
            fetch_retries: other.fetch_retries.or(self.fetch_retries),
            max_parallel: other.max_parallel.or(self.max_parallel),
            reuse_clones: other.reuse_clones.or(self.reuse_clones),
            entry_files: other.entry_files.or(self.entry_files),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(TfdepsError::ConfigError {
                message: message.to_string(),
            }
            .into())
        };

        if self.max_depth == Some(0) {
            return invalid("max_depth must be at least 1");
        }
        if self.max_parallel == Some(0) {
            return invalid("max_parallel must be at least 1");
        }
        if let Some(entry_files) = &self.entry_files {
            if entry_files.is_empty() {
                return invalid("entry_files must name at least one file");
            }
            if entry_files.iter().any(|f| f.is_empty() || f.contains(['/', '\\'])) {
                return invalid("entry_files must be plain file names");
            }
        }
        Ok(())
    }

    /// Resolve into run options, filling unset fields with defaults.
    pub fn to_options(&self) -> Result<AnalyzeOptions> {
        self.validate()?;
        let defaults = AnalyzeOptions::default();
        let resolver_defaults = ResolverOptions::default();

        let scratch_dir = match &self.scratch_dir {
            Some(dir) => resolve_path(dir).map_err(|e| TfdepsError::ConfigError {
                message: format!("scratch_dir: {e:#}"),
            })?,
            None => default_scratch_base(),
        };

        let fetch_timeout = match self.fetch_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.fetch_timeout,
        };

        Ok(AnalyzeOptions {
            scratch_dir,
            keep_scratch: self.keep_scratch.unwrap_or(defaults.keep_scratch),
            resolver: ResolverOptions {
                max_depth: self.max_depth.unwrap_or(resolver_defaults.max_depth),
                max_parallel: self.max_parallel.unwrap_or(resolver_defaults.max_parallel),
                entry_files: self.entry_files.clone().unwrap_or(resolver_defaults.entry_files),
            },
            fetch_timeout,
            fetch_retries: self.fetch_retries.unwrap_or(defaults.fetch_retries),
            reuse_clones: self.reuse_clones.unwrap_or(defaults.reuse_clones),
            show_progress: defaults.show_progress,
        })
    }
}
