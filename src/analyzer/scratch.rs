use anyhow::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::constants::SCRATCH_DIR_NAME;
use crate::core::TfdepsError;

/// Run-scoped directory that holds every clone made while analyzing one file.
///
/// Created as `<base>/run-<uuid>`. [`finish`](Self::finish) deletes it unless
/// the run was asked to keep its clones. If the value is dropped without
/// `finish` (an early return or a panic), the directory is removed
/// synchronously as a fallback, again unless it is being kept.
#[derive(Debug)]
pub struct ScratchRoot {
    path: PathBuf,
    keep: bool,
    finished: bool,
}

impl ScratchRoot {
    /// # Errors
    ///
    /// [`TfdepsError::ScratchRootUnavailable`] when the directory cannot be created.
    pub async fn create(base: &Path, keep: bool) -> Result<Self> {
        let path = base.join(format!("run-{}", Uuid::new_v4().simple()));
        tokio::fs::create_dir_all(&path).await.map_err(|e| {
            TfdepsError::ScratchRootUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        tracing::debug!("Created scratch root {}", path.display());

        Ok(Self {
            path,
            keep,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Purge the clones, or report where they were kept.
    ///
    /// A failed purge is logged, not returned; the analysis result is still good.
    pub async fn finish(mut self) {
        self.finished = true;
        if self.keep {
            tracing::info!("Keeping cloned repositories in {}", self.path.display());
            return;
        }

        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => tracing::debug!("Removed scratch root {}", self.path.display()),
            Err(e) => tracing::warn!(
                "Failed to remove scratch directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Drop for ScratchRoot {
    fn drop(&mut self) {
        if !self.finished && !self.keep {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

/// `<system temp dir>/tfdeps`
pub fn default_scratch_base() -> PathBuf {
    std::env::temp_dir().join(SCRATCH_DIR_NAME)
}
