//! Project Run Lock
//!
//! Advisory exclusive lock on `<project>/.rollout/deploy.lock` so two
//! deployments from the same project cannot overlap. The lock is released
//! when the guard is dropped.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{RolloutError, RolloutResult};

/// Directory for per-project state
pub const STATE_DIR: &str = ".rollout";
const LOCK_FILE: &str = "deploy.lock";

/// Held lock; dropping it unlocks
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock without waiting
    ///
    /// Returns [`RolloutError::RunInProgress`] when another process holds it.
    pub fn acquire(project_root: &Path) -> RolloutResult<Self> {
        let dir = project_root.join(STATE_DIR);
        fs::create_dir_all(&dir)?;
        let path = dir.join(LOCK_FILE);
        let file = File::create(&path)?;
        if file.try_lock_exclusive().is_err() {
            return Err(RolloutError::RunInProgress);
        }
        debug!(lock = %path.display(), "run lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
