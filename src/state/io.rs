mod locking;
mod persist;

use super::DesiredStore;
use super::types::LockFile;
use crate::constants::LOCK_FILE_VERSION;
use crate::error::{HomedeclError, Result};
use crate::utils::paths;
pub use locking::StoreLock;
use std::fs;
use std::path::{Path, PathBuf};

/// Lock file on disk. Writes are atomic and serialized through an
/// exclusive advisory lock next to the file.
#[derive(Debug, Clone)]
pub struct LockFileStore {
    path: PathBuf,
}

impl LockFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_config_dir(config_dir: &Path) -> Self {
        Self::new(paths::lock_file(config_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hold the store lock across a load-modify-save cycle.
    pub fn acquire(&self) -> Result<StoreLock> {
        locking::acquire_lock_for(&self.path)
    }
}

impl DesiredStore for LockFileStore {
    /// A missing or empty file is an empty declaration.
    fn load(&self) -> Result<LockFile> {
        if !self.path.exists() {
            return Ok(LockFile::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| HomedeclError::IoError {
            path: self.path.clone(),
            source: e,
        })?;
        if content.trim().is_empty() {
            return Ok(LockFile::default());
        }

        let lock: LockFile =
            serde_json::from_str(&content).map_err(|e| HomedeclError::ParseError {
                file: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        if lock.version > LOCK_FILE_VERSION {
            return Err(HomedeclError::ParseError {
                file: self.path.display().to_string(),
                message: format!(
                    "lock file version {} is newer than supported version {}",
                    lock.version, LOCK_FILE_VERSION
                ),
            });
        }

        Ok(lock)
    }

    fn save(&self, lock: &LockFile) -> Result<()> {
        let _guard = self.acquire()?;
        persist::prepare_and_write(lock, &self.path)
    }

    /// Holds the store lock from load to write.
    fn update(&self, change: &mut dyn FnMut(&mut LockFile) -> bool) -> Result<bool> {
        let _guard = self.acquire()?;
        let mut lock = self.load()?;
        let changed = change(&mut lock);
        if changed {
            persist::prepare_and_write(&lock, &self.path)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests;
