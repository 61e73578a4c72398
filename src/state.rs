//! Desired package state, persisted as the JSON lock file.

mod io;
pub mod types;

use crate::error::{HomedeclError, Result};
pub use io::{LockFileStore, StoreLock};
use std::sync::Mutex;
pub use types::{LockFile, LockMeta, PackageEntry};

/// Where desired packages are loaded from and saved to.
pub trait DesiredStore: Send + Sync {
    fn load(&self) -> Result<LockFile>;
    fn save(&self, lock: &LockFile) -> Result<()>;

    /// Load, modify and save in one step. Nothing is written when `change`
    /// returns `false`.
    fn update(&self, change: &mut dyn FnMut(&mut LockFile) -> bool) -> Result<bool> {
        let mut lock = self.load()?;
        let changed = change(&mut lock);
        if changed {
            self.save(&lock)?;
        }
        Ok(changed)
    }
}

/// In-process store, used by tests and dry runs of `add`/`remove`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lock: Mutex<LockFile>,
}

impl MemoryStore {
    pub fn new(lock: LockFile) -> Self {
        Self {
            lock: Mutex::new(lock),
        }
    }
}

impl DesiredStore for MemoryStore {
    fn load(&self) -> Result<LockFile> {
        self.lock
            .lock()
            .map(|lock| lock.clone())
            .map_err(|e| HomedeclError::LockError(e.to_string()))
    }

    fn save(&self, lock: &LockFile) -> Result<()> {
        let mut guard = self
            .lock
            .lock()
            .map_err(|e| HomedeclError::LockError(e.to_string()))?;
        *guard = lock.clone();
        Ok(())
    }
}
