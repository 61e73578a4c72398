use crate::error::{HomedeclError, Result};
use crate::project_identity;
use crate::ui;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const LOCK_TIMEOUT_SECONDS: u64 = 300;

/// Exclusive lock on the store; released and removed on drop.
#[derive(Debug)]
pub struct StoreLock {
    _file: std::fs::File,
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn guard_path(store_path: &Path) -> Result<PathBuf> {
    let dir = store_path
        .parent()
        .ok_or_else(|| HomedeclError::PathError("Could not determine lock file directory".into()))?;
    let file_name = store_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_identity::BINARY_NAME.to_string());
    Ok(dir.join(format!("{}.guard", file_name)))
}

pub(super) fn acquire_lock_for(store_path: &Path) -> Result<StoreLock> {
    let lock_path = guard_path(store_path)?;
    if let Some(dir) = lock_path.parent()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| HomedeclError::IoError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    if lock_path.exists() {
        let metadata = fs::metadata(&lock_path)?;
        let age_secs = metadata
            .modified()
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .map_or(0, |age| age.as_secs());

        let existing_file = OpenOptions::new().write(true).open(&lock_path)?;

        match existing_file.try_lock_exclusive() {
            Ok(()) => {
                if age_secs > LOCK_TIMEOUT_SECONDS {
                    ui::warning("Removing stale lock file (not actively locked)");
                }
                let _ = fs::remove_file(&lock_path);
            }
            Err(_) => {
                return Err(HomedeclError::LockError(format!(
                    "Another {} process is currently running.\n\
                     Lock file: {}\n\
                     Wait for it to complete, or delete the lock file if you're sure no other process is running.",
                    project_identity::BINARY_NAME,
                    lock_path.display(),
                )));
            }
        }
    }

    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .map_err(|e| HomedeclError::IoError {
            path: lock_path.clone(),
            source: e,
        })?;

    lock_file
        .try_lock_exclusive()
        .map_err(|e| HomedeclError::LockError(format!("Failed to lock {}: {}", lock_path.display(), e)))?;

    let _ = writeln!(&lock_file, "{}", std::process::id());

    Ok(StoreLock {
        _file: lock_file,
        path: lock_path,
    })
}
