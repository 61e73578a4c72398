use crate::constants::LOCK_FILE_VERSION;
use crate::error::{HomedeclError, Result};
use crate::state::types::LockFile;
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::Path;

pub(super) fn prepare_and_write(lock: &LockFile, path: &Path) -> Result<()> {
    let lock = stamp(lock);
    write_atomically(path, &lock)
}

fn stamp(lock: &LockFile) -> LockFile {
    let mut lock = lock.clone();
    lock.version = LOCK_FILE_VERSION;
    lock.meta.updated_at = Utc::now();
    lock.meta.hostname = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    lock
}

fn write_atomically(path: &Path, lock: &LockFile) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        HomedeclError::PathError(format!(
            "Invalid lock file path (no parent directory): {}",
            path.display()
        ))
    })?;

    fs::create_dir_all(dir).map_err(|e| HomedeclError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let content = serde_json::to_string_pretty(lock)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| HomedeclError::PathError(format!("Invalid lock file path: {}", path.display())))?;
    let tmp_path = dir.join(format!("{}.tmp", file_name));
    let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| HomedeclError::IoError {
        path: tmp_path.clone(),
        source: e,
    })?;

    tmp_file.write_all(content.as_bytes())?;
    tmp_file.write_all(b"\n")?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| HomedeclError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}
