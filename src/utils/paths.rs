use crate::constants::{
    CONFIG_FILE_NAME, DOTFILES_DIR_NAME, LOCK_FILE_NAME, MANAGERS_FILE_NAME, PROJECT_NAME,
    PROJECT_ORG, PROJECT_QUALIFIER,
};
use crate::error::{HomedeclError, Result};
use crate::project_identity;
use directories::{ProjectDirs, UserDirs};
use std::path::{Component, Path, PathBuf};

/// Home directory, overridable through `HOMEDECL_HOME`.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(project_identity::env_key("HOME"))
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    let user_dirs = UserDirs::new().ok_or_else(|| {
        HomedeclError::PathError("Could not determine user home directory".to_string())
    })?;
    Ok(user_dirs.home_dir().to_path_buf())
}

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    if !path.to_string_lossy().starts_with('~') {
        return Ok(path.to_path_buf());
    }
    expand_home_with(path, &home_dir()?)
}

pub fn expand_home_with(path: &Path, home: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| HomedeclError::PathError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

/// Lexically normalize a path: drop `.` and resolve `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Configuration directory, overridable through `HOMEDECL_CONFIG_DIR`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(project_identity::env_key("CONFIG_DIR"))
        && !dir.is_empty()
    {
        return expand_home(Path::new(&dir));
    }

    let proj = ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORG, PROJECT_NAME).ok_or_else(|| {
        HomedeclError::PathError("Could not determine config directory".to_string())
    })?;
    Ok(proj.config_dir().to_path_buf())
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

pub fn managers_file(config_dir: &Path) -> PathBuf {
    config_dir.join(MANAGERS_FILE_NAME)
}

pub fn lock_file(config_dir: &Path) -> PathBuf {
    config_dir.join(LOCK_FILE_NAME)
}

pub fn dotfiles_dir(config_dir: &Path) -> PathBuf {
    config_dir.join(DOTFILES_DIR_NAME)
}

#[cfg(test)]
mod tests;
