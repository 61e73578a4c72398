//! Rendering, hashing and deploying dotfiles.

use super::scanner::DotfileDecl;
use crate::error::{HomedeclError, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

/// `{{ name }}`, `{{ .name }}` or `{{ env.NAME }}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.?((?:env\.)?[A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("Invalid regex pattern")
});

/// Substitute placeholders in `content`.
///
/// Plain names come from `vars`, then the environment; `env.NAME` only reads
/// the environment. An unresolved name is an error, never an empty string.
pub fn render_str(content: &str, vars: &BTreeMap<String, String>, origin: &str) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = PLACEHOLDER.replace_all(content, |caps: &Captures| {
        let key = &caps[1];
        let value = match key.strip_prefix("env.") {
            Some(env_key) => std::env::var(env_key).ok(),
            None => vars.get(key).cloned().or_else(|| std::env::var(key).ok()),
        };
        value.unwrap_or_else(|| {
            missing.push(key.to_string());
            String::new()
        })
    });

    if !missing.is_empty() {
        missing.sort();
        missing.dedup();
        return Err(HomedeclError::ConfigError(format!(
            "Template '{}' uses undefined variable(s): {}",
            origin,
            missing.join(", ")
        )));
    }

    Ok(rendered.into_owned())
}

/// Content the destination should have.
pub fn render(decl: &DotfileDecl, vars: &BTreeMap<String, String>) -> Result<Vec<u8>> {
    let raw = fs::read(&decl.source).map_err(|e| HomedeclError::IoError {
        path: decl.source.clone(),
        source: e,
    })?;

    if !decl.is_template {
        return Ok(raw);
    }

    let text = String::from_utf8(raw).map_err(|_| {
        HomedeclError::ConfigError(format!(
            "Template '{}' is not valid UTF-8",
            decl.source.display()
        ))
    })?;
    render_str(&text, vars, &decl.source.display().to_string()).map(String::into_bytes)
}

pub fn checksum_bytes(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

pub fn checksum(path: &Path) -> Result<String> {
    let content = fs::read(path).map_err(|e| HomedeclError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(checksum_bytes(&content))
}

/// Whether the deployed file differs from the rendered source.
pub fn has_drifted(decl: &DotfileDecl, vars: &BTreeMap<String, String>) -> Result<bool> {
    let expected = checksum_bytes(&render(decl, vars)?);
    Ok(checksum(&decl.destination)? != expected)
}

/// Render and write the destination atomically, creating parent directories.
/// Source permissions are carried over.
pub fn deploy(decl: &DotfileDecl, vars: &BTreeMap<String, String>) -> Result<()> {
    let content = render(decl, vars)?;

    let dir = decl.destination.parent().ok_or_else(|| {
        HomedeclError::PathError(format!(
            "Invalid destination (no parent directory): {}",
            decl.destination.display()
        ))
    })?;
    fs::create_dir_all(dir).map_err(|e| HomedeclError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let file_name = decl
        .destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".{}.homedecl-tmp", file_name));

    let written = write_and_rename(&tmp_path, &content, decl);
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

fn write_and_rename(tmp_path: &Path, content: &[u8], decl: &DotfileDecl) -> Result<()> {
    let io_err = |e: std::io::Error| HomedeclError::IoError {
        path: tmp_path.to_path_buf(),
        source: e,
    };

    let mut tmp_file = fs::File::create(tmp_path).map_err(io_err)?;
    tmp_file.write_all(content).map_err(io_err)?;
    tmp_file.sync_all().map_err(io_err)?;
    drop(tmp_file);

    if let Ok(metadata) = fs::metadata(&decl.source) {
        let _ = fs::set_permissions(tmp_path, metadata.permissions());
    }

    fs::rename(tmp_path, &decl.destination).map_err(|e| HomedeclError::IoError {
        path: decl.destination.clone(),
        source: e,
    })
}
