//! Input sanitization for values substituted into manager commands.
//!
//! Commands are never run through a shell, but a package name still ends up
//! as an argv element, so anything that reads as an option or a path escape
//! is rejected before substitution.

use crate::error::{HomedeclError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Allows: alphanumeric, dash, underscore, dot, plus, at sign, slash (scoped
/// packages), colon and equals (version pins).
static SAFE_PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9@._+/:=-]+$").expect("Invalid regex pattern")
});

static SHELL_DANGEROUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[;`$(){}|&<>\\'"\s*?]"#).expect("Invalid regex pattern")
});

const MAX_NAME_LEN: usize = 256;

pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(HomedeclError::ConfigError(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(HomedeclError::ConfigError(format!(
            "Package name too long (max {} chars): {}...",
            MAX_NAME_LEN,
            name.chars().take(50).collect::<String>()
        )));
    }

    if name.starts_with('-') {
        return Err(HomedeclError::ConfigError(format!(
            "Package name cannot start with '-': {}",
            name
        )));
    }

    if SHELL_DANGEROUS.is_match(name) {
        return Err(HomedeclError::ConfigError(format!(
            "Package name contains unsafe characters: {}",
            sanitize_for_display(name)
        )));
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(HomedeclError::ConfigError(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(HomedeclError::ConfigError(format!(
            "Package name cannot contain path traversal: {}",
            name
        )));
    }

    Ok(())
}

/// Search queries are looser than names: spaces are fine, options are not.
pub fn validate_search_query(query: &str) -> Result<()> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(HomedeclError::ConfigError(
            "Search query cannot be empty".to_string(),
        ));
    }
    if trimmed.starts_with('-') {
        return Err(HomedeclError::ConfigError(format!(
            "Search query cannot start with '-': {}",
            trimmed
        )));
    }
    Ok(())
}

/// Truncate a command or value for display. Does NOT make it safe to execute.
pub fn sanitize_for_display(input: &str) -> String {
    if input.chars().count() > 200 {
        format!("{}...", input.chars().take(200).collect::<String>())
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests;
