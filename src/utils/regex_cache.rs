//! Process-wide cache of compiled regular expressions.
//!
//! Descriptors are rebuilt whenever the registry is, and the built-in ones share
//! most of their patterns, so compiled regexes are kept around by pattern text.

use crate::error::{HomedeclError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

static REGEX_CACHE: LazyLock<Mutex<HashMap<String, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Get or compile a regex pattern from the cache.
pub fn get_cached_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    if let Ok(cache) = REGEX_CACHE.lock()
        && let Some(regex) = cache.get(pattern)
    {
        return Ok(regex.clone());
    }

    let regex = Regex::new(pattern)?;

    // Lock poisoning only costs us the cache entry
    if let Ok(mut cache) = REGEX_CACHE.lock() {
        cache.insert(pattern.to_string(), regex.clone());
    }

    Ok(regex)
}

/// Compile `pattern`, naming `context` in the error so config mistakes are easy to find.
pub fn compile(pattern: &str, context: &str) -> Result<Regex> {
    get_cached_regex(pattern)
        .map_err(|e| HomedeclError::InvalidRegex(format!("{} ('{}'): {}", context, pattern, e)))
}

#[cfg(test)]
mod tests;
