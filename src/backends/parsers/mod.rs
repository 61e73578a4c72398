//! Output parsers.
//!
//! Turn raw command output into [`RawEntry`] values according to the
//! descriptor's [`OutputFormat`]. Parsing never yields a partial result: JSON
//! strategies either decode the whole document or fail.

mod json_parser;
mod lines;
mod parseable;

use crate::backends::descriptor::{Normalize, OutputFormat, ParseStrategy};
use crate::error::Result;
use std::collections::BTreeMap;

pub use json_parser::navigate_json_path;

/// One parsed record before name transforms and metadata extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub identifier: String,
    pub fields: BTreeMap<String, String>,
}

impl RawEntry {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Parse command output with the strategy named by `format`.
///
/// Empty (or whitespace-only) output is an empty listing for every strategy.
pub fn parse(output: &str, format: &OutputFormat) -> Result<Vec<RawEntry>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut entries = match format.strategy {
        ParseStrategy::Lines => lines::parse_lines(output, format),
        ParseStrategy::Parseable => parseable::parse_parseable(output, format),
        ParseStrategy::JsonArray => json_parser::parse_json_array(output, format)?,
        ParseStrategy::JsonMap => json_parser::parse_json_map(output, format)?,
    };

    if format.normalize == Normalize::Lower {
        for entry in &mut entries {
            entry.identifier = entry.identifier.to_lowercase();
        }
    }

    Ok(entries)
}

/// Whether a text line is dropped by the format's skip patterns.
fn is_skipped(line: &str, format: &OutputFormat) -> bool {
    format.skip.iter().any(|re| re.is_match(line))
}

#[cfg(test)]
mod tests;
