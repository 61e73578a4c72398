use super::{RawEntry, is_skipped};
use crate::backends::descriptor::OutputFormat;

/// Delimited records: the first field is the identifier, the rest are kept
/// as raw fields keyed by position ("1", "2", ...).
pub(super) fn parse_parseable(output: &str, format: &OutputFormat) -> Vec<RawEntry> {
    let mut entries = Vec::new();

    for line in output.lines() {
        if is_skipped(line, format) {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split(format.delimiter.as_str());
        let identifier = parts.next().unwrap_or_default().trim();
        if identifier.is_empty() {
            continue;
        }

        let mut entry = RawEntry::new(identifier);
        for (index, value) in parts.enumerate() {
            let value = value.trim();
            if !value.is_empty() {
                entry.fields.insert((index + 1).to_string(), value.to_string());
            }
        }
        entries.push(entry);
    }

    entries
}
