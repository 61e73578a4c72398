use super::{RawEntry, is_skipped};
use crate::backends::descriptor::OutputFormat;

/// One identifier per non-empty line.
///
/// Skip patterns see the untrimmed line so indentation can be matched.
pub(super) fn parse_lines(output: &str, format: &OutputFormat) -> Vec<RawEntry> {
    output
        .lines()
        .filter(|line| !is_skipped(line, format))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(RawEntry::new)
        .collect()
}
