//! Metadata pipeline: raw parsed entries to canonical items.

use crate::backends::descriptor::{ExtractorSource, ManagerDescriptor, MetadataExtractor};
use crate::backends::parsers::RawEntry;
use crate::core::types::Item;
use std::collections::HashSet;

/// Turn one raw entry into an [`Item`] of `descriptor`'s manager.
///
/// The name transform produces the canonical name, raw fields become
/// metadata, and each extractor adds one key. Extractors only read the entry,
/// never each other's output, so their order does not matter.
pub fn apply(entry: &RawEntry, descriptor: &ManagerDescriptor) -> Item {
    let name = match &descriptor.name_transform {
        Some(transform) => transform.apply(&entry.identifier),
        None => entry.identifier.clone(),
    };

    let mut item = Item::package(&descriptor.name, name);
    item.metadata = entry.fields.clone();

    for extractor in &descriptor.extractors {
        if let Some(value) = extract(extractor, entry, &item.name) {
            item.metadata.insert(extractor.key.clone(), value);
        }
    }

    item
}

/// [`apply`] every entry; later duplicates of a canonical name are dropped.
pub fn apply_all(entries: &[RawEntry], descriptor: &ManagerDescriptor) -> Vec<Item> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| apply(entry, descriptor))
        .filter(|item| !item.name.is_empty() && seen.insert(item.name.clone()))
        .collect()
}

fn extract(extractor: &MetadataExtractor, entry: &RawEntry, canonical: &str) -> Option<String> {
    let source = match &extractor.source {
        ExtractorSource::Name => canonical,
        ExtractorSource::Raw => entry.identifier.as_str(),
        ExtractorSource::Field(field) => entry.fields.get(field)?.as_str(),
    };

    match &extractor.pattern {
        None => Some(source.to_string()),
        Some(pattern) => pattern
            .captures(source)?
            .get(extractor.group)
            .map(|m| m.as_str().to_string()),
    }
}
