use super::parse_utils::property;
use crate::backends::descriptor::{ExtractorSpec, NameTransformSpec};
use crate::error::{HomedeclError, Result};
use kdl::KdlNode;
use std::collections::BTreeMap;

/// `name-transform pattern="..." replacement="..."`
pub(super) fn parse_name_transform(node: &KdlNode, manager: &str) -> Result<NameTransformSpec> {
    let pattern = property(node, "pattern").ok_or_else(|| {
        HomedeclError::ConfigError(format!(
            "manager '{}': name-transform requires pattern=\"...\"",
            manager
        ))
    })?;

    Ok(NameTransformSpec {
        pattern,
        replacement: property(node, "replacement").unwrap_or_default(),
    })
}

/// `metadata { key pattern="..." group=1 source="name" field="..." }`
pub(super) fn parse_metadata(
    node: &KdlNode,
    manager: &str,
) -> Result<BTreeMap<String, ExtractorSpec>> {
    let mut extractors = BTreeMap::new();

    let Some(children) = node.children() else {
        return Ok(extractors);
    };

    for child in children.nodes() {
        let key = child.name().value().to_string();

        let group = match property(child, "group") {
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|_| {
                HomedeclError::ConfigError(format!(
                    "manager '{}': metadata '{}' group must be a non-negative integer, got '{}'",
                    manager, key, raw
                ))
            })?),
            None => None,
        };

        extractors.insert(
            key,
            ExtractorSpec {
                pattern: property(child, "pattern"),
                group,
                source: property(child, "source"),
                field: property(child, "field"),
            },
        );
    }

    Ok(extractors)
}
