//! Manager descriptor parser
//!
//! Reads `manager "name" { ... }` nodes from KDL into [`DescriptorSpec`]s.
//! The same syntax is used by the built-in definitions, `managers.kdl` and
//! `manager` nodes inside the main config file.

mod command_fields;
mod metadata_fields;
mod parse_utils;

use crate::backends::descriptor::DescriptorSpec;
use crate::error::{HomedeclError, Result};
use command_fields::parse_command;
use kdl::{KdlDocument, KdlNode};
use metadata_fields::{parse_metadata, parse_name_transform};
use parse_utils::first_string;
use std::path::Path;

/// Load manager definitions from a KDL file. A missing file defines nothing.
pub fn load_user_managers(path: &Path) -> Result<Vec<DescriptorSpec>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let source = std::fs::read_to_string(path).map_err(|e| HomedeclError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_managers(&source, &path.display().to_string())
}

/// Parse every `manager` node of a KDL document; other nodes are ignored.
pub fn parse_managers(source: &str, origin: &str) -> Result<Vec<DescriptorSpec>> {
    let doc = KdlDocument::parse(source).map_err(|e| HomedeclError::ParseError {
        file: origin.to_string(),
        message: e.to_string(),
    })?;

    doc.nodes()
        .iter()
        .filter(|node| node.name().value() == "manager")
        .map(parse_manager_node)
        .collect()
}

/// Parse a single `manager "name" { ... }` node.
///
/// Only syntax is checked here; required fields and placeholders are
/// validated when the merged spec becomes a `ManagerDescriptor`.
pub fn parse_manager_node(node: &KdlNode) -> Result<DescriptorSpec> {
    let name = first_string(node).ok_or_else(|| {
        HomedeclError::ConfigError(
            "Manager name required. Usage: manager \"name\" { ... }".to_string(),
        )
    })?;

    let mut spec = DescriptorSpec::new(name);

    let Some(children) = node.children() else {
        return Ok(spec);
    };

    for child in children.nodes() {
        let field = child.name().value();
        match field {
            "binary" => spec.binary = Some(required_string(child, &spec.name)?),
            "description" => spec.description = Some(required_string(child, &spec.name)?),
            "install-hint" => spec.install_hint = Some(required_string(child, &spec.name)?),
            "help-url" => spec.help_url = Some(required_string(child, &spec.name)?),
            "upgrade-target" => spec.upgrade_target = Some(required_string(child, &spec.name)?),
            "version" => spec.version = Some(parse_command(child, &spec.name)?),
            "list" => spec.list = Some(parse_command(child, &spec.name)?),
            "install" => spec.install = Some(parse_command(child, &spec.name)?),
            "uninstall" => spec.uninstall = Some(parse_command(child, &spec.name)?),
            "upgrade" => spec.upgrade = Some(parse_command(child, &spec.name)?),
            "upgrade-all" => spec.upgrade_all = Some(parse_command(child, &spec.name)?),
            "search" => spec.search = Some(parse_command(child, &spec.name)?),
            "info" => spec.info = Some(parse_command(child, &spec.name)?),
            "name-transform" => spec.name_transform = Some(parse_name_transform(child, &spec.name)?),
            "metadata" => spec.metadata.extend(parse_metadata(child, &spec.name)?),
            _ => {
                // Unknown fields are ignored for forward compatibility
            }
        }
    }

    Ok(spec)
}

fn required_string(node: &KdlNode, manager: &str) -> Result<String> {
    first_string(node).ok_or_else(|| {
        HomedeclError::ConfigError(format!(
            "manager '{}': '{}' requires a string value",
            manager,
            node.name().value()
        ))
    })
}

#[cfg(test)]
mod tests;
