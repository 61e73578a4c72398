use super::types::{Config, HookSpec, Hooks, Settings};
use crate::backends::user_parser;
use crate::error::{HomedeclError, Result};
use crate::utils::paths;
use kdl::{KdlDocument, KdlEntry, KdlNode};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Load `homedecl.kdl` and `managers.kdl` from `config_dir`.
///
/// Both files are optional; a missing main file yields default settings.
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let main_path = paths::config_file(config_dir);
    let mut config = if main_path.exists() {
        let content = read(&main_path)?;
        parse_config(&content, &main_path.display().to_string())?
    } else {
        Config::default()
    };
    config.config_dir = config_dir.to_path_buf();

    let mut managers = user_parser::load_user_managers(&paths::managers_file(config_dir))?;
    managers.append(&mut config.managers);
    config.managers = managers;

    Ok(config)
}

/// Parse the main configuration document.
pub fn parse_config(content: &str, origin: &str) -> Result<Config> {
    let doc = KdlDocument::parse(content).map_err(|e| {
        let err_msg = e.to_string();
        let hint = if err_msg.contains("unexpected end of file") {
            "\nHint: You might be missing a closing brace '}'."
        } else if err_msg.contains("expected") {
            "\nHint: Check that your KDL syntax follows the format: node-name \"value\" { ... }"
        } else {
            ""
        };
        HomedeclError::ConfigError(format!("{}: KDL parsing error: {}{}", origin, err_msg, hint))
    })?;

    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "settings" => parse_settings(node, &mut config.settings)?,
            "vars" => parse_vars(node, &mut config.vars)?,
            "hooks" => parse_hooks(node, &mut config.hooks)?,
            "manager" => config.managers.push(user_parser::parse_manager_node(node)?),
            _ => {
                // Ignore unknown nodes for forward compatibility
            }
        }
    }

    Ok(config)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| HomedeclError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_settings(node: &KdlNode, settings: &mut Settings) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        let key = child.name().value();
        match key {
            "default-manager" => settings.default_manager = Some(string_value(child)?),
            "list-timeout" => settings.list_timeout = seconds_value(child)?,
            "operation-timeout" => settings.operation_timeout = seconds_value(child)?,
            "hook-timeout" => settings.hook_timeout = seconds_value(child)?,
            "max-parallel-listing" => {
                settings.max_parallel_listing = integer_value(child)?.max(1) as usize
            }
            "ignore" => settings.ignore.extend(
                child
                    .entries()
                    .iter()
                    .filter(|e| e.name().is_none())
                    .filter_map(|e| e.value().as_string())
                    .map(str::to_string),
            ),
            _ => {
                return Err(HomedeclError::ConfigError(format!(
                    "Unknown setting: '{}'. Valid settings: default-manager, list-timeout, operation-timeout, hook-timeout, max-parallel-listing, ignore",
                    key
                )));
            }
        }
    }

    if settings.list_timeout >= settings.operation_timeout {
        return Err(HomedeclError::ConfigError(format!(
            "list-timeout ({}s) must be shorter than operation-timeout ({}s)",
            settings.list_timeout.as_secs(),
            settings.operation_timeout.as_secs()
        )));
    }

    Ok(())
}

fn parse_vars(node: &KdlNode, vars: &mut BTreeMap<String, String>) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        vars.insert(child.name().value().to_string(), string_value(child)?);
    }

    Ok(())
}

fn parse_hooks(node: &KdlNode, hooks: &mut Hooks) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        let phase = child.name().value();
        let target = match phase {
            "pre-apply" => &mut hooks.pre_apply,
            "post-apply" => &mut hooks.post_apply,
            _ => {
                return Err(HomedeclError::ConfigError(format!(
                    "Unknown hook phase '{}'. Valid: pre-apply, post-apply",
                    phase
                )));
            }
        };

        let command = string_value(child)?;
        let timeout = match child
            .entries()
            .iter()
            .find(|e| e.name().map(|n| n.value()) == Some("timeout"))
        {
            Some(entry) => Some(Duration::from_secs(entry_integer(entry, phase)?)),
            None => None,
        };

        target.push(HookSpec { command, timeout });
    }

    Ok(())
}

fn string_value(node: &KdlNode) -> Result<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| {
            HomedeclError::ConfigError(format!(
                "'{}' requires a string value. Usage: {} \"value\"",
                node.name().value(),
                node.name().value()
            ))
        })
}

fn integer_value(node: &KdlNode) -> Result<u64> {
    let key = node.name().value();
    let entry = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .ok_or_else(|| HomedeclError::ConfigError(format!("'{}' requires a value", key)))?;
    entry_integer(entry, key)
}

fn seconds_value(node: &KdlNode) -> Result<Duration> {
    integer_value(node).map(Duration::from_secs)
}

fn entry_integer(entry: &KdlEntry, key: &str) -> Result<u64> {
    let raw = match entry.value().as_string() {
        Some(s) => s.to_string(),
        None => entry.value().to_string(),
    };
    raw.trim().parse().map_err(|_| {
        HomedeclError::ConfigError(format!(
            "'{}' expects a non-negative integer, got '{}'",
            key, raw
        ))
    })
}

#[cfg(test)]
mod tests;
