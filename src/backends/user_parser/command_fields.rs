use super::parse_utils::{first_string, get_entry_string, int_args, string_args};
use crate::backends::descriptor::CommandSpec;
use crate::error::{HomedeclError, Result};
use kdl::KdlNode;

/// Parse `op "template" { ... }`. Output and idempotency options are
/// accepted on every command; the descriptor decides which ones apply.
pub(super) fn parse_command(node: &KdlNode, manager: &str) -> Result<CommandSpec> {
    let operation = node.name().value();
    let template = first_string(node).ok_or_else(|| {
        HomedeclError::ConfigError(format!(
            "manager '{}': {} command required. Usage: {} \"command\"",
            manager, operation, operation
        ))
    })?;

    let mut cmd = CommandSpec::with_template(template);

    let Some(children) = node.children() else {
        return Ok(cmd);
    };

    for child in children.nodes() {
        let option = child.name().value();
        let value = || child.entries().first().and_then(get_entry_string);
        match option {
            "parse" | "format" => cmd.output.parse = value(),
            "json-path" => cmd.output.json_path = value(),
            "name-key" => cmd.output.name_key = value(),
            "delimiter" => cmd.output.delimiter = value(),
            "normalize" => cmd.output.normalize = value(),
            "skip" => cmd.output.skip.extend(string_args(child)),
            "idempotent" => cmd.idempotent.extend(string_args(child)),
            "fatal-exit-codes" => {
                let codes: Vec<i32> = int_args(child).ok_or_else(|| {
                    HomedeclError::ConfigError(format!(
                        "manager '{}': fatal-exit-codes expects integers. Usage: fatal-exit-codes 1 2",
                        manager
                    ))
                })?;
                cmd.fatal_exit_codes.extend(codes);
            }
            _ => {}
        }
    }

    Ok(cmd)
}
