use super::GenericManager;
use crate::backends::descriptor::{MutatingCommand, PACKAGE_PLACEHOLDER};
use crate::backends::error_matcher::{self, ErrorKind, Operation};
use crate::backends::executor::{CommandOutput, CommandRequest};
use crate::core::context::ExecContext;
use crate::core::types::Item;
use crate::error::{HomedeclError, ManagerError, ManagerResult};
use crate::packages::traits::{OperationOutcome, PackageManager};
use crate::utils::sanitize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

impl GenericManager {
    /// Resolve the binary, then run the version probe if one is configured.
    pub(super) fn probe(&self, ctx: &ExecContext) -> ManagerResult<bool> {
        if self.executor.look_path(&self.descriptor.binary).is_none() {
            return Ok(false);
        }

        if let Some(version) = &self.descriptor.version {
            let (command, output) = self.run(ctx, version.argv().to_vec(), self.timeouts.discovery)?;
            if !output.is_success() {
                return Err(ManagerError::Execution {
                    manager: self.descriptor.name.clone(),
                    command,
                    reason: output.summary(),
                });
            }
        }

        Ok(true)
    }

    pub(super) fn require_available(&self, ctx: &ExecContext) -> ManagerResult<()> {
        if self.is_available(ctx)? {
            Ok(())
        } else {
            Err(ManagerError::Unavailable {
                manager: self.descriptor.name.clone(),
            })
        }
    }

    /// Execute argv, mapping executor failures (spawn, timeout, cancel) to
    /// `Execution`. Returns the command line alongside the output.
    pub(super) fn run(
        &self,
        ctx: &ExecContext,
        argv: Vec<String>,
        timeout: Duration,
    ) -> ManagerResult<(String, CommandOutput)> {
        let request = CommandRequest::new(argv, timeout).map_err(|e| self.execution_error("", e))?;
        let command = request.command_line();

        match self.executor.execute(ctx, &request) {
            Ok(output) => Ok((command, output)),
            Err(e) => Err(self.execution_error(&command, e)),
        }
    }

    /// Run an install/uninstall/upgrade command and classify the result.
    pub(super) fn run_mutating(
        &self,
        ctx: &ExecContext,
        cmd: &MutatingCommand,
        operation: Operation,
        target: &str,
    ) -> ManagerResult<OperationOutcome> {
        let argv = cmd.template.render(PACKAGE_PLACEHOLDER, target);
        let (command, output) = self.run(ctx, argv, self.timeouts.operation)?;
        let combined = output.combined();
        let kind = error_matcher::classify(&combined, operation);

        if !output.is_success() && error_matcher::is_hard_failure(kind) {
            return Err(self.domain_error(target, kind, &command, &output.summary()));
        }

        if error_matcher::matches_idempotent(&combined, &cmd.idempotent)
            || error_matcher::is_already_satisfied(kind, operation)
        {
            return Ok(OperationOutcome::AlreadySatisfied);
        }

        if output.is_success() {
            Ok(OperationOutcome::Applied)
        } else {
            Err(self.domain_error(target, kind, &command, &output.summary()))
        }
    }

    /// Installed entry whose canonical name, or `full_name` metadata, is `name`.
    pub(super) fn find_installed(&self, ctx: &ExecContext, name: &str) -> ManagerResult<Option<Item>> {
        let installed = self.list_installed(ctx)?;
        Ok(installed.into_iter().find(|item| {
            item.name == name || item.metadata.get("full_name").map(String::as_str) == Some(name)
        }))
    }

    /// Canonical name to `full_name` for every installed entry that has one.
    /// A failed listing yields no mapping, so upgrades fall back to plain names.
    pub(super) fn full_names(&self, ctx: &ExecContext) -> HashMap<String, String> {
        self.list_installed(ctx)
            .map(|items| {
                items
                    .into_iter()
                    .filter_map(|item| {
                        let full = item.metadata.get("full_name")?.clone();
                        Some((item.name, full))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(super) fn validate_name(&self, name: &str, operation: &str) -> ManagerResult<()> {
        sanitize::validate_package_name(name).map_err(|e| ManagerError::Execution {
            manager: self.descriptor.name.clone(),
            command: operation.to_string(),
            reason: e.to_string(),
        })
    }

    pub(super) fn validate_query(&self, query: &str) -> ManagerResult<()> {
        sanitize::validate_search_query(query).map_err(|e| ManagerError::Execution {
            manager: self.descriptor.name.clone(),
            command: "search".to_string(),
            reason: e.to_string(),
        })
    }

    pub(super) fn execution_error(&self, command: &str, error: HomedeclError) -> ManagerError {
        let reason = match error {
            HomedeclError::SystemCommandFailed { reason, .. } => reason,
            HomedeclError::Interrupted => "interrupted".to_string(),
            other => other.to_string(),
        };
        ManagerError::Execution {
            manager: self.descriptor.name.clone(),
            command: command.to_string(),
            reason,
        }
    }

    pub(super) fn parse_error(&self, error: HomedeclError) -> ManagerError {
        let message = match error {
            HomedeclError::ParseError { message, .. } => message,
            other => other.to_string(),
        };
        ManagerError::Parse {
            manager: self.descriptor.name.clone(),
            message,
        }
    }

    pub(super) fn domain_error(
        &self,
        package: &str,
        kind: ErrorKind,
        command: &str,
        detail: &str,
    ) -> ManagerError {
        let detail = if detail.is_empty() {
            command.to_string()
        } else {
            detail.to_string()
        };
        ManagerError::Domain {
            manager: self.descriptor.name.clone(),
            package: package.to_string(),
            kind,
            detail,
        }
    }

    pub(super) fn unsupported(&self, operation: &'static str) -> ManagerError {
        ManagerError::Unsupported {
            manager: self.descriptor.name.clone(),
            operation,
        }
    }
}

/// `Key: Value` lines to a map with lowercased, underscore-joined keys.
pub(super) fn parse_key_values(output: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        fields.entry(key).or_insert_with(|| value.to_string());
    }
    fields
}
