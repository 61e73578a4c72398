//! Pre- and post-apply hooks.
//!
//! Hook commands are split with shell-word rules and run through the same
//! [`CommandExecutor`] as manager operations, never through a shell.

use crate::backends::CommandExecutor;
use crate::backends::executor::CommandRequest;
use crate::config::HookSpec;
use crate::core::context::ExecContext;
use crate::error::{HomedeclError, Result};
use crate::ui as output;
use crate::utils::sanitize;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookPhase {
    PreApply,
    PostApply,
}

impl std::fmt::Display for HookPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreApply => write!(f, "pre-apply"),
            Self::PostApply => write!(f, "post-apply"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookFailure {
    pub phase: HookPhase,
    pub command: String,
    pub reason: String,
}

pub struct HookRunner<'a> {
    executor: &'a dyn CommandExecutor,
    default_timeout: Duration,
}

impl<'a> HookRunner<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, default_timeout: Duration) -> Self {
        Self {
            executor,
            default_timeout,
        }
    }

    /// Run one hook; a non-zero exit is an error.
    pub fn run(&self, ctx: &ExecContext, hook: &HookSpec) -> Result<()> {
        let argv = shlex::split(&hook.command).ok_or_else(|| {
            HomedeclError::ConfigError(format!(
                "Failed to parse hook command '{}': Invalid quoting or escaping",
                sanitize::sanitize_for_display(&hook.command)
            ))
        })?;

        let request = CommandRequest::new(argv, hook.timeout.unwrap_or(self.default_timeout))?;
        output::verbose(&format!("Running hook: {}", request.command_line()));

        let result = self.executor.execute(ctx, &request)?;
        if result.is_success() {
            Ok(())
        } else {
            Err(HomedeclError::SystemCommandFailed {
                command: request.command_line(),
                reason: result.summary(),
            })
        }
    }

    /// Run hooks in order, stopping at the first failure.
    pub fn run_required(&self, ctx: &ExecContext, phase: HookPhase, hooks: &[HookSpec]) -> Result<()> {
        for hook in hooks {
            self.run(ctx, hook).map_err(|e| HomedeclError::HookFailed {
                hook: format!("{} '{}'", phase, sanitize::sanitize_for_display(&hook.command)),
                reason: hook_reason(e),
            })?;
        }
        Ok(())
    }

    /// Run every hook, collecting failures instead of stopping.
    pub fn run_all(&self, ctx: &ExecContext, phase: HookPhase, hooks: &[HookSpec]) -> Vec<HookFailure> {
        hooks
            .iter()
            .filter_map(|hook| {
                self.run(ctx, hook).err().map(|e| HookFailure {
                    phase,
                    command: sanitize::sanitize_for_display(&hook.command),
                    reason: hook_reason(e),
                })
            })
            .collect()
    }
}

fn hook_reason(error: HomedeclError) -> String {
    match error {
        HomedeclError::SystemCommandFailed { reason, .. } => reason,
        other => other.to_string(),
    }
}
