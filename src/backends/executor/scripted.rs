use super::{CommandExecutor, CommandOutput, CommandRequest};
use crate::core::context::ExecContext;
use crate::error::{HomedeclError, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandOutput),
    Fail(String),
}

/// Executor with canned responses, recording every command it is asked to run.
///
/// Responses are keyed by the space-joined command line. Unscripted commands
/// succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    binaries: BTreeSet<String>,
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `binary` resolvable on the fake PATH.
    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binaries.insert(binary.to_string());
        self
    }

    pub fn on(mut self, command_line: &str, output: CommandOutput) -> Self {
        self.responses
            .insert(command_line.to_string(), Scripted::Output(output));
        self
    }

    pub fn on_success(self, command_line: &str, stdout: &str) -> Self {
        self.on(command_line, CommandOutput::success(stdout))
    }

    pub fn on_failure(self, command_line: &str, exit_code: i32, stderr: &str) -> Self {
        self.on(command_line, CommandOutput::failure(exit_code, stderr))
    }

    /// Fail as if the process could not be run or timed out.
    pub fn on_error(mut self, command_line: &str, reason: &str) -> Self {
        self.responses
            .insert(command_line.to_string(), Scripted::Fail(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn look_path(&self, binary: &str) -> Option<PathBuf> {
        self.binaries
            .contains(binary)
            .then(|| PathBuf::from("/fake/bin").join(binary))
    }

    fn execute(&self, ctx: &ExecContext, request: &CommandRequest) -> Result<CommandOutput> {
        if ctx.is_cancelled() {
            return Err(HomedeclError::Interrupted);
        }

        let command_line = request.command_line();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command_line.clone());
        }

        match self.responses.get(&command_line) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::Fail(reason)) => Err(HomedeclError::SystemCommandFailed {
                command: command_line,
                reason: reason.clone(),
            }),
            None => Ok(CommandOutput::success("")),
        }
    }
}
