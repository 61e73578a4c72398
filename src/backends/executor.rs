//! Command execution.
//!
//! [`CommandExecutor`] is the only place the crate touches OS processes. The
//! runtime, hooks and registry receive an executor explicitly, so tests swap
//! in [`ScriptedExecutor`] and nothing global needs resetting.

mod scripted;

pub use scripted::ScriptedExecutor;

use crate::core::context::ExecContext;
use crate::error::{HomedeclError, Result};
use crate::ui;
use crate::utils::platform::build_program_command;
use std::io::Read;
use std::path::PathBuf;
use std::process::Stdio;
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A program invocation. Arguments are passed as-is, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandRequest {
    pub fn new(argv: Vec<String>, timeout: Duration) -> Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next().filter(|p| !p.is_empty()).ok_or_else(|| {
            HomedeclError::ConfigError("Command cannot be empty".to_string())
        })?;
        Ok(Self {
            program,
            args: argv.collect(),
            timeout,
        })
    }

    /// Space-joined command line, for messages and matching.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout and stderr together, for error classification.
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, _) => self.stderr.clone(),
            (false, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }

    /// Last non-empty line of combined output, for one-line error messages.
    pub fn summary(&self) -> String {
        self.combined()
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match self.exit_code {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            })
    }
}

pub trait CommandExecutor: Send + Sync {
    /// Resolve a binary on PATH.
    fn look_path(&self, binary: &str) -> Option<PathBuf>;

    /// Run a command to completion.
    ///
    /// A non-zero exit is NOT an error here; callers decide what it means.
    /// Spawn failures and timeouts are `SystemCommandFailed`, cancellation is
    /// `Interrupted`.
    fn execute(&self, ctx: &ExecContext, request: &CommandRequest) -> Result<CommandOutput>;
}

/// Runs real processes with a timeout, honouring cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn look_path(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }

    fn execute(&self, ctx: &ExecContext, request: &CommandRequest) -> Result<CommandOutput> {
        if ctx.is_cancelled() {
            return Err(HomedeclError::Interrupted);
        }

        let command_line = request.command_line();
        ui::verbose(&format!("$ {}", command_line));

        let mut cmd = build_program_command(&request.program, &request.args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| HomedeclError::SystemCommandFailed {
            command: command_line.clone(),
            reason: e.to_string(),
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HomedeclError::SystemCommandFailed {
                command: command_line.clone(),
                reason: "Failed to capture stdout".to_string(),
            })?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| HomedeclError::SystemCommandFailed {
                command: command_line.clone(),
                reason: "Failed to capture stderr".to_string(),
            })?;

        // Drain pipes concurrently so a chatty child cannot block on a full pipe
        let stdout_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = std::io::BufReader::new(stdout).read_to_end(&mut buf);
            buf
        });
        let stderr_thread = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = std::io::BufReader::new(stderr).read_to_end(&mut buf);
            buf
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    let timed_out = start.elapsed() > request.timeout;
                    if timed_out || ctx.is_cancelled() {
                        let _ = child.kill();
                        let _ = child.wait();
                        let _ = stdout_thread.join();
                        let _ = stderr_thread.join();
                        if !timed_out {
                            return Err(HomedeclError::Interrupted);
                        }
                        return Err(HomedeclError::SystemCommandFailed {
                            command: command_line,
                            reason: format!(
                                "Command timed out after {} seconds",
                                request.timeout.as_secs()
                            ),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(HomedeclError::SystemCommandFailed {
                        command: command_line,
                        reason: e.to_string(),
                    });
                }
            }
        };

        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests;
