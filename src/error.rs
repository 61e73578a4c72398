use crate::backends::error_matcher::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomedeclError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Parsing error in '{file}': {message}")]
    ParseError { file: String, message: String },

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error("Unsupported package manager: {0}")]
    UnsupportedManager(String),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    /// Lock acquisition failed (another process, poisoned mutex)
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// Path resolution or validation error
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Hook '{hook}' failed: {reason}")]
    HookFailed { hook: String, reason: String },

    #[error("Apply finished with {failed} failed item(s)")]
    ApplyFailed { failed: usize },

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HomedeclError>;

/// Failure of a single package manager operation.
///
/// Every runtime operation reports one of these; none of them abort a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("{manager} is not available on this system")]
    Unavailable { manager: String },

    #[error("{manager}: '{command}' failed: {reason}")]
    Execution {
        manager: String,
        command: String,
        reason: String,
    },

    #[error("{manager}: could not parse output: {message}")]
    Parse { manager: String, message: String },

    #[error("{manager}: {kind} ({package}): {detail}")]
    Domain {
        manager: String,
        package: String,
        kind: ErrorKind,
        detail: String,
    },

    #[error("{manager} does not support {operation}")]
    Unsupported {
        manager: String,
        operation: &'static str,
    },
}

impl ManagerError {
    pub fn manager(&self) -> &str {
        match self {
            ManagerError::Unavailable { manager }
            | ManagerError::Execution { manager, .. }
            | ManagerError::Parse { manager, .. }
            | ManagerError::Domain { manager, .. }
            | ManagerError::Unsupported { manager, .. } => manager,
        }
    }

    /// Classified kind for domain failures, `None` for the other variants.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ManagerError::Domain { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type ManagerResult<T> = std::result::Result<T, ManagerError>;
