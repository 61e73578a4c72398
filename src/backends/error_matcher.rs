//! Shared vocabulary for classifying manager output.
//!
//! Managers report failures as free text. Matching is case-insensitive
//! substring search over combined stdout and stderr; the first table entry
//! that matches wins. Hard failures always rank above the "nothing to do"
//! vocabulary, so an incidental "already installed" never masks them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyInstalled,
    NotInstalled,
    Permission,
    Locked,
    Network,
    Build,
    Dependency,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::NotFound => "package not found",
            ErrorKind::AlreadyInstalled => "already installed",
            ErrorKind::NotInstalled => "not installed",
            ErrorKind::Permission => "permission denied",
            ErrorKind::Locked => "package database locked",
            ErrorKind::Network => "network error",
            ErrorKind::Build => "build failed",
            ErrorKind::Dependency => "dependency conflict",
            ErrorKind::Unknown => "command failed",
        };
        f.write_str(text)
    }
}

/// Which operation produced the output being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Uninstall,
    Upgrade,
    Query,
}

const NOT_FOUND: &[&str] = &[
    "not found",
    "unable to locate",
    "no such package",
    "could not find",
    "has no installation candidate",
    "no matching distribution",
    "unable to find",
    "package not found",
    "no packages found",
    "no available formula",
];

const PERMISSION: &[&str] = &[
    "permission denied",
    "are you root",
    "could not open lock file",
    "access is denied",
    "access denied",
    "requires sudo",
    "operation not permitted",
];

const ALREADY_INSTALLED: &[&str] = &[
    "already installed",
    "is already the newest version",
];

/// Upgrades only; on install these phrases also show up in passing.
const UP_TO_DATE: &[&str] = &[
    "already installed",
    "is already the newest version",
    "already satisfied",
    "up to date",
    "already up-to-date",
];

const NOT_INSTALLED: &[&str] = &[
    "not installed",
    "cannot uninstall",
    "is not installed",
    "no such package installed",
    "package not installed",
];

const LOCKED: &[&str] = &[
    "could not get lock",
    "unable to lock",
    "database is locked",
    "lock file exists",
    "waiting for cache lock",
    "dpkg was interrupted",
];

const NETWORK: &[&str] = &[
    "could not resolve host",
    "temporary failure in name resolution",
    "connection refused",
    "connection reset",
    "network is unreachable",
    "econnrefused",
    "etimedout",
    "failed to download",
];

const BUILD: &[&str] = &[
    "could not compile",
    "compilation failed",
    "build failed",
    "failed to build",
    "error: linking with",
];

const DEPENDENCY: &[&str] = &[
    "eresolve",
    "unmet dependencies",
    "conflicting dependencies",
    "dependency conflict",
    "requires a different version",
];

fn table(operation: Operation) -> [(ErrorKind, &'static [&'static str]); 8] {
    let hard = [
        (ErrorKind::Permission, PERMISSION),
        (ErrorKind::Locked, LOCKED),
        (ErrorKind::Network, NETWORK),
        (ErrorKind::Build, BUILD),
        (ErrorKind::Dependency, DEPENDENCY),
    ];
    match operation {
        // "no such package installed" must not read as NotFound here
        Operation::Uninstall => [
            hard[0],
            hard[1],
            hard[2],
            hard[3],
            hard[4],
            (ErrorKind::NotInstalled, NOT_INSTALLED),
            (ErrorKind::NotFound, NOT_FOUND),
            (ErrorKind::AlreadyInstalled, ALREADY_INSTALLED),
        ],
        _ => [
            (ErrorKind::NotFound, NOT_FOUND),
            hard[0],
            hard[1],
            hard[2],
            hard[3],
            hard[4],
            if operation == Operation::Upgrade {
                (ErrorKind::AlreadyInstalled, UP_TO_DATE)
            } else {
                (ErrorKind::AlreadyInstalled, ALREADY_INSTALLED)
            },
            (ErrorKind::NotInstalled, NOT_INSTALLED),
        ],
    }
}

/// Classify manager output for `operation`.
pub fn classify(output: &str, operation: Operation) -> ErrorKind {
    let lower = output.to_lowercase();

    for (kind, patterns) in table(operation) {
        if patterns.iter().any(|p| lower.contains(p)) {
            return kind;
        }
    }

    ErrorKind::Unknown
}

/// Failures that no idempotent phrase elsewhere in the output can excuse.
pub fn is_hard_failure(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Permission
            | ErrorKind::Locked
            | ErrorKind::Network
            | ErrorKind::Build
            | ErrorKind::Dependency
    )
}

/// Whether `kind` means the operation had nothing to do.
pub fn is_already_satisfied(kind: ErrorKind, operation: Operation) -> bool {
    matches!(
        (operation, kind),
        (Operation::Install, ErrorKind::AlreadyInstalled)
            | (Operation::Upgrade, ErrorKind::AlreadyInstalled)
            | (Operation::Uninstall, ErrorKind::NotInstalled)
    )
}

/// Descriptor-specific idempotent fragments (already lowercased).
pub fn matches_idempotent(output: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let lower = output.to_lowercase();
    patterns.iter().any(|p| lower.contains(p.as_str()))
}
