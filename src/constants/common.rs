// Common constants used throughout the codebase

/// Project name
pub const PROJECT_NAME: &str = "homedecl";

/// Project organization (reverse domain notation)
pub const PROJECT_QUALIFIER: &str = "com";
pub const PROJECT_ORG: &str = "homedecl";

/// Main configuration file name
pub const CONFIG_FILE_NAME: &str = "homedecl.kdl";

/// Extra manager descriptors, merged over the built-in ones
pub const MANAGERS_FILE_NAME: &str = "managers.kdl";

/// Desired package lock file
pub const LOCK_FILE_NAME: &str = "homedecl.lock";
pub const LOCK_FILE_VERSION: u32 = 3;

/// Dotfile sources live here, relative to the config directory
pub const DOTFILES_DIR_NAME: &str = "dotfiles";

/// Sources ending in this suffix are rendered before deployment
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".DS_Store", ".git", "*.swp", "*~"];

/// Listing, probing, search and info
pub const DEFAULT_LIST_TIMEOUT_SECS: u64 = 60;

/// Install, uninstall and upgrade
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 600;

pub const DEFAULT_HOOK_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_MAX_PARALLEL_LISTING: usize = 4;
