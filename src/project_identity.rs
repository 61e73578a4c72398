//! Central project identity contract.
//!
//! Single source of truth for binary, directory and environment names.

pub const BINARY_NAME: &str = "homedecl";
pub const ENV_PREFIX: &str = "HOMEDECL";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}
