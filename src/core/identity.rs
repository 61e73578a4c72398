//! Package specifiers.
//!
//! Users name packages as `manager:name` (`npm:typescript`, `brew:jq`). The
//! manager is everything before the first `:`, so names may themselves contain
//! colons. A bare `name` only resolves when a default manager is configured.

use crate::core::types::Item;
use crate::error::{HomedeclError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageSpec {
    pub manager: String,
    pub name: String,
}

impl PackageSpec {
    pub fn new(manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            manager: manager.into(),
            name: name.into(),
        }
    }

    pub fn parse(input: &str, default_manager: Option<&str>) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(HomedeclError::ConfigError(
                "Package specifier cannot be empty".to_string(),
            ));
        }

        let (manager, name) = match input.split_once(':') {
            Some((manager, name)) => (manager.trim(), name.trim()),
            None => {
                let manager = default_manager.filter(|m| !m.is_empty()).ok_or_else(|| {
                    HomedeclError::ConfigError(format!(
                        "'{}' has no manager prefix and no default-manager is configured. Use manager:name",
                        input
                    ))
                })?;
                (manager, input)
            }
        };

        if manager.is_empty() || name.is_empty() {
            return Err(HomedeclError::ConfigError(format!(
                "Invalid package specifier '{}'. Use manager:name",
                input
            )));
        }

        Ok(Self::new(manager, name))
    }

    pub fn to_item(&self) -> Item {
        Item::package(&self.manager, &self.name)
    }
}

impl FromStr for PackageSpec {
    type Err = HomedeclError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, None)
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.manager, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_colon() {
        let spec: PackageSpec = "pipx:black==24.1.0".parse().unwrap();
        assert_eq!(spec, PackageSpec::new("pipx", "black==24.1.0"));

        let spec: PackageSpec = "brew:homebrew/cask:odd".parse().unwrap();
        assert_eq!(spec.manager, "brew");
        assert_eq!(spec.name, "homebrew/cask:odd");
    }

    #[test]
    fn bare_name_uses_default_manager() {
        let spec = PackageSpec::parse("jq", Some("brew")).unwrap();
        assert_eq!(spec.to_string(), "brew:jq");
        assert!(PackageSpec::parse("jq", None).is_err());
    }

    #[test]
    fn empty_parts_are_rejected() {
        assert!("npm:".parse::<PackageSpec>().is_err());
        assert!(":typescript".parse::<PackageSpec>().is_err());
        assert!("".parse::<PackageSpec>().is_err());
    }
}
