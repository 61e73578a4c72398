use crate::backends::descriptor::DescriptorSpec;
use crate::backends::generic::Timeouts;
use crate::constants::{
    DEFAULT_HOOK_TIMEOUT_SECS, DEFAULT_IGNORE_PATTERNS, DEFAULT_LIST_TIMEOUT_SECS,
    DEFAULT_MAX_PARALLEL_LISTING, DEFAULT_OPERATION_TIMEOUT_SECS,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Manager used for package specifiers without a `manager:` prefix
    pub default_manager: Option<String>,
    pub list_timeout: Duration,
    pub operation_timeout: Duration,
    pub hook_timeout: Duration,
    pub max_parallel_listing: usize,
    /// Glob-style patterns excluded from the dotfile scan
    pub ignore: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_manager: None,
            list_timeout: Duration::from_secs(DEFAULT_LIST_TIMEOUT_SECS),
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
            hook_timeout: Duration::from_secs(DEFAULT_HOOK_TIMEOUT_SECS),
            max_parallel_listing: DEFAULT_MAX_PARALLEL_LISTING,
            ignore: DEFAULT_IGNORE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            discovery: self.list_timeout,
            operation: self.operation_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSpec {
    pub command: String,
    /// Overrides `settings.hook-timeout`
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hooks {
    pub pre_apply: Vec<HookSpec>,
    pub post_apply: Vec<HookSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub config_dir: PathBuf,
    pub settings: Settings,
    pub vars: BTreeMap<String, String>,
    pub hooks: Hooks,
    /// `managers.kdl` definitions first, then the main file's
    pub managers: Vec<DescriptorSpec>,
}
