use crate::core::context::ExecContext;
use crate::core::types::Item;
use crate::error::ManagerResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a mutating operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationOutcome {
    /// The command ran and changed something
    Applied,
    /// The manager reported there was nothing to do
    AlreadySatisfied,
}

/// Search hit from a package repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub manager: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub manager: String,
    pub installed: bool,
    /// `Key: Value` lines of the info command, keys lowercased
    pub fields: BTreeMap<String, String>,
}

impl PackageInfo {
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeResult {
    pub name: String,
    pub outcome: ManagerResult<OperationOutcome>,
}

pub trait PackageManager: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(false)` when the binary is not on PATH. A failing version probe
    /// after the binary was found is an error.
    fn is_available(&self, ctx: &ExecContext) -> ManagerResult<bool>;

    fn list_installed(&self, ctx: &ExecContext) -> ManagerResult<Vec<Item>>;

    fn install(&self, ctx: &ExecContext, name: &str) -> ManagerResult<OperationOutcome>;

    fn uninstall(&self, ctx: &ExecContext, name: &str) -> ManagerResult<OperationOutcome>;

    fn is_installed(&self, ctx: &ExecContext, name: &str) -> ManagerResult<bool>;

    fn installed_version(&self, ctx: &ExecContext, name: &str) -> ManagerResult<Option<String>>;

    fn search(&self, ctx: &ExecContext, query: &str) -> ManagerResult<Vec<SearchResult>>;

    fn info(&self, ctx: &ExecContext, name: &str) -> ManagerResult<PackageInfo>;

    /// Upgrade `names`, or everything the manager installed when `names` is empty.
    fn upgrade(&self, ctx: &ExecContext, names: &[String]) -> ManagerResult<Vec<UpgradeResult>>;

    fn supports_search(&self) -> bool;
}
