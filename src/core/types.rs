use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Kind of entity being reconciled.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Packages,
    Dotfiles,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Packages => write!(f, "packages"),
            Self::Dotfiles => write!(f, "dotfiles"),
        }
    }
}

// Recomputed on every pass, never persisted.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// Declared and present
    Managed,
    /// Declared, not present
    Missing,
    /// Present, not declared
    Untracked,
    /// Declared and present, but content differs
    Degraded,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed => write!(f, "managed"),
            Self::Missing => write!(f, "missing"),
            Self::Untracked => write!(f, "untracked"),
            Self::Degraded => write!(f, "drifted"),
        }
    }
}

/// Identity of an item within its domain.
///
/// Packages are unique per (manager, name); dotfiles per deployed path.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ItemKey {
    Package { manager: String, name: String },
    Path(PathBuf),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package { manager, name } => write!(f, "{}:{}", manager, name),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One package or dotfile, as declared or as observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manager: String,
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ItemState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Item {
    pub fn package(manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manager: manager.into(),
            domain: Domain::Packages,
            state: None,
            path: None,
            error: None,
            metadata: BTreeMap::new(),
        }
    }

    /// `path` is where the dotfile is deployed.
    pub fn dotfile(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            manager: String::new(),
            domain: Domain::Dotfiles,
            state: None,
            path: Some(path.into()),
            error: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn key(&self) -> ItemKey {
        match (&self.domain, &self.path) {
            (Domain::Dotfiles, Some(path)) => ItemKey::Path(crate::utils::paths::normalize(path)),
            (Domain::Dotfiles, None) => ItemKey::Path(PathBuf::from(&self.name)),
            (Domain::Packages, _) => ItemKey::Package {
                manager: self.manager.clone(),
                name: self.name.clone(),
            },
        }
    }

    /// `manager:name` for packages, the deployed path for dotfiles.
    pub fn display_name(&self) -> String {
        match self.domain {
            Domain::Packages => format!("{}:{}", self.manager, self.name),
            Domain::Dotfiles => self
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| self.name.clone()),
        }
    }

    /// Copy observed metadata without overwriting declared keys.
    pub fn absorb_metadata(&mut self, observed: &BTreeMap<String, String>) {
        for (key, value) in observed {
            self.metadata
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub managed: usize,
    pub missing: usize,
    pub untracked: usize,
    pub drifted: usize,
    pub errors: usize,
}

impl StateCounts {
    fn add(&mut self, other: StateCounts) {
        self.managed += other.managed;
        self.missing += other.missing;
        self.untracked += other.untracked;
        self.drifted += other.drifted;
        self.errors += other.errors;
    }
}

/// Classification of one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileResult {
    pub domain: Domain,
    pub managed: Vec<Item>,
    pub missing: Vec<Item>,
    pub untracked: Vec<Item>,
    #[serde(rename = "drifted")]
    pub degraded: Vec<Item>,
    /// Items whose state could not be determined
    pub errors: Vec<Item>,
}

impl ReconcileResult {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            managed: Vec::new(),
            missing: Vec::new(),
            untracked: Vec::new(),
            degraded: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn counts(&self) -> StateCounts {
        StateCounts {
            managed: self.managed.len(),
            missing: self.missing.len(),
            untracked: self.untracked.len(),
            drifted: self.degraded.len(),
            errors: self.errors.len(),
        }
    }

    /// Missing then drifted items, each in discovery order.
    pub fn actionable(&self) -> impl Iterator<Item = &Item> {
        self.missing.iter().chain(self.degraded.iter())
    }

    pub fn is_in_sync(&self) -> bool {
        self.missing.is_empty() && self.degraded.is_empty() && self.errors.is_empty()
    }
}

/// Results of several domains with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub results: Vec<ReconcileResult>,
    pub totals: StateCounts,
}

impl Summary {
    pub fn from_results(results: Vec<ReconcileResult>) -> Self {
        let mut totals = StateCounts::default();
        for result in &results {
            totals.add(result.counts());
        }
        Self { results, totals }
    }

    pub fn is_in_sync(&self) -> bool {
        self.results.iter().all(ReconcileResult::is_in_sync)
    }
}

/// Outcome of applying (or planning) one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyStatus {
    Installed,
    WouldInstall,
    Added,
    WouldAdd,
    Updated,
    WouldUpdate,
    Failed,
    Skipped,
}

impl ApplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::WouldInstall => "would-install",
            Self::Added => "added",
            Self::WouldAdd => "would-add",
            Self::Updated => "updated",
            Self::WouldUpdate => "would-update",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_planned(&self) -> bool {
        matches!(self, Self::WouldInstall | Self::WouldAdd | Self::WouldUpdate)
    }
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
