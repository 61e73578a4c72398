use crate::constants::LOCK_FILE_VERSION;
use crate::core::types::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockFile {
    pub version: u32,
    pub meta: LockMeta,
    /// Manager name to declared packages, in declaration order
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<PackageEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockMeta {
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl PackageEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            added_at: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }
}

impl Default for LockFile {
    fn default() -> Self {
        Self {
            version: LOCK_FILE_VERSION,
            meta: LockMeta {
                updated_at: Utc::now(),
                hostname: "unknown".to_string(),
            },
            packages: BTreeMap::new(),
        }
    }
}

impl LockFile {
    pub fn contains(&self, manager: &str, name: &str) -> bool {
        self.packages
            .get(manager)
            .is_some_and(|entries| entries.iter().any(|e| e.name == name))
    }

    /// Declare a package. Returns false if it was already declared.
    pub fn add(&mut self, manager: &str, entry: PackageEntry) -> bool {
        if self.contains(manager, &entry.name) {
            return false;
        }
        self.packages
            .entry(manager.to_string())
            .or_default()
            .push(entry);
        true
    }

    /// Remove a declaration. Returns false if it was not declared.
    pub fn remove(&mut self, manager: &str, name: &str) -> bool {
        let Some(entries) = self.packages.get_mut(manager) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.name != name);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.packages.remove(manager);
        }
        removed
    }

    pub fn package_count(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    /// Declared packages as items, sorted by manager, in declaration order
    /// within a manager. Entry metadata is carried over.
    pub fn desired_items(&self) -> Vec<Item> {
        self.packages
            .iter()
            .flat_map(|(manager, entries)| {
                entries.iter().map(move |entry| {
                    let mut item = Item::package(manager, &entry.name);
                    item.metadata = entry.metadata.clone();
                    if let Some(version) = &entry.version {
                        item.metadata.insert("version".to_string(), version.clone());
                    }
                    item
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut lock = LockFile::default();
        assert!(lock.add("brew", PackageEntry::new("jq")));
        assert!(!lock.add("brew", PackageEntry::new("jq")));
        assert!(lock.add("npm", PackageEntry::new("jq")));
        assert_eq!(lock.package_count(), 2);
    }

    #[test]
    fn remove_drops_empty_manager() {
        let mut lock = LockFile::default();
        lock.add("brew", PackageEntry::new("jq"));
        assert!(!lock.remove("brew", "ripgrep"));
        assert!(lock.remove("brew", "jq"));
        assert!(lock.packages.is_empty());
        assert!(!lock.remove("cargo", "jq"));
    }

    #[test]
    fn desired_items_sorted_by_manager_then_declaration() {
        let mut lock = LockFile::default();
        lock.add("npm", PackageEntry::new("typescript"));
        lock.add("brew", PackageEntry::new("wget"));
        lock.add("brew", PackageEntry::new("bat"));

        let items = lock.desired_items();
        let keys: Vec<_> = items
            .iter()
            .map(|i| format!("{}:{}", i.manager, i.name))
            .collect();
        assert_eq!(keys, vec!["brew:wget", "brew:bat", "npm:typescript"]);
    }

    #[test]
    fn lock_json_shape() {
        let mut lock = LockFile::default();
        let mut entry = PackageEntry::new("jq");
        entry.version = Some("1.7".to_string());
        lock.add("brew", entry);

        let json: serde_json::Value = serde_json::to_value(&lock).unwrap();
        assert_eq!(json["version"], 3);
        assert_eq!(json["packages"]["brew"][0]["name"], "jq");
        assert_eq!(json["packages"]["brew"][0]["version"], "1.7");
        assert!(json["meta"]["updated_at"].is_string());
        assert!(json["packages"]["brew"][0].get("metadata").is_none());
    }
}
