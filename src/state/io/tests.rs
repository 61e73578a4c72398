use super::*;
use crate::state::types::PackageEntry;
use tempfile::tempdir;

#[test]
fn missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());
    let lock = store.load().unwrap();
    assert_eq!(lock.package_count(), 0);
    assert_eq!(lock.version, LOCK_FILE_VERSION);
}

#[test]
fn empty_file_loads_empty() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());
    fs::write(store.path(), "  \n").unwrap();
    assert_eq!(store.load().unwrap().package_count(), 0);
}

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());

    let mut lock = LockFile::default();
    lock.add("brew", PackageEntry::new("jq"));
    lock.add("npm", PackageEntry::new("typescript"));
    store.save(&lock).unwrap();

    let loaded = store.load().unwrap();
    assert!(loaded.contains("brew", "jq"));
    assert!(loaded.contains("npm", "typescript"));
    assert_ne!(loaded.meta.hostname, "");
    assert!(!dir.path().join("homedecl.lock.tmp").exists());
    assert!(!dir.path().join("homedecl.lock.guard").exists());
}

#[test]
fn save_creates_config_dir() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(&dir.path().join("nested"));
    store.save(&LockFile::default()).unwrap();
    assert!(store.path().exists());
}

#[test]
fn corrupt_file_is_parse_error() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());
    fs::write(store.path(), "{ not json").unwrap();
    assert!(matches!(store.load(), Err(HomedeclError::ParseError { .. })));
}

#[test]
fn newer_version_is_rejected() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());
    fs::write(
        store.path(),
        r#"{"version": 99, "meta": {"updated_at": "2025-01-01T00:00:00Z", "hostname": "h"}, "packages": {}}"#,
    )
    .unwrap();
    let err = store.load().unwrap_err();
    assert!(err.to_string().contains("newer"));
}

#[test]
fn lock_contention_returns_error() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());

    let _held = store.acquire().unwrap();
    match store.save(&LockFile::default()) {
        Ok(_) => panic!("second lock should fail"),
        Err(err) => assert!(err.to_string().contains("currently running")),
    }
}

#[test]
fn update_writes_only_on_change() {
    let dir = tempdir().unwrap();
    let store = LockFileStore::in_config_dir(dir.path());

    let changed = store
        .update(&mut |lock| lock.add("brew", PackageEntry::new("jq")))
        .unwrap();
    assert!(changed);
    assert!(store.load().unwrap().contains("brew", "jq"));

    let changed = store
        .update(&mut |lock| lock.add("brew", PackageEntry::new("jq")))
        .unwrap();
    assert!(!changed);

    let changed = store.update(&mut |lock| lock.remove("brew", "fd")).unwrap();
    assert!(!changed);
    assert!(!dir.path().join("homedecl.lock.guard").exists());
}
