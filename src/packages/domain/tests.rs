use super::*;
use crate::backends::{ScriptedExecutor, Timeouts};
use crate::core::reconcile::reconcile_domain;
use crate::state::{LockFile, MemoryStore, PackageEntry};
use std::sync::Arc;

fn store(packages: &[(&str, &str)]) -> MemoryStore {
    let mut lock = LockFile::default();
    for (manager, name) in packages {
        lock.add(manager, PackageEntry::new(*name));
    }
    MemoryStore::new(lock)
}

fn registry(exec: ScriptedExecutor) -> (ManagerRegistry, Arc<ScriptedExecutor>) {
    let exec = Arc::new(exec);
    let registry = ManagerRegistry::builtin(exec.clone(), Timeouts::default()).unwrap();
    (registry, exec)
}

#[test]
fn classifies_against_listing() {
    let (registry, _) = registry(
        ScriptedExecutor::new()
            .with_binary("brew")
            .on_success("brew list -1", "jq\nwget\n"),
    );
    let store = store(&[("brew", "jq"), ("brew", "ripgrep")]);
    let domain = PackageDomain::new(&store, &registry, 4);

    let result = reconcile_domain(&domain, &ExecContext::new()).unwrap();

    assert_eq!(result.managed[0].name, "jq");
    assert_eq!(result.missing[0].name, "ripgrep");
    assert_eq!(result.untracked[0].name, "wget");
    assert!(result.errors.is_empty());
}

#[test]
fn only_referenced_managers_are_listed() {
    let (registry, exec) = registry(
        ScriptedExecutor::new()
            .with_binary("brew")
            .with_binary("npm")
            .on_success("brew list -1", "jq\n"),
    );
    let store = store(&[("brew", "jq")]);
    let domain = PackageDomain::new(&store, &registry, 4);

    reconcile_domain(&domain, &ExecContext::new()).unwrap();

    assert_eq!(exec.calls(), vec!["brew list -1"]);
}

#[test]
fn unavailable_manager_puts_its_items_in_errors() {
    let (registry, exec) = registry(
        ScriptedExecutor::new()
            .with_binary("brew")
            .on_success("brew list -1", "jq\n"),
    );
    let store = store(&[("brew", "jq"), ("pipx", "black"), ("pipx", "ruff")]);
    let domain = PackageDomain::new(&store, &registry, 2);

    let result = reconcile_domain(&domain, &ExecContext::new()).unwrap();

    assert_eq!(result.managed.len(), 1);
    assert_eq!(result.errors.len(), 2);
    let reason = result.errors[0].error.as_deref().unwrap();
    assert!(reason.contains("pipx is not available"));
    assert!(exec.calls_starting_with("pipx").is_empty());
}

#[test]
fn unknown_manager_is_an_item_error() {
    let (registry, _) = registry(ScriptedExecutor::new());
    let store = store(&[("zypper", "htop")]);
    let domain = PackageDomain::new(&store, &registry, 4);

    let result = reconcile_domain(&domain, &ExecContext::new()).unwrap();

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].error.as_deref().unwrap().contains("zypper"));
}

#[test]
fn failed_listing_is_reported_per_item() {
    let (registry, _) = registry(
        ScriptedExecutor::new()
            .with_binary("brew")
            .on_error("brew list -1", "timed out after 60s"),
    );
    let store = store(&[("brew", "jq")]);
    let domain = PackageDomain::new(&store, &registry, 4);

    let result = reconcile_domain(&domain, &ExecContext::new()).unwrap();

    assert!(result.managed.is_empty() && result.missing.is_empty());
    assert!(result.errors[0].error.as_deref().unwrap().contains("timed out"));
}

#[test]
fn parallel_listing_keeps_manager_order() {
    let (registry, _) = registry(
        ScriptedExecutor::new()
            .with_binary("brew")
            .with_binary("cargo")
            .with_binary("pipx")
            .on_success("brew list -1", "jq\nextra\n")
            .on_success("cargo install --list", "ripgrep v14.1.0:\n    rg\n")
            .on_success("pipx list --short", "black 24.1.0\n"),
    );
    let store = store(&[("pipx", "black"), ("brew", "jq"), ("cargo", "ripgrep")]);
    let domain = PackageDomain::new(&store, &registry, 3);
    let ctx = ExecContext::new();

    let desired = domain.desired().unwrap();
    let observed = domain.actual(&ctx, &desired).unwrap();

    let names: Vec<_> = observed.items.iter().map(Item::display_name).collect();
    assert_eq!(
        names,
        vec!["brew:jq", "brew:extra", "cargo:ripgrep", "pipx:black"]
    );
}

#[test]
fn apply_installs_and_plans() {
    let (registry, exec) = registry(
        ScriptedExecutor::new()
            .with_binary("brew")
            .on_failure("brew install nosuchformula", 1, "Error: No available formula with the name"),
    );
    let store = store(&[]);
    let domain = PackageDomain::new(&store, &registry, 4);
    let ctx = ExecContext::new();

    let item = Item::package("brew", "jq");
    assert_eq!(domain.planned(&item), ApplyStatus::WouldInstall);
    assert_eq!(domain.apply(&ctx, &item).unwrap(), ApplyStatus::Installed);
    assert_eq!(exec.calls_starting_with("brew install"), vec!["brew install jq"]);

    let err = domain
        .apply(&ctx, &Item::package("brew", "nosuchformula"))
        .unwrap_err();
    assert!(matches!(err, HomedeclError::Manager(_)));
}

#[test]
fn empty_lock_is_in_sync() {
    let (registry, exec) = registry(ScriptedExecutor::new());
    let store = store(&[]);
    let domain = PackageDomain::new(&store, &registry, 4);

    let result = reconcile_domain(&domain, &ExecContext::new()).unwrap();
    assert!(result.is_in_sync());
    assert!(exec.calls().is_empty());
}
