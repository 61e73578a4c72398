//! `homedecl upgrade`
//!
//! With no arguments every manager referenced by the lock file is upgraded:
//! through its upgrade-all command when it has one, else package by package.

use super::session::Session;
use crate::core::identity::PackageSpec;
use crate::error::{HomedeclError, Result};
use crate::packages::OperationOutcome;
use crate::state::DesiredStore;
use crate::ui as output;
use std::collections::BTreeMap;

pub fn run(session: &Session, targets: &[String]) -> Result<()> {
    let plan = if targets.is_empty() {
        whole_lock(session)?
    } else {
        let mut plan: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for target in targets {
            let spec = session.parse_spec(target)?;
            plan.entry(spec.manager).or_default().push(spec.name);
        }
        plan
    };

    if plan.is_empty() {
        output::info("No packages declared");
        return Ok(());
    }

    let mut failed = 0;
    for (manager, names) in &plan {
        let runtime = session.registry.resolve(manager)?;
        output::header(&format!("Upgrading {}", manager));

        match runtime.upgrade(&session.ctx, names) {
            Ok(results) => {
                for result in results {
                    let label = if result.name == "*" {
                        manager.clone()
                    } else {
                        PackageSpec::new(manager, &result.name).to_string()
                    };
                    match result.outcome {
                        Ok(OperationOutcome::Applied) => output::success(&label),
                        Ok(OperationOutcome::AlreadySatisfied) => {
                            output::info(&format!("{} is up to date", label))
                        }
                        Err(e) => {
                            failed += 1;
                            output::error(&e.to_string());
                        }
                    }
                }
            }
            Err(e) => {
                failed += 1;
                output::error(&e.to_string());
            }
        }
    }

    if failed > 0 {
        return Err(HomedeclError::Other(format!("{} upgrade(s) failed", failed)));
    }
    Ok(())
}

/// Manager → names to pass to `upgrade`; empty means "everything".
fn whole_lock(session: &Session) -> Result<BTreeMap<String, Vec<String>>> {
    let lock = session.store.load()?;
    Ok(lock
        .packages
        .iter()
        .map(|(manager, entries)| {
            let upgrade_all = session
                .registry
                .descriptor(manager)
                .is_some_and(|d| d.upgrade_all.is_some());
            let names = if upgrade_all {
                Vec::new()
            } else {
                entries.iter().map(|e| e.name.clone()).collect()
            };
            (manager.clone(), names)
        })
        .collect())
}
