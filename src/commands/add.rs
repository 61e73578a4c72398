//! `homedecl add` and `homedecl remove`: edit the declared package set.
//!
//! `add` only touches the lock file; `apply` does the installing. `remove
//! --uninstall` also uninstalls through the package's manager.

use super::session::Session;
use crate::core::identity::PackageSpec;
use crate::error::{HomedeclError, Result};
use crate::packages::OperationOutcome;
use crate::state::{DesiredStore, PackageEntry};
use crate::ui as output;
use crate::utils::sanitize;

pub fn add(session: &Session, packages: &[String]) -> Result<()> {
    let specs = parse_all(session, packages)?;

    for spec in &specs {
        let added = session
            .store
            .update(&mut |lock| lock.add(&spec.manager, PackageEntry::new(&spec.name)))?;

        if added {
            output::success(&format!("Declared {}", spec));
        } else {
            output::info(&format!("{} is already declared", spec));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Also uninstall from the system
    pub uninstall: bool,
    pub dry_run: bool,
}

pub fn remove(session: &Session, packages: &[String], options: RemoveOptions) -> Result<()> {
    let specs = parse_all(session, packages)?;

    if options.dry_run {
        return preview_remove(session, &specs, options);
    }

    let mut missing = 0;
    let mut failed = 0;
    for spec in &specs {
        if options.uninstall && !uninstall(session, spec) {
            failed += 1;
            continue;
        }

        if session.store.update(&mut |lock| lock.remove(&spec.manager, &spec.name))? {
            output::success(&format!("Removed {} from the declaration", spec));
        } else {
            missing += 1;
            output::warning(&format!("{} is not declared", spec));
        }
    }

    if failed > 0 {
        return Err(HomedeclError::Other(format!("{} uninstall(s) failed", failed)));
    }
    if !options.uninstall && missing == specs.len() {
        return Err(HomedeclError::Other("Nothing was removed".to_string()));
    }
    Ok(())
}

/// Uninstall one package. A failure is printed, and the package stays
/// declared.
fn uninstall(session: &Session, spec: &PackageSpec) -> bool {
    let outcome = session
        .registry
        .resolve(&spec.manager)
        .and_then(|runtime| {
            runtime
                .uninstall(&session.ctx, &spec.name)
                .map_err(HomedeclError::from)
        });

    match outcome {
        Ok(OperationOutcome::Applied) => {
            output::success(&format!("Uninstalled {}", spec));
            true
        }
        Ok(OperationOutcome::AlreadySatisfied) => {
            output::info(&format!("{} was not installed", spec));
            true
        }
        Err(e) => {
            output::error(&format!("{}: {}", spec, e));
            false
        }
    }
}

fn preview_remove(session: &Session, specs: &[PackageSpec], options: RemoveOptions) -> Result<()> {
    let lock = session.store.load()?;
    output::header("Remove (dry run)");
    for spec in specs {
        if options.uninstall {
            output::indent(&format!("would uninstall {}", spec), 1);
        }
        if lock.contains(&spec.manager, &spec.name) {
            output::indent(&format!("would remove {} from the declaration", spec), 1);
        } else {
            output::indent(&format!("{} is not declared", spec), 1);
        }
    }
    Ok(())
}

/// Every specifier must name a known manager and a valid package before the
/// lock file is touched.
fn parse_all(session: &Session, packages: &[String]) -> Result<Vec<PackageSpec>> {
    packages
        .iter()
        .map(|input| {
            let spec = session.parse_spec(input)?;
            if !session.registry.contains(&spec.manager) {
                return Err(HomedeclError::UnsupportedManager(format!(
                    "'{}' (available: {})",
                    spec.manager,
                    session.registry.list_managers().join(", ")
                )));
            }
            sanitize::validate_package_name(&spec.name)?;
            Ok(spec)
        })
        .collect()
}
