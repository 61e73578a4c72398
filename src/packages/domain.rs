use crate::backends::ManagerRegistry;
use crate::core::context::ExecContext;
use crate::core::domain::{DomainAdapter, Observed};
use crate::core::types::{ApplyStatus, Domain, Item};
use crate::error::{HomedeclError, Result};
use crate::state::DesiredStore;
use crate::ui as output;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Packages declared in the lock store, observed through the manager registry.
pub struct PackageDomain<'a> {
    store: &'a dyn DesiredStore,
    registry: &'a ManagerRegistry,
    max_parallel: usize,
}

/// Installed listing of one manager, or why there is none.
type Listing = std::result::Result<Vec<Item>, String>;

impl<'a> PackageDomain<'a> {
    pub fn new(store: &'a dyn DesiredStore, registry: &'a ManagerRegistry, max_parallel: usize) -> Self {
        Self {
            store,
            registry,
            max_parallel: max_parallel.max(1),
        }
    }

    fn list_manager(&self, ctx: &ExecContext, manager: &str) -> Listing {
        let runtime = self.registry.resolve(manager).map_err(|e| e.to_string())?;

        match runtime.is_available(ctx) {
            Ok(true) => {}
            Ok(false) => {
                let hint = self
                    .registry
                    .descriptor(manager)
                    .and_then(|d| d.install_hint.as_deref())
                    .map(|h| format!(" ({})", h))
                    .unwrap_or_default();
                return Err(format!("{} is not available on this system{}", manager, hint));
            }
            Err(e) => return Err(e.to_string()),
        }

        output::verbose(&format!("Listing installed packages for {}", manager));
        runtime.list_installed(ctx).map_err(|e| e.to_string())
    }

    /// List every manager in `managers` on a pool of at most `max_parallel`
    /// threads. Results come back in the order of `managers`.
    fn list_all(&self, ctx: &ExecContext, managers: &[String]) -> Result<Vec<(String, Listing)>> {
        if managers.len() <= 1 {
            return Ok(managers
                .iter()
                .map(|m| (m.clone(), self.list_manager(ctx, m)))
                .collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_parallel.min(managers.len()))
            .build()
            .map_err(|e| HomedeclError::Other(format!("Failed to start listing pool: {}", e)))?;

        Ok(pool.install(|| {
            managers
                .par_iter()
                .map(|m| (m.clone(), self.list_manager(ctx, m)))
                .collect()
        }))
    }
}

impl DomainAdapter for PackageDomain<'_> {
    fn domain(&self) -> Domain {
        Domain::Packages
    }

    fn desired(&self) -> Result<Vec<Item>> {
        Ok(self.store.load()?.desired_items())
    }

    /// Only managers referenced by `desired` are listed.
    fn actual(&self, ctx: &ExecContext, desired: &[Item]) -> Result<Observed> {
        let managers: Vec<String> = desired
            .iter()
            .map(|item| item.manager.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut observed = Observed::default();
        for (manager, listing) in self.list_all(ctx, &managers)? {
            match listing {
                Ok(items) => observed.items.extend(items),
                Err(reason) => observed.failed.extend(
                    desired
                        .iter()
                        .filter(|item| item.manager == manager)
                        .map(|item| (item.key(), reason.clone())),
                ),
            }
        }

        Ok(observed)
    }

    fn apply(&self, ctx: &ExecContext, item: &Item) -> Result<ApplyStatus> {
        let runtime = self.registry.resolve(&item.manager)?;
        runtime.install(ctx, &item.name)?;
        Ok(ApplyStatus::Installed)
    }

    fn planned(&self, _item: &Item) -> ApplyStatus {
        ApplyStatus::WouldInstall
    }
}

#[cfg(test)]
mod tests;
