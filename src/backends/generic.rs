//! Config-driven manager runtime.
//!
//! [`GenericManager`] implements the whole [`PackageManager`] contract from a
//! single [`ManagerDescriptor`]; no manager gets bespoke code. Commands go
//! through the injected [`CommandExecutor`].

mod runtime;

use crate::backends::descriptor::{ManagerDescriptor, PACKAGE_PLACEHOLDER, QUERY_PLACEHOLDER, UpgradeTarget};
use crate::backends::error_matcher::{self, ErrorKind, Operation};
use crate::backends::executor::CommandExecutor;
use crate::backends::{parsers, pipeline};
use crate::constants::{DEFAULT_LIST_TIMEOUT_SECS, DEFAULT_OPERATION_TIMEOUT_SECS};
use crate::core::context::ExecContext;
use crate::core::types::Item;
use crate::error::{ManagerError, ManagerResult};
use crate::packages::traits::{
    OperationOutcome, PackageInfo, PackageManager, SearchResult, UpgradeResult,
};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Per-class command timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Version probe, list, search and info
    pub discovery: Duration,
    /// Install, uninstall and upgrade
    pub operation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            discovery: Duration::from_secs(DEFAULT_LIST_TIMEOUT_SECS),
            operation: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

pub struct GenericManager {
    descriptor: Arc<ManagerDescriptor>,
    executor: Arc<dyn CommandExecutor>,
    timeouts: Timeouts,
    available: OnceLock<bool>,
}

impl GenericManager {
    pub fn new(
        descriptor: Arc<ManagerDescriptor>,
        executor: Arc<dyn CommandExecutor>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            descriptor,
            executor,
            timeouts,
            available: OnceLock::new(),
        }
    }

    pub fn descriptor(&self) -> &ManagerDescriptor {
        &self.descriptor
    }
}

impl PackageManager for GenericManager {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn is_available(&self, ctx: &ExecContext) -> ManagerResult<bool> {
        if let Some(available) = self.available.get() {
            return Ok(*available);
        }
        let available = self.probe(ctx)?;
        let _ = self.available.set(available);
        Ok(available)
    }

    fn list_installed(&self, ctx: &ExecContext) -> ManagerResult<Vec<Item>> {
        self.require_available(ctx)?;

        let list = &self.descriptor.list;
        let (command, output) = self.run(ctx, list.template.argv().to_vec(), self.timeouts.discovery)?;

        let fatal = match output.exit_code {
            Some(0) => false,
            Some(code) => list.fatal_exit_codes.contains(&code),
            None => true,
        };
        if fatal {
            return Err(ManagerError::Execution {
                manager: self.descriptor.name.clone(),
                command,
                reason: output.summary(),
            });
        }

        let entries = parsers::parse(&output.stdout, &list.format).map_err(|e| self.parse_error(e))?;
        Ok(pipeline::apply_all(&entries, &self.descriptor))
    }

    fn install(&self, ctx: &ExecContext, name: &str) -> ManagerResult<OperationOutcome> {
        self.validate_name(name, "install")?;
        self.require_available(ctx)?;
        self.run_mutating(ctx, &self.descriptor.install, Operation::Install, name)
    }

    fn uninstall(&self, ctx: &ExecContext, name: &str) -> ManagerResult<OperationOutcome> {
        self.validate_name(name, "uninstall")?;
        self.require_available(ctx)?;
        self.run_mutating(ctx, &self.descriptor.uninstall, Operation::Uninstall, name)
    }

    fn is_installed(&self, ctx: &ExecContext, name: &str) -> ManagerResult<bool> {
        Ok(self.find_installed(ctx, name)?.is_some())
    }

    fn installed_version(&self, ctx: &ExecContext, name: &str) -> ManagerResult<Option<String>> {
        let Some(item) = self.find_installed(ctx, name)? else {
            return Ok(None);
        };

        if let Some(version) = item.metadata.get("version") {
            return Ok(Some(version.clone()));
        }

        if self.descriptor.supports_info() {
            let info = self.info(ctx, name)?;
            return Ok(info.version().map(str::to_string));
        }

        Ok(None)
    }

    fn search(&self, ctx: &ExecContext, query: &str) -> ManagerResult<Vec<SearchResult>> {
        let Some(search) = &self.descriptor.search else {
            return Err(self.unsupported("search"));
        };
        self.validate_query(query)?;
        self.require_available(ctx)?;

        let argv = search.template.render(QUERY_PLACEHOLDER, query.trim());
        let (command, output) = self.run(ctx, argv, self.timeouts.discovery)?;

        if !output.is_success() {
            return match error_matcher::classify(&output.combined(), Operation::Query) {
                ErrorKind::NotFound => Ok(Vec::new()),
                kind => Err(self.domain_error(query, kind, &command, &output.summary())),
            };
        }

        let entries = parsers::parse(&output.stdout, &search.format).map_err(|e| self.parse_error(e))?;
        Ok(pipeline::apply_all(&entries, &self.descriptor)
            .into_iter()
            .map(|mut item| SearchResult {
                version: item.metadata.remove("version"),
                description: item.metadata.remove("description"),
                manager: item.manager,
                name: item.name,
            })
            .collect())
    }

    fn info(&self, ctx: &ExecContext, name: &str) -> ManagerResult<PackageInfo> {
        let Some(info) = &self.descriptor.info else {
            return Err(self.unsupported("info"));
        };
        self.validate_name(name, "info")?;
        self.require_available(ctx)?;

        let argv = info.render(PACKAGE_PLACEHOLDER, name);
        let (command, output) = self.run(ctx, argv, self.timeouts.discovery)?;

        if !output.is_success() {
            let kind = error_matcher::classify(&output.combined(), Operation::Query);
            return Err(self.domain_error(name, kind, &command, &output.summary()));
        }

        let installed = self.is_installed(ctx, name)?;
        Ok(PackageInfo {
            name: name.to_string(),
            manager: self.descriptor.name.clone(),
            installed,
            fields: runtime::parse_key_values(&output.stdout),
        })
    }

    fn upgrade(&self, ctx: &ExecContext, names: &[String]) -> ManagerResult<Vec<UpgradeResult>> {
        if names.is_empty() {
            let Some(upgrade_all) = &self.descriptor.upgrade_all else {
                return Err(self.unsupported("upgrade-all"));
            };
            self.require_available(ctx)?;
            let outcome = self.run_mutating(ctx, upgrade_all, Operation::Upgrade, "");
            return Ok(vec![UpgradeResult {
                name: "*".to_string(),
                outcome,
            }]);
        }

        let Some(upgrade) = &self.descriptor.upgrade else {
            return Err(self.unsupported("upgrade"));
        };
        self.require_available(ctx)?;

        let full_names = match self.descriptor.upgrade_target {
            UpgradeTarget::FullNamePreferred => self.full_names(ctx),
            UpgradeTarget::Name => HashMap::new(),
        };

        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let target = full_names.get(name).map(String::as_str).unwrap_or(name);
            let outcome = self
                .validate_name(target, "upgrade")
                .and_then(|_| self.run_mutating(ctx, upgrade, Operation::Upgrade, target));
            results.push(UpgradeResult {
                name: name.clone(),
                outcome,
            });
        }

        Ok(results)
    }

    fn supports_search(&self) -> bool {
        self.descriptor.supports_search()
    }
}
