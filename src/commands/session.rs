//! Everything one invocation needs, loaded once.

use super::hooks::HookRunner;
use crate::backends::{CommandExecutor, ManagerRegistry};
use crate::config::{self, Config};
use crate::core::context::ExecContext;
use crate::core::identity::PackageSpec;
use crate::dotfiles::{DotfileDomain, IgnoreFilter};
use crate::error::Result;
use crate::packages::PackageDomain;
use crate::state::LockFileStore;
use crate::ui as output;
use crate::utils::paths;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Session {
    pub config: Config,
    pub registry: ManagerRegistry,
    pub store: LockFileStore,
    pub home: PathBuf,
    pub ctx: ExecContext,
    executor: Arc<dyn CommandExecutor>,
}

impl Session {
    /// Load config from `config_dir` and build the manager registry.
    pub fn load(
        config_dir: &Path,
        home: PathBuf,
        executor: Arc<dyn CommandExecutor>,
        ctx: ExecContext,
    ) -> Result<Self> {
        output::verbose(&format!("Using config directory {}", config_dir.display()));
        let config = config::load_config(config_dir)?;
        let registry = ManagerRegistry::new(
            config.managers.clone(),
            executor.clone(),
            config.settings.timeouts(),
        )?;

        Ok(Self {
            store: LockFileStore::in_config_dir(config_dir),
            config,
            registry,
            home,
            ctx,
            executor,
        })
    }

    /// Config and home directories from the environment.
    pub fn from_env(executor: Arc<dyn CommandExecutor>, ctx: ExecContext) -> Result<Self> {
        Self::load(&paths::config_dir()?, paths::home_dir()?, executor, ctx)
    }

    pub fn package_domain(&self) -> PackageDomain<'_> {
        PackageDomain::new(
            &self.store,
            &self.registry,
            self.config.settings.max_parallel_listing,
        )
    }

    pub fn dotfile_domain(&self) -> Result<DotfileDomain> {
        Ok(DotfileDomain::new(
            paths::dotfiles_dir(&self.config.config_dir),
            &self.home,
            IgnoreFilter::new(&self.config.settings.ignore)?,
            self.config.vars.clone(),
        ))
    }

    pub fn hook_runner(&self) -> HookRunner<'_> {
        HookRunner::new(self.executor.as_ref(), self.config.settings.hook_timeout)
    }

    /// `manager:name`, or a bare name with the configured default manager.
    pub fn parse_spec(&self, input: &str) -> Result<PackageSpec> {
        PackageSpec::parse(input, self.config.settings.default_manager.as_deref())
    }
}
