use super::scanner::{self, DotfileDecl, IgnoreFilter};
use super::transport;
use crate::core::context::ExecContext;
use crate::core::domain::{DomainAdapter, Observed};
use crate::core::types::{ApplyStatus, Domain, Item, ItemState};
use crate::error::{HomedeclError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SOURCE_KEY: &str = "source";
const TEMPLATE_KEY: &str = "template";

/// Dotfiles under one source directory, deployed into one home directory.
pub struct DotfileDomain {
    dotfiles_dir: PathBuf,
    home: PathBuf,
    ignore: IgnoreFilter,
    vars: BTreeMap<String, String>,
}

impl DotfileDomain {
    pub fn new(
        dotfiles_dir: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        ignore: IgnoreFilter,
        vars: BTreeMap<String, String>,
    ) -> Self {
        Self {
            dotfiles_dir: dotfiles_dir.into(),
            home: home.into(),
            ignore,
            vars,
        }
    }

    pub fn dotfiles_dir(&self) -> &Path {
        &self.dotfiles_dir
    }

    fn to_item(decl: &DotfileDecl) -> Item {
        let item = Item::dotfile(&decl.name, &decl.destination)
            .with_metadata(SOURCE_KEY, decl.source.display().to_string());
        if decl.is_template {
            item.with_metadata(TEMPLATE_KEY, "true")
        } else {
            item
        }
    }

    fn decl_of(item: &Item) -> Result<DotfileDecl> {
        let destination = item.path.clone().ok_or_else(|| {
            HomedeclError::PathError(format!("Dotfile '{}' has no destination", item.name))
        })?;
        let source = item.metadata.get(SOURCE_KEY).ok_or_else(|| {
            HomedeclError::PathError(format!("Dotfile '{}' has no source", item.name))
        })?;

        Ok(DotfileDecl {
            name: item.name.clone(),
            source: PathBuf::from(source),
            destination,
            is_template: item.metadata.get(TEMPLATE_KEY).is_some_and(|v| v == "true"),
        })
    }
}

impl DomainAdapter for DotfileDomain {
    fn domain(&self) -> Domain {
        Domain::Dotfiles
    }

    fn desired(&self) -> Result<Vec<Item>> {
        let decls = scanner::scan(&self.dotfiles_dir, &self.home, &self.ignore)?;
        Ok(decls.iter().map(Self::to_item).collect())
    }

    // Untracked home files are not discovered; only declared destinations are probed.
    fn actual(&self, _ctx: &ExecContext, desired: &[Item]) -> Result<Observed> {
        let items = desired
            .iter()
            .filter(|item| item.path.as_deref().is_some_and(Path::is_file))
            .map(|item| Item::dotfile(&item.name, item.path.clone().unwrap_or_default()))
            .collect();

        Ok(Observed {
            items,
            failed: Vec::new(),
        })
    }

    fn drift(&self, item: &Item) -> Result<bool> {
        transport::has_drifted(&Self::decl_of(item)?, &self.vars)
    }

    fn apply(&self, _ctx: &ExecContext, item: &Item) -> Result<ApplyStatus> {
        let decl = Self::decl_of(item)?;
        let existed = decl.destination.exists();
        transport::deploy(&decl, &self.vars)?;
        Ok(if existed {
            ApplyStatus::Updated
        } else {
            ApplyStatus::Added
        })
    }

    fn planned(&self, item: &Item) -> ApplyStatus {
        match item.state {
            Some(ItemState::Degraded) => ApplyStatus::WouldUpdate,
            _ => ApplyStatus::WouldAdd,
        }
    }
}
