//! Command dispatcher
//!
//! Routes CLI commands to their handlers.

use crate::backends::CommandExecutor;
use crate::cli::args::{Cli, Command, ScopeArgs};
use crate::commands::{self, Session};
use crate::commands::apply::{ApplyOptions, DomainScope};
use crate::core::context::ExecContext;
use crate::error::Result;
use crate::utils::paths;
use std::sync::Arc;

impl From<ScopeArgs> for DomainScope {
    fn from(args: ScopeArgs) -> Self {
        Self {
            packages: args.packages,
            dotfiles: args.dotfiles,
        }
    }
}

/// Load the session and run the parsed command.
pub fn dispatch(args: &Cli, executor: Arc<dyn CommandExecutor>, ctx: ExecContext) -> Result<()> {
    let session = match &args.global.config_dir {
        Some(dir) => Session::load(&paths::expand_home(dir)?, paths::home_dir()?, executor, ctx)?,
        None => Session::from_env(executor, ctx)?,
    };

    match &args.command {
        Command::Status { scope, json } => commands::status::run(&session, (*scope).into(), *json),

        Command::Apply {
            dry_run,
            scope,
            json,
        } => commands::apply::run(
            &session,
            ApplyOptions {
                dry_run: *dry_run,
                scope: (*scope).into(),
            },
            *json,
        ),

        Command::Managers { json } => commands::managers::run(&session, *json),

        Command::Search {
            query,
            managers,
            limit,
            json,
        } => commands::search::run(
            &session,
            &commands::search::SearchOptions {
                query: query.clone(),
                managers: managers.clone(),
                limit: *limit,
                json: *json,
            },
        ),

        Command::Info { package, json } => commands::info::run(&session, package, *json),

        Command::Upgrade { packages } => commands::upgrade::run(&session, packages),

        Command::Add { packages } => commands::add::add(&session, packages),

        Command::Remove {
            packages,
            uninstall,
            dry_run,
        } => commands::add::remove(
            &session,
            packages,
            commands::add::RemoveOptions {
                uninstall: *uninstall,
                dry_run: *dry_run,
            },
        ),
    }
}
