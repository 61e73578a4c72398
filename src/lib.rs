pub mod backends;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod dotfiles;
pub mod error;
pub mod packages;
pub mod project_identity;
pub mod state;
pub mod ui;
pub mod utils;

use crate::backends::SystemExecutor;
use clap::Parser;
use crate::core::context::ExecContext;
use crate::error::HomedeclError;
use std::process::exit;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Exit status after Ctrl-C, as shells report SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Run homedecl CLI entrypoint.
pub fn run_cli() {
    // 0. Initialize color settings (must be first)
    ui::init_colors();

    // 1. Signal handling: the in-flight command is killed, finished items keep their outcome
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        flag.store(true, Ordering::SeqCst);
        ui::warning("Operation cancelled by user.");
    }) {
        ui::warning(&format!("Could not install Ctrl-C handler: {}", e));
    }

    // 2. Parse & Run
    let args = cli::args::Cli::parse();
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    let ctx = ExecContext::with_flag(interrupted);
    if let Err(e) = cli::dispatcher::dispatch(&args, Arc::new(SystemExecutor), ctx) {
        ui::error(&format!("{}", e));
        match e {
            HomedeclError::Interrupted => exit(INTERRUPTED_EXIT_CODE),
            _ => exit(1),
        }
    }
}
