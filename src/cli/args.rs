use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "homedecl",
    about = "Declarative packages and dotfiles",
    long_about = "Declare packages across brew, cargo, npm, pipx and custom managers, plus your dotfiles, then converge the machine with one apply",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output (echo executed commands)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Configuration directory (default: $HOMEDECL_CONFIG_DIR or the platform config dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,
}

/// Domain selection shared by `status` and `apply`. Neither flag means both.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ScopeArgs {
    /// Only packages
    #[arg(long)]
    pub packages: bool,

    /// Only dotfiles
    #[arg(long)]
    pub dotfiles: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show managed, missing, drifted and untracked items
    Status {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Install missing packages and deploy missing or drifted dotfiles
    Apply {
        /// Preview changes without executing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// List known package managers and their availability
    Managers {
        #[arg(long)]
        json: bool,
    },

    /// Search package repositories
    Search {
        query: String,

        /// Managers to search (repeatable; default: every searchable manager)
        #[arg(short = 'm', long = "manager", value_name = "NAME")]
        managers: Vec<String>,

        /// Maximum results per manager
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show details of one package
    Info {
        /// manager:name
        package: String,

        #[arg(long)]
        json: bool,
    },

    /// Upgrade packages (default: everything declared)
    Upgrade {
        /// manager:name
        packages: Vec<String>,
    },

    /// Declare packages
    Add {
        /// manager:name, or a bare name with settings.default-manager
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Remove packages from the declaration
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Also uninstall the packages from the system
        #[arg(long)]
        uninstall: bool,

        /// Preview changes without executing
        #[arg(long)]
        dry_run: bool,
    },
}
