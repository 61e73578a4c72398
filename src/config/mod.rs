//! KDL configuration: settings, template variables, hooks and manager
//! definitions.

mod loader;
mod types;

pub use loader::{load_config, parse_config};
pub use types::{Config, HookSpec, Hooks, Settings};
