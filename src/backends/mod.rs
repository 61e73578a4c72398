//! # Config-driven package managers
//!
//! Every package manager is described by data, never by code. A
//! [`ManagerDescriptor`](descriptor::ManagerDescriptor) declares the commands
//! and how to read their output; [`GenericManager`](generic::GenericManager)
//! turns one descriptor into the full `PackageManager` contract.
//!
//! ## Module Structure
//!
//! - [`descriptor`] - raw mergeable specs and their validated form
//! - [`user_parser`] - `manager "name" { ... }` KDL nodes to specs
//! - [`registry`] - built-in descriptors merged with user ones, resolved by name
//! - [`executor`] - the only place that spawns processes
//! - [`parsers`] - `lines`, `parseable`, `json-array`, `json-map` output strategies
//! - [`pipeline`] - name transforms and metadata extraction
//! - [`error_matcher`] - shared vocabulary for classifying failures
//! - [`generic`] - the runtime
//!
//! ## User-Defined Managers
//!
//! Users add or override managers in `managers.kdl` or the main config:
//!
//! ```kdl
//! manager "mise" {
//!     binary "mise"
//!     list "mise ls --installed --json" {
//!         parse "json-map"
//!     }
//!     install "mise use -g {package}"
//!     uninstall "mise uninstall {package}"
//! }
//! ```
//!
//! A definition for a built-in name only overrides the fields it sets.

pub mod descriptor;
pub mod error_matcher;
pub mod executor;
pub mod generic;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod user_parser;

pub use executor::{CommandExecutor, ScriptedExecutor, SystemExecutor};
pub use generic::{GenericManager, Timeouts};
pub use registry::ManagerRegistry;
