//! # Packages
//!
//! The [`PackageManager`] trait is the contract every manager runtime fulfils;
//! in practice that is always the config-driven
//! [`GenericManager`](crate::backends::GenericManager). The packages
//! [`domain`] adapter uses it to observe installed packages and to install
//! missing ones.

pub mod domain;
pub mod traits;

pub use domain::PackageDomain;
pub use traits::{OperationOutcome, PackageInfo, PackageManager, SearchResult, UpgradeResult};
