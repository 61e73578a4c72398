pub mod context;
pub mod domain;
pub mod identity;
pub mod reconcile;
pub mod types;
