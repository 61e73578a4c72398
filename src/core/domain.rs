use crate::core::context::ExecContext;
use crate::core::types::{ApplyStatus, Domain, Item, ItemKey};
use crate::error::Result;

/// What an adapter could see of the live system.
#[derive(Debug, Clone, Default)]
pub struct Observed {
    pub items: Vec<Item>,
    /// Declared items whose presence could not be determined, with the reason
    pub failed: Vec<(ItemKey, String)>,
}

/// Supplies desired and actual entities of one domain and applies single items.
///
/// The reconciliation engine and the apply loop only ever talk to this trait.
pub trait DomainAdapter: Send + Sync {
    fn domain(&self) -> Domain;

    fn desired(&self) -> Result<Vec<Item>>;

    fn actual(&self, ctx: &ExecContext, desired: &[Item]) -> Result<Observed>;

    /// `true` when a present item differs from its declaration.
    fn drift(&self, _item: &Item) -> Result<bool> {
        Ok(false)
    }

    /// Bring one missing or drifted item into conformance.
    fn apply(&self, ctx: &ExecContext, item: &Item) -> Result<ApplyStatus>;

    /// Status `apply` would report, without side effects.
    fn planned(&self, item: &Item) -> ApplyStatus;
}
