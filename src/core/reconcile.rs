//! Domain-agnostic reconciliation.
//!
//! [`reconcile`] classifies keys by set membership alone. The same engine is
//! lifted to [`Item`]s by [`reconcile_items`] and driven end to end for one
//! adapter by [`reconcile_domain`]; packages and dotfiles share all of it.

use crate::core::context::ExecContext;
use crate::core::domain::DomainAdapter;
use crate::core::types::{Domain, Item, ItemKey, ItemState, ReconcileResult};
use crate::error::Result;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Keys sorted into the four states, plus drift-check failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<K, E> {
    pub managed: Vec<K>,
    pub missing: Vec<K>,
    pub untracked: Vec<K>,
    pub degraded: Vec<K>,
    pub errors: Vec<(K, E)>,
}

impl<K, E> Default for Classification<K, E> {
    fn default() -> Self {
        Self {
            managed: Vec::new(),
            missing: Vec::new(),
            untracked: Vec::new(),
            degraded: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Classify `desired` against `actual`.
///
/// - desired ∩ actual: `degraded` when `drift` reports a mismatch, else `managed`;
///   a drift error moves the key to `errors` instead
/// - desired \ actual: `missing`
/// - actual \ desired: `untracked`
///
/// Duplicates collapse to their first occurrence and every output list keeps
/// discovery order. Membership never depends on input order.
pub fn reconcile<K, E, F>(desired: &[K], actual: &[K], mut drift: F) -> Classification<K, E>
where
    K: Clone + Eq + Hash,
    F: FnMut(&K) -> std::result::Result<bool, E>,
{
    let actual_set: HashSet<&K> = actual.iter().collect();
    let desired_set: HashSet<&K> = desired.iter().collect();
    let mut out = Classification::default();

    let mut seen = HashSet::new();
    for key in desired {
        if !seen.insert(key) {
            continue;
        }
        if !actual_set.contains(key) {
            out.missing.push(key.clone());
            continue;
        }
        match drift(key) {
            Ok(true) => out.degraded.push(key.clone()),
            Ok(false) => out.managed.push(key.clone()),
            Err(e) => out.errors.push((key.clone(), e)),
        }
    }

    let mut seen = HashSet::new();
    for key in actual {
        if seen.insert(key) && !desired_set.contains(key) {
            out.untracked.push(key.clone());
        }
    }

    out
}

/// Reconcile declared items against observed ones.
///
/// Observed metadata is merged into the matching declared item without
/// overwriting declared keys, and every item is stamped with its state.
/// `drift` sees the merged item.
pub fn reconcile_items<F>(
    domain: Domain,
    desired: Vec<Item>,
    actual: Vec<Item>,
    mut drift: F,
) -> ReconcileResult
where
    F: FnMut(&Item) -> Result<bool>,
{
    let mut actual_by_key: HashMap<ItemKey, Item> = HashMap::new();
    let mut actual_keys = Vec::with_capacity(actual.len());
    for item in actual {
        let key = item.key();
        if !actual_by_key.contains_key(&key) {
            actual_keys.push(key.clone());
            actual_by_key.insert(key, item);
        }
    }

    let mut desired_by_key: HashMap<ItemKey, Item> = HashMap::new();
    let mut desired_keys = Vec::with_capacity(desired.len());
    for mut item in desired {
        let key = item.key();
        if desired_by_key.contains_key(&key) {
            continue;
        }
        if let Some(observed) = actual_by_key.get(&key) {
            item.absorb_metadata(&observed.metadata);
        }
        desired_keys.push(key.clone());
        desired_by_key.insert(key, item);
    }

    let classified = reconcile(&desired_keys, &actual_keys, |key| match desired_by_key.get(key) {
        Some(item) => drift(item).map_err(|e| e.to_string()),
        None => Ok(false),
    });

    let mut result = ReconcileResult::new(domain);
    for key in &classified.managed {
        result
            .managed
            .extend(take_stamped(&mut desired_by_key, key, Some(ItemState::Managed)));
    }
    for key in &classified.missing {
        result
            .missing
            .extend(take_stamped(&mut desired_by_key, key, Some(ItemState::Missing)));
    }
    for key in &classified.degraded {
        result
            .degraded
            .extend(take_stamped(&mut desired_by_key, key, Some(ItemState::Degraded)));
    }
    for key in &classified.untracked {
        result
            .untracked
            .extend(take_stamped(&mut actual_by_key, key, Some(ItemState::Untracked)));
    }
    for (key, message) in classified.errors {
        if let Some(mut item) = take_stamped(&mut desired_by_key, &key, None) {
            item.error = Some(message);
            result.errors.push(item);
        }
    }

    result
}

fn take_stamped(
    items: &mut HashMap<ItemKey, Item>,
    key: &ItemKey,
    state: Option<ItemState>,
) -> Option<Item> {
    items.remove(key).map(|mut item| {
        item.state = state;
        item
    })
}

/// Run one adapter through the engine.
///
/// Declared items the adapter could not observe (their manager is missing or
/// its listing failed) go straight to `errors`; everything else is classified.
pub fn reconcile_domain(adapter: &dyn DomainAdapter, ctx: &ExecContext) -> Result<ReconcileResult> {
    let desired = adapter.desired()?;
    let observed = adapter.actual(ctx, &desired)?;

    let failed: HashMap<ItemKey, String> = observed.failed.into_iter().collect();
    let (unobservable, observable): (Vec<Item>, Vec<Item>) = desired
        .into_iter()
        .partition(|item| failed.contains_key(&item.key()));

    let mut result = reconcile_items(adapter.domain(), observable, observed.items, |item| {
        adapter.drift(item)
    });

    let mut seen = HashSet::new();
    for mut item in unobservable {
        let key = item.key();
        if !seen.insert(key.clone()) {
            continue;
        }
        item.error = failed.get(&key).cloned();
        result.errors.push(item);
    }

    Ok(result)
}
