//! Keyed reconciliation: align a set of known keys with an incoming list
//!
//! Used by the map view to decide which markers to create, update in place,
//! or remove when a new fleet snapshot arrives.

use std::collections::HashSet;
use std::hash::Hash;

/// Outcome of diffing known keys against incoming keys.
///
/// The three lists are pairwise disjoint and contain no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan<K> {
    /// Incoming keys not known yet (incoming order)
    pub to_create: Vec<K>,
    /// Keys both known and incoming (incoming order)
    pub to_update: Vec<K>,
    /// Known keys absent from the incoming list
    pub to_remove: Vec<K>,
}

impl<K> ReconcilePlan<K> {
    /// True when applying the plan changes nothing but positions/icons
    pub fn is_structurally_unchanged(&self) -> bool {
        self.to_create.is_empty() && self.to_remove.is_empty()
    }
}

impl<K> Default for ReconcilePlan<K> {
    fn default() -> Self {
        Self {
            to_create: Vec::new(),
            to_update: Vec::new(),
            to_remove: Vec::new(),
        }
    }
}

/// Diff `incoming` against `known`.
///
/// Duplicate incoming keys are reported once, at their first position.
pub fn diff_keys<K, I, J>(known: I, incoming: J) -> ReconcilePlan<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
    J: IntoIterator<Item = K>,
{
    let known: Vec<K> = known.into_iter().collect();
    let known_set: HashSet<&K> = known.iter().collect();

    let mut plan = ReconcilePlan::default();
    let mut seen: HashSet<K> = HashSet::new();

    for key in incoming {
        if !seen.insert(key.clone()) {
            continue;
        }
        if known_set.contains(&key) {
            plan.to_update.push(key);
        } else {
            plan.to_create.push(key);
        }
    }

    plan.to_remove = known
        .iter()
        .filter(|key| !seen.contains(*key))
        .cloned()
        .collect();

    plan
}
