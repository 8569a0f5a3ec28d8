//! Learned value table

use std::collections::HashMap;

use gauntlet_common::{ActionValues, DifficultyAction, StateKey};

/// Mapping from state to per-action estimates
///
/// Unseen states read as all-zero and are recorded on first lookup.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    table: HashMap<StateKey, ActionValues>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted entries; later duplicates win
    pub fn from_entries(entries: impl IntoIterator<Item = (StateKey, ActionValues)>) -> Self {
        Self {
            table: entries.into_iter().collect(),
        }
    }

    /// Estimates for `state`, inserting the zero default if unseen
    pub fn values(&mut self, state: StateKey) -> ActionValues {
        *self.table.entry(state).or_default()
    }

    /// Estimate for one action, inserting the zero default if unseen
    pub fn lookup(&mut self, state: StateKey, action: DifficultyAction) -> f64 {
        self.values(state).get(action)
    }

    /// Largest estimate in `state`, inserting the zero default if unseen
    pub fn max_value(&mut self, state: StateKey) -> f64 {
        self.values(state).max_value()
    }

    pub fn set(&mut self, state: StateKey, action: DifficultyAction, value: f64) {
        self.table.entry(state).or_default().set(action, value);
    }

    /// Read without recording a default
    pub fn peek(&self, state: &StateKey) -> Option<&ActionValues> {
        self.table.get(state)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries ordered by key, for deterministic serialization
    pub fn sorted_entries(&self) -> Vec<(StateKey, ActionValues)> {
        let mut entries: Vec<_> = self.table.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
