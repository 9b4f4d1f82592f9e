//! In-memory image of the scheduler state document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::Occasion;
use crate::error::{GrocerError, Result};
use crate::id::ItemId;
use crate::scheduler::SchedulerState;

/// Everything a [`StateStore`](super::StateStore) persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub last_occasion: Option<Occasion>,
    pub items: BTreeMap<ItemId, SchedulerState>,
}

impl StateSnapshot {
    /// Reject snapshots holding states no scheduler transition could have produced.
    pub fn validate(&self) -> Result<()> {
        for (id, state) in &self.items {
            state
                .validate()
                .map_err(|e| GrocerError::InvalidState(format!("item {}: {}", id, e)))?;
        }
        Ok(())
    }

    /// Reset to an empty snapshot, returning how many item states were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        *self = Self::default();
        removed
    }

    pub fn commit(&mut self, occasion: Occasion, batch: &[(ItemId, SchedulerState)]) {
        for (id, state) in batch {
            self.items.insert(id.clone(), *state);
        }
        self.last_occasion = Some(occasion);
    }
}
