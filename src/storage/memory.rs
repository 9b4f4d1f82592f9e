//! Volatile state store, for tests and embedders that persist elsewhere.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::snapshot::StateSnapshot;
use super::traits::StateStore;
use crate::domain::Occasion;
use crate::error::{GrocerError, Result};
use crate::id::ItemId;
use crate::scheduler::SchedulerState;

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: RwLock<StateSnapshot>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing snapshot.
    pub fn from_snapshot(snapshot: StateSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self {
            inner: RwLock::new(snapshot),
        })
    }

    pub fn snapshot(&self) -> Result<StateSnapshot> {
        Ok(self.inner.read().map_err(|e| GrocerError::Storage(e.to_string()))?.clone())
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, id: &ItemId) -> Result<Option<SchedulerState>> {
        let inner = self.inner.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(inner.items.get(id).copied())
    }

    fn put(&self, id: &ItemId, state: SchedulerState) -> Result<()> {
        state.validate()?;
        let mut inner = self.inner.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        inner.items.insert(id.clone(), state);
        Ok(())
    }

    fn remove(&self, id: &ItemId) -> Result<bool> {
        let mut inner = self.inner.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(inner.items.remove(id).is_some())
    }

    fn entries(&self) -> Result<BTreeMap<ItemId, SchedulerState>> {
        let inner = self.inner.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(inner.items.clone())
    }

    fn last_occasion(&self) -> Result<Option<Occasion>> {
        let inner = self.inner.read().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(inner.last_occasion.clone())
    }

    fn commit_occasion(&self, occasion: Occasion, batch: &[(ItemId, SchedulerState)]) -> Result<()> {
        for (_, state) in batch {
            state.validate()?;
        }
        let mut inner = self.inner.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        inner.commit(occasion, batch);
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        let mut inner = self.inner.write().map_err(|e| GrocerError::Storage(e.to_string()))?;
        Ok(inner.clear())
    }
}
