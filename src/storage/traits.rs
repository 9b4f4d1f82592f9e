//! Storage trait definitions.

use std::collections::BTreeMap;

use crate::domain::{FoodItem, Occasion};
use crate::error::Result;
use crate::id::ItemId;
use crate::scheduler::SchedulerState;

/// Key-value store for per-item scheduler state.
///
/// Implementations must make [`StateStore::commit_occasion`] all-or-nothing: after a
/// crash either every accumulator of the occasion is stored or none is.
pub trait StateStore: Send + Sync {
    /// Get the state of one item.
    fn get(&self, id: &ItemId) -> Result<Option<SchedulerState>>;

    /// Insert or replace the state of one item.
    fn put(&self, id: &ItemId, state: SchedulerState) -> Result<()>;

    /// Remove an item's state. Returns false if there was none.
    fn remove(&self, id: &ItemId) -> Result<bool>;

    /// All stored states.
    fn entries(&self) -> Result<BTreeMap<ItemId, SchedulerState>>;

    /// The most recently committed shopping occasion.
    fn last_occasion(&self) -> Result<Option<Occasion>>;

    /// Store the updated states of a shopping occasion and its marker in one write.
    fn commit_occasion(&self, occasion: Occasion, batch: &[(ItemId, SchedulerState)]) -> Result<()>;

    /// Drop every state and the occasion marker. Returns the number of states removed.
    fn clear(&self) -> Result<usize>;
}

/// CRUD store for food item configuration records.
pub trait ItemStore: Send + Sync {
    /// Create a new item. Fails if the ID is taken.
    fn create(&self, item: &FoodItem) -> Result<()>;

    /// Get an item by ID.
    fn get(&self, id: &ItemId) -> Result<Option<FoodItem>>;

    /// Replace an existing item.
    fn update(&self, item: &FoodItem) -> Result<()>;

    /// Delete an item by ID.
    fn delete(&self, id: &ItemId) -> Result<()>;

    /// All items in creation order.
    fn list(&self) -> Result<Vec<FoodItem>>;

    /// Delete every item. Returns the number of items removed.
    fn clear(&self) -> Result<usize>;
}
