//! Grocery list generation and item lifecycle hooks.
//!
//! The planner is the only component that touches scheduler state. It is handed a
//! [`StateStore`] at construction and runs every read-modify-write of an occasion
//! through it, so callers must not share one store between two planners running
//! concurrently.

use chrono::NaiveDate;

use crate::domain::{FoodItem, GroceryDays, GroceryList, ListEntry, Occasion};
use crate::error::{GrocerError, Result};
use crate::id::ItemId;
use crate::scheduler::{Decision, SchedulerState, forecast};
use crate::storage::{ItemStore, StateStore};

pub struct Planner<S: StateStore> {
    store: S,
}

impl<S: StateStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store the initial state of a newly configured item.
    pub fn item_created(&self, item: &FoodItem, days: &GroceryDays) -> Result<SchedulerState> {
        let state = SchedulerState::initial(item.quotient(days.per_week())?);
        self.store.put(&item.id, state)?;
        log::info!(
            "Item {} ({}) created with quotient {}",
            item.id,
            item.label,
            state.quotient
        );
        Ok(state)
    }

    /// Reset an item's state if its purchase rate changed.
    ///
    /// Edits to label, brand or amount keep the accumulated credit.
    pub fn item_edited(&self, before: &FoodItem, after: &FoodItem, days: &GroceryDays) -> Result<SchedulerState> {
        if before.id != after.id {
            return Err(GrocerError::InvalidState(format!(
                "edit changes item identity from {} to {}",
                before.id, after.id
            )));
        }

        if before.rate_changed(after) {
            let state = SchedulerState::initial(after.quotient(days.per_week())?);
            self.store.put(&after.id, state)?;
            log::info!(
                "Item {} rate changed to {}, state reset to {}",
                after.id,
                after.describe_frequency(),
                state.accumulator
            );
            return Ok(state);
        }

        match self.store.get(&after.id)? {
            Some(state) => Ok(state),
            None => self.item_created(after, days),
        }
    }

    /// Drop an item's state. Returns false if it had none.
    pub fn item_deleted(&self, id: &ItemId) -> Result<bool> {
        let removed = self.store.remove(id)?;
        log::info!("Item {} deleted (state removed: {})", id, removed);
        Ok(removed)
    }

    /// Configure a new item in both stores.
    ///
    /// The state is written first so a rate the grocery days cannot support leaves no
    /// item record behind. If the record cannot be stored the state is taken back out.
    pub fn add_item(&self, items: &impl ItemStore, item: &FoodItem, days: &GroceryDays) -> Result<SchedulerState> {
        let state = self.item_created(item, days)?;
        if let Err(e) = items.create(item) {
            log::warn!("Storing item {} failed, rolling back its state: {}", item.id, e);
            self.store.remove(&item.id)?;
            return Err(e);
        }
        Ok(state)
    }

    /// Remove an item from both stores.
    ///
    /// The state goes first: an item record left without state is re-initialized on
    /// the next occasion, a state left without a record would never be cleaned up.
    pub fn remove_item(&self, items: &impl ItemStore, id: &ItemId) -> Result<FoodItem> {
        let item = items.get(id)?.ok_or_else(|| GrocerError::ItemNotFound(id.to_string()))?;
        self.item_deleted(id)?;
        items.delete(id)?;
        Ok(item)
    }

    /// Wipe every item and all scheduler state. Returns the number of items removed.
    pub fn clear(&self, items: &impl ItemStore) -> Result<usize> {
        let states = self.store.clear()?;
        let removed = items.clear()?;
        log::info!("Cleared {} item(s) and {} state(s)", removed, states);
        Ok(removed)
    }

    /// Drop states whose item no longer exists. Returns the IDs removed.
    pub fn prune(&self, items: &[FoodItem]) -> Result<Vec<ItemId>> {
        let mut pruned = Vec::new();
        for id in self.store.entries()?.into_keys() {
            if !items.iter().any(|i| i.id == id) && self.store.remove(&id)? {
                log::info!("Pruned orphaned state of item {}", id);
                pruned.push(id);
            }
        }
        Ok(pruned)
    }

    /// The state the next occasion will start from: the stored one with its quotient
    /// synced to the current grocery days, or a fresh one if none is stored.
    pub fn current_state(&self, item: &FoodItem, days: &GroceryDays) -> Result<SchedulerState> {
        let quotient = item.quotient(days.per_week())?;
        Ok(match self.store.get(&item.id)? {
            Some(state) if state.quotient == quotient => state,
            Some(state) => {
                log::info!(
                    "Item {} quotient changed from {} to {}",
                    item.id,
                    state.quotient,
                    quotient
                );
                state.with_quotient(quotient)
            }
            None => {
                log::warn!("Item {} has no scheduler state, initializing", item.id);
                SchedulerState::initial(quotient)
            }
        })
    }

    /// Produce the grocery list for the shopping occasion on `date`.
    ///
    /// Every item's decision is computed before anything is written, and all updated
    /// accumulators are committed in one batch together with the occasion marker.
    /// Asking again for an already committed date returns that list unchanged.
    pub fn generate_list(
        &self,
        date: NaiveDate,
        items: &[FoodItem],
        days: &GroceryDays,
        force: bool,
    ) -> Result<GroceryList> {
        if let Some(last) = self.store.last_occasion()? {
            if last.date == date {
                log::info!("Occasion {} already committed, replaying", date);
                return Ok(replay(&last, items));
            }
            if last.date > date {
                return Err(GrocerError::InvalidState(format!(
                    "occasion {} precedes last committed occasion {}",
                    date, last.date
                )));
            }
        }

        if !force && !days.is_grocery_day(date) {
            return Err(GrocerError::NotAGroceryDay(date.to_string()));
        }

        let mut batch = Vec::with_capacity(items.len());
        let mut entries = Vec::new();
        let mut included = Vec::new();

        for item in items {
            let state = self.current_state(item, days)?;
            let (decision, next) = state.advance()?;
            if decision.owed > 1 {
                log::warn!("Item {} owes {} purchases on {}", item.id, decision.owed, date);
            }
            batch.push((item.id.clone(), next));
            if decision.include {
                included.push((item.id.clone(), decision.owed));
                entries.push(ListEntry {
                    item: item.clone(),
                    owed: decision.owed,
                });
            }
        }

        self.store.commit_occasion(
            Occasion {
                date,
                included,
            },
            &batch,
        )?;

        log::info!("Grocery list for {}: {} of {} item(s)", date, entries.len(), items.len());

        Ok(GroceryList {
            date,
            entries,
            replayed: false,
        })
    }

    /// Forecast the next `occasions` decisions for one item without persisting.
    pub fn preview(&self, item: &FoodItem, days: &GroceryDays, occasions: usize) -> Result<Vec<Decision>> {
        forecast(self.current_state(item, days)?, occasions)
    }
}

fn replay(occasion: &Occasion, items: &[FoodItem]) -> GroceryList {
    let entries = occasion
        .included
        .iter()
        .filter_map(|(id, owed)| {
            items.iter().find(|i| &i.id == id).map(|item| ListEntry {
                item: item.clone(),
                owed: *owed,
            })
        })
        .collect();

    GroceryList {
        date: occasion.date,
        entries,
        replayed: true,
    }
}
