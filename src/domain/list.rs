//! Grocery list produced for one shopping occasion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::item::FoodItem;
use crate::id::ItemId;

/// Marker persisted together with the accumulators of a shopping occasion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occasion {
    pub date: NaiveDate,
    /// Items included on that date, with the units owed for each.
    pub included: Vec<(ItemId, u32)>,
}

/// One line on a grocery list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub item: FoodItem,
    /// How many purchases are due. One under normal configurations.
    pub owed: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroceryList {
    pub date: NaiveDate,
    pub entries: Vec<ListEntry>,
    /// True when the list was already committed earlier for this date and is only
    /// being shown again.
    pub replayed: bool,
}

impl GroceryList {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.item.label.as_str()).collect()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.iter().any(|e| &e.item.id == id)
    }
}
