//! Domain types for Grocer
//!
//! This module contains the records the scheduler core is fed with:
//! - FoodItem: a configured item and its desired purchase frequency
//! - GroceryDays: the weekdays the user goes shopping on
//! - GroceryList / Occasion: the outcome of one shopping occasion

pub mod grocery_days;
pub mod item;
pub mod list;

pub use grocery_days::GroceryDays;
pub use item::FoodItem;
pub use list::{GroceryList, ListEntry, Occasion};
