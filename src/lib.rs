//! Grocer - recurring grocery lists with fractional per-item frequencies
//!
//! Each food item is configured with a purchase rate ("twice every 3 weeks"). On
//! every shopping day Grocer decides, per item, whether it goes on the list, so
//! that over many shopping days each item appears at its configured rate.
//!
//! - [`quotient`] turns a rate into a per-shopping-day inclusion quotient
//! - [`scheduler`] is the pure deficit counter deciding inclusion
//! - [`planner`] runs a shopping occasion against an injected [`storage::StateStore`]

pub mod domain;
pub mod error;
pub mod id;
pub mod planner;
pub mod quotient;
pub mod scheduler;
pub mod storage;

pub use error::{GrocerError, Result};
pub use planner::Planner;
pub use quotient::{FrequencyQuotient, compute_quotient};
pub use scheduler::{Decision, SchedulerState, schedule};
