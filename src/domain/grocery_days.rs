//! The set of weekdays the user shops on.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GrocerError, Result};

/// Grocery days, deduplicated and ordered Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct GroceryDays(Vec<Weekday>);

impl GroceryDays {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        Self(days)
    }

    /// Parse weekday names such as "mon", "Thu" or "saturday".
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut days = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            let day = name
                .parse::<Weekday>()
                .map_err(|_| GrocerError::InvalidConfiguration(format!("unknown weekday: {}", name)))?;
            days.push(day);
        }
        Ok(Self::new(days))
    }

    /// Number of grocery days per week.
    pub fn per_week(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn days(&self) -> &[Weekday] {
        &self.0
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn is_grocery_day(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    /// The next `count` grocery dates on or after `start`.
    pub fn upcoming(&self, start: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(count);
        if self.is_empty() {
            return dates;
        }
        let mut date = start;
        while dates.len() < count {
            if self.is_grocery_day(date) {
                dates.push(date);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        dates
    }
}

impl From<Vec<Weekday>> for GroceryDays {
    fn from(days: Vec<Weekday>) -> Self {
        Self::new(days)
    }
}

impl From<GroceryDays> for Vec<Weekday> {
    fn from(days: GroceryDays) -> Self {
        days.0
    }
}

impl fmt::Display for GroceryDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}
