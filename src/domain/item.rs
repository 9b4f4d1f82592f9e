//! Food item configuration record.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::{ItemId, now_ms};
use crate::quotient::{FrequencyQuotient, compute_quotient};

/// A food item the user wants to buy `frequency` times every `time_frame` weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    //=== Identity ===
    pub id: ItemId,

    //=== Presentation ===
    pub label: String,
    pub brand: Option<String>,
    pub amount: u32,
    pub unit: Option<String>,
    pub info: Option<String>,

    //=== Rate ===
    /// Desired purchases per time frame
    pub frequency: u32,
    /// Time frame in weeks
    pub time_frame: u32,

    //=== Timestamps ===
    pub created_at: i64,
    pub updated_at: i64,
}

impl FoodItem {
    /// Create a new item with a fresh ID and an amount of one.
    pub fn new(label: impl Into<String>, frequency: u32, time_frame: u32) -> Self {
        let now = now_ms();
        Self {
            id: ItemId::generate(),
            label: label.into(),
            brand: None,
            amount: 1,
            unit: None,
            info: None,
            frequency,
            time_frame,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Returns true if `other` asks for a different purchase rate.
    pub fn rate_changed(&self, other: &FoodItem) -> bool {
        self.frequency != other.frequency || self.time_frame != other.time_frame
    }

    /// Frequency quotient of this item for the given number of grocery days per week.
    pub fn quotient(&self, grocery_days_per_week: u32) -> Result<FrequencyQuotient> {
        compute_quotient(self.frequency, self.time_frame, grocery_days_per_week)
    }

    /// Human readable rate, e.g. "2 times every 3 weeks".
    pub fn describe_frequency(&self) -> String {
        let times = if self.frequency == 1 {
            "once".to_string()
        } else {
            format!("{} times", self.frequency)
        };
        let weeks = if self.time_frame == 1 {
            "week".to_string()
        } else {
            format!("{} weeks", self.time_frame)
        };
        format!("{} every {}", times, weeks)
    }

    /// Amount with unit, e.g. "2 l" or "3".
    pub fn describe_amount(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {}", self.amount, unit),
            None => self.amount.to_string(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now_ms();
    }
}
