//! Frequency quotient calculation.
//!
//! A food item configured as "`frequency` times every `time_frame` weeks" with the
//! user shopping on `grocery_days_per_week` days is expected on
//! `frequency / (time_frame * grocery_days_per_week)` of all shopping occasions.
//! The rate is snapped to a 0.05 grid before it is handed to the scheduler so that
//! persisted values stay clean and threshold crossings are predictable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GrocerError, Result};

/// Number of grid steps per unit (1 / 0.05).
pub const QUOTIENT_STEPS_PER_UNIT: u32 = 20;

/// Expected inclusion rate per shopping occasion, on a 0.05 grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrequencyQuotient(f64);

impl FrequencyQuotient {
    /// The quotient of an item that never appears on a list.
    pub const ZERO: Self = Self(0.0);

    /// Wrap an already computed rate. Rejects negative and non-finite values.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(GrocerError::InvalidState(format!(
                "frequency quotient must be a finite non-negative number, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Build a quotient from a count of 0.05 steps.
    pub fn from_steps(steps: u32) -> Self {
        Self(steps as f64 / QUOTIENT_STEPS_PER_UNIT as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Number of 0.05 steps, rounded to the nearest step.
    pub fn steps(self) -> u32 {
        (self.0 * QUOTIENT_STEPS_PER_UNIT as f64).round() as u32
    }

    /// A zero quotient never includes its item.
    pub fn is_disabled(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for FrequencyQuotient {
    type Error = GrocerError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FrequencyQuotient> for f64 {
    fn from(q: FrequencyQuotient) -> Self {
        q.0
    }
}

impl fmt::Display for FrequencyQuotient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

fn require_positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(GrocerError::InvalidConfiguration(format!("{} must be positive", name)));
    }
    Ok(())
}

/// Unrounded inclusion rate. If there's one grocery day a week and an item is to be
/// had once every two weeks, the rate is 1 / (1 * 2) = 0.5.
pub fn raw_quotient(frequency: u32, time_frame: u32, grocery_days_per_week: u32) -> Result<f64> {
    require_positive("frequency", frequency)?;
    require_positive("time frame", time_frame)?;
    require_positive("grocery days per week", grocery_days_per_week)?;

    let occasions = time_frame as u64 * grocery_days_per_week as u64;
    Ok(frequency as f64 / occasions as f64)
}

/// Compute the frequency quotient, rounded half away from zero to the nearest 0.05.
pub fn compute_quotient(frequency: u32, time_frame: u32, grocery_days_per_week: u32) -> Result<FrequencyQuotient> {
    let raw = raw_quotient(frequency, time_frame, grocery_days_per_week)?;
    let steps = (raw * QUOTIENT_STEPS_PER_UNIT as f64).round();
    let quotient = FrequencyQuotient(steps / QUOTIENT_STEPS_PER_UNIT as f64);

    log::debug!(
        "quotient for {} per {} week(s) over {} grocery day(s): raw={:.4} rounded={}",
        frequency,
        time_frame,
        grocery_days_per_week,
        raw,
        quotient
    );
    Ok(quotient)
}
