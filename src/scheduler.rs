//! Deficit scheduler deciding whether an item goes on today's list.
//!
//! Each shopping occasion credits the item's accumulator with its frequency
//! quotient. Whenever a full unit of credit is available the item is included and
//! one unit is spent, carrying the fractional remainder forward. Over `N` occasions
//! the number of inclusions stays within one unit of `N * quotient`.
//!
//! The scheduler is a pure function of `(quotient, accumulator)`; callers own the
//! persisted state and hand it in on every call.

use serde::{Deserialize, Serialize};

use crate::error::{GrocerError, Result};
use crate::quotient::{FrequencyQuotient, QUOTIENT_STEPS_PER_UNIT};

/// Distance, in quotient steps, within which a value counts as lying on the 0.05 grid.
pub const GRID_TOLERANCE: f64 = 1e-9;

/// Largest step count still represented exactly by an `f64`.
const MAX_EXACT_STEPS: f64 = 9_007_199_254_740_992.0;

/// Outcome of one scheduling call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Whether the item goes on this occasion's list.
    pub include: bool,
    /// Units of credit paid down by this call. Greater than one only when the
    /// quotient exceeds 1 or the prior accumulator was already at or above 1.
    pub owed: u32,
    /// Accumulator to persist, always in `[0, 1)`.
    pub accumulator: f64,
}

fn check_accumulator(accumulator: f64) -> Result<()> {
    if !accumulator.is_finite() || accumulator < 0.0 {
        return Err(GrocerError::InvalidState(format!(
            "accumulator must be a finite non-negative number, got {}",
            accumulator
        )));
    }
    Ok(())
}

/// Whole 0.05 steps in `value`, if it sits on the grid up to float noise.
fn grid_steps(value: f64) -> Option<u64> {
    let scaled = value * QUOTIENT_STEPS_PER_UNIT as f64;
    let steps = scaled.round();
    if steps < MAX_EXACT_STEPS && (scaled - steps).abs() <= GRID_TOLERANCE {
        Some(steps as u64)
    } else {
        None
    }
}

/// Split non-negative credit into whole units and the remainder in `[0, 1)`.
///
/// Credit on the 0.05 grid is split in integer steps, so sums of grid values never
/// drift across the threshold. Anything else is split exactly as given.
fn pay_down(candidate: f64, steps: Option<u64>) -> Result<(u32, f64)> {
    let (whole, remainder) = match steps {
        Some(steps) => {
            let per_unit = QUOTIENT_STEPS_PER_UNIT as u64;
            (
                (steps / per_unit) as f64,
                (steps % per_unit) as f64 / QUOTIENT_STEPS_PER_UNIT as f64,
            )
        }
        None => {
            let whole = candidate.floor();
            (whole, candidate - whole)
        }
    };
    if whole > u32::MAX as f64 {
        return Err(GrocerError::InvalidState(format!(
            "accumulated credit {} is out of range",
            candidate
        )));
    }
    Ok((whole as u32, remainder))
}

/// Credit `quotient` to `prior` and pay down every whole unit.
///
/// A prior accumulator at or above 1 should never come out of this function, so it
/// points at a corrupted store. It is normalized rather than rejected and the extra
/// units are reported through [`Decision::owed`]. A zero quotient disables the item:
/// it is never included and a valid prior is handed back untouched.
pub fn schedule(quotient: FrequencyQuotient, prior: f64) -> Result<Decision> {
    check_accumulator(prior)?;
    let q = quotient.value();
    if !q.is_finite() || q < 0.0 {
        return Err(GrocerError::InvalidState(format!("quotient out of range: {}", q)));
    }

    if prior >= 1.0 {
        log::warn!("prior accumulator {} is not below 1, normalizing", prior);
    }

    if quotient.is_disabled() {
        let accumulator = if prior < 1.0 { prior } else { prior.fract() };
        return Ok(Decision {
            include: false,
            owed: 0,
            accumulator,
        });
    }

    let candidate = prior + q;
    let steps = grid_steps(prior).zip(grid_steps(q)).map(|(p, q)| p + q);
    let (owed, accumulator) = pay_down(candidate, steps)?;

    log::debug!(
        "schedule: quotient={} prior={} -> owed={} accumulator={}",
        quotient,
        prior,
        owed,
        accumulator
    );

    Ok(Decision {
        include: owed > 0,
        owed,
        accumulator,
    })
}

/// Fractional part of non-negative credit, computed on the grid when possible.
fn remainder(value: f64) -> f64 {
    match grid_steps(value) {
        Some(steps) => (steps % QUOTIENT_STEPS_PER_UNIT as u64) as f64 / QUOTIENT_STEPS_PER_UNIT as f64,
        None => value.fract(),
    }
}

/// Persisted per-item scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub quotient: FrequencyQuotient,
    pub accumulator: f64,
}

impl SchedulerState {
    /// Fresh state for a newly configured item.
    ///
    /// The accumulator starts at the quotient reduced into `[0, 1)`, so an item whose
    /// quotient is below 1 starts with exactly its quotient and crosses the threshold
    /// at the earliest occasion its rate allows.
    pub fn initial(quotient: FrequencyQuotient) -> Self {
        Self {
            quotient,
            accumulator: remainder(quotient.value()),
        }
    }

    /// Reject states no scheduler transition could have produced.
    pub fn validate(&self) -> Result<()> {
        check_accumulator(self.accumulator)?;
        FrequencyQuotient::new(self.quotient.value())?;
        Ok(())
    }

    /// Keep accumulated credit but switch to a recomputed quotient.
    pub fn with_quotient(self, quotient: FrequencyQuotient) -> Self {
        let accumulator = if self.accumulator >= 1.0 {
            remainder(self.accumulator)
        } else {
            self.accumulator
        };
        Self { quotient, accumulator }
    }

    /// Run one shopping occasion and return the decision with the state to persist.
    pub fn advance(&self) -> Result<(Decision, SchedulerState)> {
        let decision = schedule(self.quotient, self.accumulator)?;
        let next = SchedulerState {
            quotient: self.quotient,
            accumulator: decision.accumulator,
        };
        Ok((decision, next))
    }
}

/// Decisions for the next `occasions` shopping occasions, without persisting anything.
pub fn forecast(state: SchedulerState, occasions: usize) -> Result<Vec<Decision>> {
    let mut current = state;
    let mut decisions = Vec::with_capacity(occasions);
    for _ in 0..occasions {
        let (decision, next) = current.advance()?;
        decisions.push(decision);
        current = next;
    }
    Ok(decisions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(steps: u32) -> FrequencyQuotient {
        FrequencyQuotient::from_steps(steps)
    }

    #[test]
    fn test_half_excluded_from_zero() {
        let d = schedule(q(10), 0.0).unwrap();
        assert!(!d.include);
        assert_eq!(d.owed, 0);
        assert_eq!(d.accumulator, 0.5);
    }

    #[test]
    fn test_half_included_from_half() {
        let d = schedule(q(10), 0.5).unwrap();
        assert!(d.include);
        assert_eq!(d.owed, 1);
        assert_eq!(d.accumulator, 0.0);
    }

    #[test]
    fn test_remainder_carries_forward() {
        let d = schedule(q(9), 0.9).unwrap();
        assert!(d.include);
        assert_eq!(d.accumulator, 0.35);
    }

    #[test]
    fn test_zero_quotient_never_includes() {
        let mut acc = 0.4;
        for _ in 0..100 {
            let d = schedule(FrequencyQuotient::ZERO, acc).unwrap();
            assert!(!d.include);
            assert_eq!(d.accumulator, 0.4);
            acc = d.accumulator;
        }
    }

    #[test]
    fn test_zero_quotient_keeps_prior_near_one() {
        let d = schedule(FrequencyQuotient::ZERO, 0.9999999995).unwrap();
        assert!(!d.include);
        assert_eq!(d.owed, 0);
        assert_eq!(d.accumulator, 0.9999999995);
    }

    #[test]
    fn test_zero_quotient_keeps_off_grid_prior() {
        let d = schedule(FrequencyQuotient::ZERO, 0.1234567891234).unwrap();
        assert!(!d.include);
        assert_eq!(d.accumulator, 0.1234567891234);
    }

    #[test]
    fn test_off_grid_prior_just_below_one_is_not_rounded_up() {
        let prior = 0.0499999999;
        let d = schedule(q(19), prior).unwrap();
        assert!(!d.include);
        assert_eq!(d.accumulator, prior + 0.95);
    }

    #[test]
    fn test_off_grid_prior_carries_exact_remainder() {
        let prior = 0.1234567891234;
        let d = schedule(q(10), prior).unwrap();
        assert!(!d.include);
        assert_eq!(d.accumulator, prior + 0.5);

        let d = schedule(q(18), prior).unwrap();
        assert!(d.include);
        assert_eq!(d.accumulator, (prior + 0.9) - 1.0);
    }

    #[test]
    fn test_negative_prior_is_invalid_state() {
        assert!(matches!(schedule(q(10), -0.1), Err(GrocerError::InvalidState(_))));
    }

    #[test]
    fn test_non_finite_prior_is_invalid_state() {
        assert!(matches!(schedule(q(10), f64::NAN), Err(GrocerError::InvalidState(_))));
        assert!(matches!(schedule(q(10), f64::INFINITY), Err(GrocerError::InvalidState(_))));
    }

    #[test]
    fn test_prior_above_one_is_normalized() {
        let d = schedule(q(10), 2.25).unwrap();
        assert!(d.include);
        assert_eq!(d.owed, 2);
        assert_eq!(d.accumulator, 0.75);
    }

    #[test]
    fn test_quotient_above_one_pays_down_every_unit() {
        let d = schedule(q(50), 0.0).unwrap();
        assert_eq!(d.owed, 2);
        assert_eq!(d.accumulator, 0.5);

        let d = schedule(q(50), d.accumulator).unwrap();
        assert_eq!(d.owed, 3);
        assert_eq!(d.accumulator, 0.0);
    }

    #[test]
    fn test_tenth_quotient_includes_every_tenth_call() {
        // 0.1 summed ten times in f64 falls just short of 1.0 without tolerance
        let mut acc = 0.0;
        let mut hits = Vec::new();
        for i in 1..=30 {
            let d = schedule(q(2), acc).unwrap();
            if d.include {
                hits.push(i);
            }
            acc = d.accumulator;
        }
        assert_eq!(hits, vec![10, 20, 30]);
    }

    #[test]
    fn test_accumulator_stays_in_unit_interval() {
        for steps in 0..=20 {
            for prior_steps in 0..20 {
                let prior = prior_steps as f64 / 20.0;
                let d = schedule(q(steps), prior).unwrap();
                assert!(d.accumulator >= 0.0 && d.accumulator < 1.0, "{} {}", steps, prior);
            }
        }
    }

    #[test]
    fn test_initial_state_equals_quotient_below_one() {
        let state = SchedulerState::initial(q(10));
        assert_eq!(state.accumulator, 0.5);
        assert_eq!(state.quotient, q(10));
    }

    #[test]
    fn test_initial_state_for_whole_quotient() {
        let state = SchedulerState::initial(q(20));
        assert_eq!(state.accumulator, 0.0);
        let (decision, _) = state.advance().unwrap();
        assert!(decision.include);
        assert_eq!(decision.owed, 1);
    }

    #[test]
    fn test_new_weekly_item_appears_first_time() {
        let state = SchedulerState::initial(q(10));
        let (decision, next) = state.advance().unwrap();
        assert!(decision.include);
        assert_eq!(next.accumulator, 0.0);
    }

    #[test]
    fn test_long_run_rate_converges() {
        for steps in 1..20 {
            let quotient = q(steps);
            let decisions = forecast(SchedulerState::initial(quotient), 2000).unwrap();
            let mut included = 0u32;
            for (n, d) in decisions.iter().enumerate() {
                included += d.owed;
                let ideal = (n + 1) as f64 * quotient.value();
                assert!(
                    (included as f64 - ideal).abs() < 1.0,
                    "quotient {} prefix {}: {} vs {}",
                    quotient,
                    n + 1,
                    included,
                    ideal
                );
            }
            let rate = included as f64 / decisions.len() as f64;
            assert!((rate - quotient.value()).abs() < 0.001);
        }
    }

    #[test]
    fn test_full_quotient_includes_every_time() {
        let decisions = forecast(SchedulerState::initial(q(20)), 50).unwrap();
        assert!(decisions.iter().all(|d| d.include && d.owed == 1));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let state = SchedulerState::initial(q(7));
        let first = forecast(state, 200).unwrap();
        let second = forecast(state, 200).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_with_quotient_keeps_credit() {
        let state = SchedulerState {
            quotient: q(10),
            accumulator: 0.3,
        };
        let switched = state.with_quotient(q(5));
        assert_eq!(switched.quotient, q(5));
        assert_eq!(switched.accumulator, 0.3);
    }

    #[test]
    fn test_validate_rejects_negative_accumulator() {
        let state = SchedulerState {
            quotient: q(10),
            accumulator: -0.5,
        };
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_state_json_shape() {
        let state = SchedulerState::initial(q(9));
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json, serde_json::json!({"quotient": 0.45, "accumulator": 0.45}));
    }
}
