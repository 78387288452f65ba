//! Incremental passenger counting for boarding and deboarding.

use super::error::TurnaroundError;

/// Largest passenger count change accepted in one tick.
pub const MAX_PAX_DELTA_PER_TICK: i64 = 15;

/// Follows a monotonically increasing GSX passenger counter.
///
/// Jumps outside `[0, MAX_PAX_DELTA_PER_TICK]` are rejected and leave the
/// last accepted value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassengerTracker {
    last: i64,
}

impl PassengerTracker {
    pub fn last(&self) -> i64 {
        self.last
    }

    /// Accept a new observation, returning the delta.
    pub fn advance(&mut self, observed: i64) -> Result<i64, TurnaroundError> {
        let delta = observed - self.last;
        if !(0..=MAX_PAX_DELTA_PER_TICK).contains(&delta) {
            return Err(TurnaroundError::Invariant(format!(
                "passenger delta {} outside [0, {}] (last {}, observed {})",
                delta, MAX_PAX_DELTA_PER_TICK, self.last, observed
            )));
        }
        self.last = observed;
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_small_steps() {
        let mut tracker = PassengerTracker::default();
        assert_eq!(tracker.advance(10).unwrap(), 10);
        assert_eq!(tracker.advance(10).unwrap(), 0);
        assert_eq!(tracker.advance(25).unwrap(), 15);
        assert_eq!(tracker.last(), 25);
    }

    #[test]
    fn test_rejects_jump_and_backwards() {
        let mut tracker = PassengerTracker::default();
        tracker.advance(5).unwrap();
        assert!(tracker.advance(40).is_err());
        assert!(tracker.advance(4).is_err());
        assert_eq!(tracker.last(), 5);
    }

    proptest! {
        #[test]
        fn prop_out_of_window_never_applied(start in 0i64..500, delta in -500i64..500) {
            let mut tracker = PassengerTracker::default();
            // Walk up to `start` in legal increments.
            while tracker.last() < start {
                let step = (start - tracker.last()).min(MAX_PAX_DELTA_PER_TICK);
                tracker.advance(tracker.last() + step).unwrap();
            }

            let result = tracker.advance(start + delta);
            if (0..=MAX_PAX_DELTA_PER_TICK).contains(&delta) {
                prop_assert_eq!(result.unwrap(), delta);
                prop_assert_eq!(tracker.last(), start + delta);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(tracker.last(), start);
            }
        }
    }
}
