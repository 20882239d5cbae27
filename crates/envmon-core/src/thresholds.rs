//! Mapping aggregate values to indicator levels.
//!
//! A [`ThresholdLadder`] holds six slots. Slots are scanned from 1 to 6 and
//! the level is the index of the **last** slot whose cut point the value
//! reaches. The ladder need not be ascending, so a later slot with a lower cut
//! point can raise the level past a higher earlier one.
//!
//! # Example
//!
//! ```
//! use envmon_core::level_for;
//! use envmon_types::{Level, ThresholdLadder};
//!
//! let ladder = ThresholdLadder::new([-1.0, 50.0, -1.0, 150.0, -1.0, 90.0]);
//! assert_eq!(level_for(&ladder, 2000.0, 120.0), Level::MAX);
//! assert_eq!(level_for(&ladder, 2000.0, 60.0), Level::new(2).unwrap());
//! assert_eq!(level_for(&ladder, 2000.0, 10.0), Level::ZERO);
//! ```

use tracing::trace;

use envmon_types::{Level, ThresholdLadder};

use crate::aggregate::Aggregate;

/// Level reached by `value` on `ladder`.
///
/// `range_max` scales fractional slots (see [`crate::RangeMax::resolve`]).
pub fn level_for(ladder: &ThresholdLadder, range_max: f64, value: f64) -> Level {
    let mut level = Level::ZERO;
    for (index, slot) in ladder.slots() {
        let Some(cut) = slot.cut_point(range_max) else {
            continue;
        };
        if value >= cut {
            level = Level::saturating(index as u8);
        }
    }
    trace!(value, range_max, level = level.get(), "Mapped value to level");
    level
}

/// Level of an aggregate; `NoData` maps to `None`.
pub fn level_for_aggregate(
    ladder: &ThresholdLadder,
    range_max: f64,
    aggregate: Aggregate,
) -> Option<Level> {
    aggregate.value().map(|v| level_for(ladder, range_max, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn test_ascending_ladder() {
        let ladder = ThresholdLadder::new([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(level_for(&ladder, 100.0, 35.0), level(3));
        assert_eq!(level_for(&ladder, 100.0, 5.0), Level::ZERO);
        assert_eq!(level_for(&ladder, 100.0, 60.0), Level::MAX);
    }

    #[test]
    fn test_last_passing_slot_wins() {
        let ladder = ThresholdLadder::new([-1.0, 50.0, -1.0, 150.0, -1.0, 90.0]);
        assert_eq!(level_for(&ladder, 1000.0, 120.0), Level::MAX);
        assert_eq!(level_for(&ladder, 1000.0, 160.0), Level::MAX);
        assert_eq!(level_for(&ladder, 1000.0, 80.0), level(2));
    }

    #[test]
    fn test_fractional_slot_uses_range_max() {
        let ladder = ThresholdLadder::new([-1.0, -1.0, -1.0, -1.0, -1.0, 0.5]);
        assert_eq!(level_for(&ladder, 200.0, 150.0), Level::MAX);
        assert_eq!(level_for(&ladder, 200.0, 99.0), Level::ZERO);
        assert_eq!(level_for(&ladder, 200.0, 100.0), Level::MAX);
    }

    #[test]
    fn test_zero_fraction_always_passes() {
        let ladder = ThresholdLadder::new([0.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
        assert_eq!(level_for(&ladder, 2000.0, 0.0), level(1));
    }

    #[test]
    fn test_all_unused_is_zero() {
        assert_eq!(level_for(&ThresholdLadder::unused(), 100.0, 1e9), Level::ZERO);
    }

    #[test]
    fn test_no_data_has_no_level() {
        let ladder = ThresholdLadder::new([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(level_for_aggregate(&ladder, 100.0, Aggregate::NoData), None);
        assert_eq!(
            level_for_aggregate(&ladder, 100.0, Aggregate::Value(25.0)),
            Some(level(2))
        );
    }

    proptest! {
        #[test]
        fn level_always_in_range(
            raw in proptest::array::uniform6(-2.0f64..3000.0),
            range_max in 0.1f64..5000.0,
            value in -1.0e4f64..1.0e4,
        ) {
            let level = level_for(&ThresholdLadder::new(raw), range_max, value);
            prop_assert!(level <= Level::MAX);
        }
    }
}
