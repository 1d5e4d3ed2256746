use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::analysis::AnalysisError;
use crate::data::CycleAnnotation;

/// Ladder levels spanning one full 360° turn. A fixed constant of the cycle
/// scheme, independent of how many levels a given table holds.
pub const LEVELS_PER_CYCLE: f64 = 9.0;

/// Strictly increasing ladder of price "octave" boundaries, grown by
/// `next = (sqrt(current) + step)^2` so gaps widen as price climbs.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleLevelTable {
    levels: Vec<f64>,
}

impl CycleLevelTable {
    /// Build the ladder from `start` until the first level at or above
    /// `max_price` (inclusive).
    pub fn build(start: f64, step: f64, max_price: f64) -> Result<Self, AnalysisError> {
        if !start.is_finite() || start <= 0.0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "cycle ladder start must be positive and finite, got {start}"
            )));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "cycle ladder step must be positive and finite, got {step}"
            )));
        }
        if !max_price.is_finite() || max_price <= start {
            return Err(AnalysisError::InvalidArgument(format!(
                "cycle ladder ceiling must exceed its start ({start}), got {max_price}"
            )));
        }

        let mut levels = vec![start];
        let mut current = start;
        while current < max_price {
            current = (current.sqrt() + step).powi(2);
            levels.push(current);
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Continuous position of `price` on the ladder, in turns.
    ///
    /// Prices at or below the first level map to 0.0; prices at or beyond
    /// the last level saturate at `(n-1) / 9` rather than extrapolating.
    /// Interior prices interpolate linearly within their bracketing pair,
    /// located by binary search.
    pub fn fraction(&self, price: f64) -> f64 {
        let levels = &self.levels;
        let last = levels.len() - 1;
        if price <= levels[0] {
            return 0.0;
        }
        if price >= levels[last] {
            return last as f64 / LEVELS_PER_CYCLE;
        }

        // First index whose level is strictly above price; the guards above
        // keep idx in 1..=last.
        let idx = levels.partition_point(|level| *level <= price);
        let below = levels[idx - 1];
        let above = levels[idx];
        ((idx - 1) as f64 + (price - below) / (above - below)) / LEVELS_PER_CYCLE
    }
}

/// Split a cycle fraction into whole turns and degrees into the current
/// turn. The angle is rounded to two decimals; a value that rounds to a
/// full 360.00 rolls over into the next cycle at 0°.
pub fn cycle_annotation(fraction: f64) -> CycleAnnotation {
    let mut cycle_index = fraction.floor() as u32;
    let mut angle = (fraction - fraction.floor()) * 360.0;
    angle = (angle * 100.0).round() / 100.0;
    if angle >= 360.0 {
        cycle_index += 1;
        angle = 0.0;
    }
    CycleAnnotation {
        cycle_index,
        angle_degrees: angle,
    }
}

/// Human-readable cycle position, e.g. `"2 & 135.00°"`.
pub fn cycle_label(fraction: f64) -> String {
    let annotation = cycle_annotation(fraction);
    format!(
        "{} & {:.2}°",
        annotation.cycle_index, annotation.angle_degrees
    )
}

type TableKey = (u64, u64, u64);

static TABLE_CACHE: OnceLock<Mutex<HashMap<TableKey, Arc<CycleLevelTable>>>> = OnceLock::new();

/// Process-wide compute-once cache of cycle tables.
///
/// Tables are pure functions of `(start, step, max_price)` and immutable,
/// so entries are never invalidated. Keys are the parameter bit patterns.
pub fn cached_table(
    start: f64,
    step: f64,
    max_price: f64,
) -> Result<Arc<CycleLevelTable>, AnalysisError> {
    let key = (start.to_bits(), step.to_bits(), max_price.to_bits());
    let cache = TABLE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(table) = cache.get(&key) {
        return Ok(Arc::clone(table));
    }
    let table = Arc::new(CycleLevelTable::build(start, step, max_price)?);
    cache.insert(key, Arc::clone(&table));
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table(max_price: f64) -> CycleLevelTable {
        CycleLevelTable::build(1.0, 0.25, max_price).unwrap()
    }

    #[test]
    fn first_levels_match_the_growth_rule() {
        let table = default_table(10.0);
        let levels = table.levels();
        assert_eq!(levels[0], 1.0);
        assert!((levels[1] - 1.5625).abs() < 1e-12);
        assert!((levels[2] - 2.25).abs() < 1e-12);
        assert!(*levels.last().unwrap() >= 10.0);
    }

    #[test]
    fn levels_are_strictly_increasing() {
        let table = default_table(50_000.0);
        for pair in table.levels().windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn fraction_saturates_at_both_ends() {
        let table = default_table(10.0);
        let levels = table.levels();
        let top = (levels.len() - 1) as f64 / LEVELS_PER_CYCLE;

        assert_eq!(table.fraction(levels[0]), 0.0);
        assert_eq!(table.fraction(0.5), 0.0);
        assert_eq!(table.fraction(*levels.last().unwrap()), top);
        assert_eq!(table.fraction(1e12), top);
    }

    #[test]
    fn interior_fraction_interpolates() {
        let table = default_table(10.0);
        // 1.5625 <= 2.0 < 2.25, one full level plus 0.4375 / 0.6875 of the next.
        let expected = (1.0 + (2.0 - 1.5625) / (2.25 - 1.5625)) / LEVELS_PER_CYCLE;
        assert!((table.fraction(2.0) - expected).abs() < 1e-12);
        assert!((table.fraction(2.0) - 0.181_818).abs() < 1e-4);
    }

    #[test]
    fn fraction_is_monotone_in_price() {
        let table = default_table(50_000.0);
        let mut previous = 0.0;
        let mut price = 1.0;
        while price < 50_000.0 {
            let fraction = table.fraction(price);
            assert!(fraction >= previous, "fraction regressed at price {price}");
            previous = fraction;
            price *= 1.01;
        }
    }

    #[test]
    fn exact_level_prices_land_on_whole_ninths() {
        let table = default_table(10.0);
        for (idx, level) in table.levels().iter().enumerate() {
            let fraction = table.fraction(*level);
            assert!((fraction - idx as f64 / LEVELS_PER_CYCLE).abs() < 1e-12);
        }
    }

    #[test]
    fn label_formats_cycles_and_degrees() {
        assert_eq!(cycle_label(0.0), "0 & 0.00°");
        assert_eq!(cycle_label(0.5), "0 & 180.00°");
        assert_eq!(cycle_label(2.25), "2 & 90.00°");
    }

    #[test]
    fn label_rolls_over_instead_of_printing_360() {
        // Angle rounds to 360.00, which must become the next whole cycle.
        let fraction = 0.999_999_9;
        let annotation = cycle_annotation(fraction);
        assert_eq!(annotation.cycle_index, 1);
        assert_eq!(annotation.angle_degrees, 0.0);
        assert_eq!(cycle_label(fraction), "1 & 0.00°");
    }

    #[test]
    fn bad_bounds_are_rejected() {
        assert!(matches!(
            CycleLevelTable::build(0.0, 0.25, 10.0),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            CycleLevelTable::build(-1.0, 0.25, 10.0),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            CycleLevelTable::build(1.0, 0.0, 10.0),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            CycleLevelTable::build(1.0, 0.25, 1.0),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn cache_returns_the_same_table_per_key() {
        let first = cached_table(1.0, 0.25, 123.0).unwrap();
        let second = cached_table(1.0, 0.25, 123.0).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = cached_table(1.0, 0.25, 124.0).unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }
}
