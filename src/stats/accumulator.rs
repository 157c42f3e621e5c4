//! Online statistics accumulator
//!
//! Folds a stream of scalar measurements into running aggregates (count,
//! mean, min, max, standard deviation) in O(1) time and O(1) space, without
//! retaining the raw samples. Uses Welford's numerically stable algorithm
//! for the mean/variance update to avoid catastrophic cancellation on
//! long-running streams.

use std::fmt;

/// Immutable snapshot of the aggregate statistics.
///
/// All floating-point fields are `NaN` when `sample_count == 0`.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub sample_count: u64,
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    /// Population standard deviation: `sqrt(m2 / count)`.
    /// `0.0` for a single sample, `NaN` when empty.
    pub standard_deviation: f64,
}

impl fmt::Display for StatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "avg={:.6}, min={:.6}, max={:.6}, std_dev={:.6}, count={}",
            self.average, self.minimum, self.maximum, self.standard_deviation, self.sample_count
        )
    }
}

/// Running statistics accumulator.
///
/// Not internally synchronized: the owner serializes access. The collector
/// in [`crate::collector`] wraps one of these behind a mutex.
///
/// Non-finite measurements are accepted rather than filtered: a `NaN`
/// poisons the mean and standard deviation per IEEE-754 semantics, while
/// min/max use `f64::min`/`f64::max` and therefore ignore `NaN` operands.
/// Infinities flow through all aggregates.
///
/// # Example
///
/// ```
/// use sysmetrics::stats::StatisticsAccumulator;
///
/// let mut stats = StatisticsAccumulator::new();
/// for value in [1.0, 2.0, 3.0] {
///     stats.fold(value);
/// }
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.sample_count, 3);
/// assert!((snapshot.average - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct StatisticsAccumulator {
    /// Number of measurements folded
    count: u64,
    /// Running mean
    mean: f64,
    /// Sum of squared differences from the mean (M2 in Welford's algorithm)
    m2: f64,
    /// Running minimum (NaN when empty)
    min: f64,
    /// Running maximum (NaN when empty)
    max: f64,
}

impl Default for StatisticsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsAccumulator {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Fold one measurement into the running aggregates.
    ///
    /// O(1), no allocation.
    pub fn fold(&mut self, measurement: f64) {
        self.count += 1;

        // f64::min/max return the non-NaN operand, so the NaN sentinels are
        // replaced by the first measurement.
        self.min = self.min.min(measurement);
        self.max = self.max.max(measurement);

        // Welford's algorithm
        let delta = measurement - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = measurement - self.mean;
        self.m2 += delta * delta2;
    }

    /// Number of measurements folded so far.
    pub fn sample_count(&self) -> u64 {
        self.count
    }

    /// Check if no measurements have been folded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean of the folded measurements, `NaN` when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Smallest folded measurement, `NaN` when empty.
    pub fn minimum(&self) -> f64 {
        self.min
    }

    /// Largest folded measurement, `NaN` when empty.
    pub fn maximum(&self) -> f64 {
        self.max
    }

    /// Population standard deviation of the folded measurements.
    ///
    /// Computed as `sqrt(m2 / count)`: `NaN` when empty, `0.0` for a
    /// single sample.
    pub fn standard_deviation(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }

    /// Take a snapshot of the current aggregates without mutating state.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            sample_count: self.count,
            average: self.average(),
            minimum: self.minimum(),
            maximum: self.maximum(),
            standard_deviation: self.standard_deviation(),
        }
    }

    /// Restore the empty state.
    ///
    /// Safe to call repeatedly, including when already empty.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let stats = StatisticsAccumulator::new();

        assert!(stats.is_empty());
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sample_count, 0);
        assert!(snapshot.average.is_nan());
        assert!(snapshot.minimum.is_nan());
        assert!(snapshot.maximum.is_nan());
        assert!(snapshot.standard_deviation.is_nan());
    }

    #[test]
    fn test_one_two_three() {
        let mut stats = StatisticsAccumulator::new();
        for v in [1.0, 2.0, 3.0] {
            stats.fold(v);
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sample_count, 3);
        assert!((snapshot.average - 2.0).abs() < 1e-9);
        assert_eq!(snapshot.minimum, 1.0);
        assert_eq!(snapshot.maximum, 3.0);
        // Population std-dev: sqrt(2/3)
        assert!((snapshot.standard_deviation - (2.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_single_value() {
        let mut stats = StatisticsAccumulator::new();
        stats.fold(42.0);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sample_count, 1);
        assert_eq!(snapshot.average, 42.0);
        assert_eq!(snapshot.minimum, 42.0);
        assert_eq!(snapshot.maximum, 42.0);
        assert_eq!(snapshot.standard_deviation, 0.0);
    }

    #[test]
    fn test_matches_batch_mean() {
        let values = [3.2, 7.1, 0.4, 9.9, 5.5, 2.2, 8.8, 1.1, 6.6, 4.4];
        let mut stats = StatisticsAccumulator::new();
        for v in values {
            stats.fold(v);
        }

        let batch_mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        assert!((stats.average() - batch_mean).abs() < 1e-9 * batch_mean.abs());
        assert_eq!(stats.minimum(), 0.4);
        assert_eq!(stats.maximum(), 9.9);
    }

    #[test]
    fn test_reset() {
        let mut stats = StatisticsAccumulator::new();
        stats.fold(1.0);
        stats.fold(2.0);

        stats.reset();

        assert!(stats.is_empty());
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sample_count, 0);
        assert!(snapshot.average.is_nan());
        assert!(snapshot.minimum.is_nan());

        // Resetting the empty state is a no-op
        stats.reset();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_numerical_stability() {
        // Large offset that would lose precision with naive sum-of-squares
        let mut stats = StatisticsAccumulator::new();

        let base = 1e12;
        for i in 0..1000 {
            stats.fold(base + i as f64);
        }

        let expected_mean = base + 499.5;
        assert!(
            (stats.average() - expected_mean).abs() < 1.0,
            "mean: {} expected: {}",
            stats.average(),
            expected_mean
        );
        // Population std-dev of 0..999 is ~288.67, independent of the offset
        assert!((stats.standard_deviation() - 288.67).abs() < 0.01);
    }

    #[test]
    fn test_nan_poisons_mean_but_not_min_max() {
        let mut stats = StatisticsAccumulator::new();
        stats.fold(1.0);
        stats.fold(f64::NAN);
        stats.fold(3.0);

        // NaN measurements are counted, not filtered
        assert_eq!(stats.sample_count(), 3);
        assert!(stats.average().is_nan());
        assert!(stats.standard_deviation().is_nan());

        // f64::min/max skip the NaN operand
        assert_eq!(stats.minimum(), 1.0);
        assert_eq!(stats.maximum(), 3.0);
    }

    #[test]
    fn test_infinity_flows_through() {
        let mut stats = StatisticsAccumulator::new();
        stats.fold(1.0);
        stats.fold(f64::INFINITY);

        assert_eq!(stats.sample_count(), 2);
        assert_eq!(stats.maximum(), f64::INFINITY);
        assert_eq!(stats.average(), f64::INFINITY);
    }

    #[test]
    fn test_min_average_max_ordering() {
        let mut stats = StatisticsAccumulator::new();
        for v in [5.0, -3.0, 12.0, 0.5, 7.25] {
            stats.fold(v);
        }

        let s = stats.snapshot();
        assert!(s.minimum <= s.average);
        assert!(s.average <= s.maximum);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut stats = StatisticsAccumulator::new();
        stats.fold(2.0);

        let json = serde_json::to_string(&stats.snapshot()).unwrap();
        assert!(json.contains("\"sampleCount\":1"));
        assert!(json.contains("\"standardDeviation\""));
    }
}
