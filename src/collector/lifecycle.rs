//! Lifecycle-aware measurement collector
//!
//! Wraps a [`StatisticsAccumulator`] behind a mutex together with a
//! `started` flag, and drives source-specific setup/teardown through the
//! [`MeasurementSource`] extension points.

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::stats::{StatisticsAccumulator, StatisticsSnapshot};

/// Setup/teardown hooks for a concrete measurement source.
///
/// Both hooks run while the collector's internal lock is held, so they must
/// not block for unbounded time. Failure is reported through the boolean
/// return value, never by panicking: a failed `setup_start` leaves the
/// collector stopped and retryable.
pub trait MeasurementSource {
    /// Perform whatever setup this source needs (open a file handle,
    /// validate a counter exists). Return `false` on failure.
    fn setup_start(&mut self) -> bool;

    /// Tear down the setup. Return `false` on failure.
    fn setup_stop(&mut self) -> bool;
}

/// A measurement source that can be polled for the next observation.
pub trait PeriodicSource: MeasurementSource {
    /// Produce the next measurement. Sources that need a previous sample
    /// to compute a delta return `NaN` until one is cached.
    fn measure(&mut self) -> f64;
}

/// Lock-guarded collector state. The flag, the aggregates, and the source
/// are only reachable through the mutex, which keeps every lifecycle
/// transition atomic with respect to accumulator access.
struct Inner<S> {
    started: bool,
    stats: StatisticsAccumulator,
    source: S,
}

/// Collects observed measurements and aggregates them into statistics.
///
/// A single instance may be shared across threads: a sampling thread
/// calling [`accept_data`](Collector::accept_data), a reporting thread
/// calling [`statistics_results`](Collector::statistics_results), and a
/// control thread calling [`start`](Collector::start) /
/// [`stop`](Collector::stop). All critical sections are O(1) and nothing
/// allocates on the measurement path.
///
/// `accept_data` deliberately does not check the started flag: gating
/// ingestion is the caller's job, and measurements folded before `start`
/// are visible in the results. `stop` clears the accumulator, so each
/// start/stop cycle begins from an empty aggregate.
pub struct Collector<S> {
    inner: Mutex<Inner<S>>,
}

impl<S: MeasurementSource> Collector<S> {
    /// Create a collector in the not-started state, owning `source`.
    pub fn new(source: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                started: false,
                stats: StatisticsAccumulator::new(),
                source,
            }),
        }
    }

    /// Start collecting data.
    ///
    /// Runs the source's `setup_start` hook under the lock; on success the
    /// collector transitions to started. A failed attempt leaves it stopped
    /// and may be retried. Calling `start` while already started is a no-op
    /// returning `true`.
    pub fn start(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.started {
            debug!("start called on an already started collector");
            return true;
        }

        if inner.source.setup_start() {
            inner.started = true;
            debug!("collector started");
            true
        } else {
            warn!("collector start failed: source setup unsuccessful");
            false
        }
    }

    /// Stop collecting data.
    ///
    /// Runs the source's `setup_stop` hook, then unconditionally clears the
    /// accumulated measurements and transitions to not-started, so the
    /// collector is restartable even when teardown reports failure. Returns
    /// the hook's result. Calling `stop` while already stopped is a no-op
    /// returning `true`.
    pub fn stop(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.started {
            debug!("stop called on an already stopped collector");
            return true;
        }

        let stopped = inner.source.setup_stop();
        if !stopped {
            warn!("collector stop: source teardown unsuccessful");
        }
        inner.stats.reset();
        inner.started = false;
        debug!("collector stopped, measurements cleared");
        stopped
    }

    /// Add an observed measurement.
    ///
    /// Always folds into the aggregates, independent of the started state.
    pub fn accept_data(&self, measurement: f64) {
        self.inner.lock().stats.fold(measurement);
    }

    /// Snapshot the statistics for all observed measurements.
    pub fn statistics_results(&self) -> StatisticsSnapshot {
        self.inner.lock().stats.snapshot()
    }

    /// Clear all current measurements.
    pub fn clear_current_measurements(&self) {
        self.inner.lock().stats.reset();
    }

    /// Whether `start` has been called (and `stop` has not).
    pub fn is_started(&self) -> bool {
        self.inner.lock().started
    }

    /// Human-readable status of this collector. Display-only, not a wire
    /// format.
    pub fn status_string(&self) -> String {
        let inner = self.inner.lock();
        format!("started={}, {}", inner.started, inner.stats.snapshot())
    }
}

impl<S: PeriodicSource> Collector<S> {
    /// Poll the source once and fold the measurement, holding the lock for
    /// the whole measure-then-fold step so the pair is atomic. Returns the
    /// measured value.
    pub fn sample(&self) -> f64 {
        let mut inner = self.inner.lock();
        let measurement = inner.source.measure();
        inner.stats.fold(measurement);
        measurement
    }
}
