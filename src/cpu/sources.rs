//! CPU measurement sources
//!
//! [`MeasurementSource`] implementations backed by procfs. Each source
//! caches the previous counter sample and reports the active percentage
//! over the interval since that sample, so the first measurement after a
//! start is `NaN`.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::collector::{MeasurementSource, PeriodicSource};
use crate::cpu::proc_stat::{
    cpu_active_percentage, parse_cpu_times, parse_process_ticks, process_cpu_active_percentage,
    CpuTimes, ProcStatError, ProcessCpuTimes,
};

const PROC_STAT: &str = "/proc/stat";
const PROC_SELF_STAT: &str = "/proc/self/stat";

/// System-wide CPU utilization source reading `/proc/stat`.
///
/// # Example
///
/// ```no_run
/// use sysmetrics::collector::Collector;
/// use sysmetrics::cpu::LinuxCpuSource;
///
/// let collector = Collector::new(LinuxCpuSource::new());
/// assert!(collector.start());
/// collector.sample(); // NaN, caches the first counter sample
/// ```
pub struct LinuxCpuSource {
    stat_path: PathBuf,
    last: Option<CpuTimes>,
}

impl Default for LinuxCpuSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxCpuSource {
    /// Source reading the real `/proc/stat`.
    pub fn new() -> Self {
        Self::with_stat_path(PROC_STAT)
    }

    /// Source reading an alternate stat file. Used by tests.
    pub fn with_stat_path(path: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: path.into(),
            last: None,
        }
    }

    fn read_times(&self) -> Result<CpuTimes, ProcStatError> {
        parse_cpu_times(&fs::read_to_string(&self.stat_path)?)
    }
}

impl MeasurementSource for LinuxCpuSource {
    fn setup_start(&mut self) -> bool {
        self.last = None;
        match self.read_times() {
            Ok(_) => true,
            Err(e) => {
                warn!("cannot read {}: {}", self.stat_path.display(), e);
                false
            }
        }
    }

    fn setup_stop(&mut self) -> bool {
        self.last = None;
        true
    }
}

impl PeriodicSource for LinuxCpuSource {
    fn measure(&mut self) -> f64 {
        let current = match self.read_times() {
            Ok(times) => times,
            Err(e) => {
                warn!("cpu measurement failed: {}", e);
                return f64::NAN;
            }
        };

        let percentage = match &self.last {
            Some(previous) => cpu_active_percentage(previous, &current),
            None => f64::NAN,
        };
        self.last = Some(current);
        percentage
    }
}

/// Per-process CPU utilization source.
///
/// Reports the calling process's `utime + stime` delta as a percentage of
/// total system ticks, reading `/proc/self/stat` and `/proc/stat`.
pub struct LinuxProcessCpuSource {
    stat_path: PathBuf,
    process_stat_path: PathBuf,
    metric_name: String,
    last: Option<ProcessCpuTimes>,
}

impl Default for LinuxProcessCpuSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxProcessCpuSource {
    /// Source for the calling process.
    pub fn new() -> Self {
        Self::with_paths(PROC_STAT, PROC_SELF_STAT)
    }

    /// Source reading alternate stat files. Used by tests.
    pub fn with_paths(stat_path: impl Into<PathBuf>, process_stat_path: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: stat_path.into(),
            process_stat_path: process_stat_path.into(),
            metric_name: format!("{}_cpu_percent_used", std::process::id()),
            last: None,
        }
    }

    /// Metric label for this source, `<pid>_cpu_percent_used`.
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    fn read_times(&self) -> Result<ProcessCpuTimes, ProcStatError> {
        let process_ticks = parse_process_ticks(&fs::read_to_string(&self.process_stat_path)?)?;
        let total_ticks = parse_cpu_times(&fs::read_to_string(&self.stat_path)?)?.total_ticks();
        Ok(ProcessCpuTimes {
            process_ticks,
            total_ticks,
        })
    }
}

impl MeasurementSource for LinuxProcessCpuSource {
    fn setup_start(&mut self) -> bool {
        self.last = None;
        match self.read_times() {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    "cannot read {} or {}: {}",
                    self.process_stat_path.display(),
                    self.stat_path.display(),
                    e
                );
                false
            }
        }
    }

    fn setup_stop(&mut self) -> bool {
        self.last = None;
        true
    }
}

impl PeriodicSource for LinuxProcessCpuSource {
    fn measure(&mut self) -> f64 {
        let current = match self.read_times() {
            Ok(times) => times,
            Err(e) => {
                warn!("process cpu measurement failed: {}", e);
                return f64::NAN;
            }
        };

        let percentage = match &self.last {
            Some(previous) => process_cpu_active_percentage(previous, &current),
            None => f64::NAN,
        };
        self.last = Some(current);
        percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Collector;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sysmetrics-test-{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_first_measurement_is_nan_then_percentage() {
        let path = write_temp(
            "cpu-a",
            "cpu  100 0 100 800 0 0 0 0 0 0\n",
        );
        let mut source = LinuxCpuSource::with_stat_path(&path);

        assert!(source.setup_start());

        // First call caches, no interval to compare against
        assert!(source.measure().is_nan());

        fs::write(&path, "cpu  150 0 150 900 0 0 0 0 0 0\n").unwrap();
        let pct = source.measure();
        // active delta 100 of total delta 200
        assert!((pct - 50.0).abs() < 1e-9);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_setup_start_fails_for_missing_file() {
        let mut source = LinuxCpuSource::with_stat_path("/nonexistent/proc/stat");
        assert!(!source.setup_start());
        // Retry against the same path still reports failure, not a panic
        assert!(!source.setup_start());
    }

    #[test]
    fn test_stop_clears_cached_sample() {
        let path = write_temp("cpu-b", "cpu  100 0 100 800 0 0 0 0 0 0\n");
        let mut source = LinuxCpuSource::with_stat_path(&path);

        assert!(source.setup_start());
        source.measure();
        assert!(source.setup_stop());

        // After a stop/start cycle the first measurement caches again
        assert!(source.setup_start());
        assert!(source.measure().is_nan());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_measure_on_unreadable_file_returns_nan() {
        let path = write_temp("cpu-c", "cpu  100 0 100 800 0 0 0 0 0 0\n");
        let mut source = LinuxCpuSource::with_stat_path(&path);
        assert!(source.setup_start());

        fs::remove_file(&path).unwrap();
        assert!(source.measure().is_nan());
    }

    #[test]
    fn test_process_source_percentage() {
        let stat = write_temp("pstat-sys", "cpu  100 0 100 800 0 0 0 0 0 0\n");
        let pstat = write_temp(
            "pstat-proc",
            "1 (a) S 0 1 1 0 -1 0 0 0 0 0 10 10 0 0 20 0 1 0 1 1 1 1",
        );
        let mut source = LinuxProcessCpuSource::with_paths(&stat, &pstat);

        assert!(source.setup_start());
        assert!(source.measure().is_nan());

        fs::write(&stat, "cpu  150 0 150 900 0 0 0 0 0 0\n").unwrap();
        fs::write(&pstat, "1 (a) S 0 1 1 0 -1 0 0 0 0 0 25 15 0 0 20 0 1 0 1 1 1 1").unwrap();

        // process delta 20 of total delta 200
        let pct = source.measure();
        assert!((pct - 10.0).abs() < 1e-9);

        fs::remove_file(&stat).ok();
        fs::remove_file(&pstat).ok();
    }

    #[test]
    fn test_metric_name_includes_pid() {
        let source = LinuxProcessCpuSource::new();
        let expected = format!("{}_cpu_percent_used", std::process::id());
        assert_eq!(source.metric_name(), expected);
    }

    #[test]
    fn test_collector_with_real_proc_stat() {
        // /proc/stat exists on any Linux host running the tests
        let collector = Collector::new(LinuxCpuSource::new());

        assert!(collector.start());
        assert!(collector.sample().is_nan());
        let second = collector.sample();
        if !second.is_nan() {
            assert!((0.0..=100.0).contains(&second));
        }
        assert_eq!(collector.statistics_results().sample_count, 2);

        assert!(collector.stop());
        assert_eq!(collector.statistics_results().sample_count, 0);
    }
}
