//! procfs CPU accounting parsers
//!
//! Parses the aggregate `cpu` line of `/proc/stat` and the per-process
//! `/proc/<pid>/stat` record, and derives active-CPU percentages from pairs
//! of samples taken over an interval.

use thiserror::Error;

/// Errors from reading or parsing procfs CPU accounting data.
#[derive(Error, Debug)]
pub enum ProcStatError {
    #[error("no aggregate cpu line found in /proc/stat contents")]
    MissingCpuLine,

    #[error("malformed cpu line: {0:?}")]
    MalformedCpuLine(String),

    #[error("malformed process stat record: {0:?}")]
    MalformedProcessStat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Jiffy counters from the aggregate `cpu` line of `/proc/stat`.
///
/// Counters are cumulative since boot; utilization over an interval is
/// derived from the difference of two samples via
/// [`cpu_active_percentage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    /// Ticks spent doing work (everything except idle and iowait).
    pub fn active_ticks(&self) -> u64 {
        self.user + self.nice + self.system + self.irq + self.softirq + self.steal
    }

    /// Ticks spent idle or waiting on IO.
    pub fn idle_ticks(&self) -> u64 {
        self.idle + self.iowait
    }

    /// All accounted ticks.
    pub fn total_ticks(&self) -> u64 {
        self.active_ticks() + self.idle_ticks()
    }
}

/// Parse the aggregate `cpu` line out of `/proc/stat` contents.
///
/// Kernels append extra fields (guest, guest_nice) over time; the first
/// eight are required and the rest are ignored.
pub fn parse_cpu_times(contents: &str) -> Result<CpuTimes, ProcStatError> {
    let line = contents
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or(ProcStatError::MissingCpuLine)?;

    let mut fields = line.split_whitespace().skip(1);
    let mut next = || -> Result<u64, ProcStatError> {
        fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| ProcStatError::MalformedCpuLine(line.to_string()))
    };

    Ok(CpuTimes {
        user: next()?,
        nice: next()?,
        system: next()?,
        idle: next()?,
        iowait: next()?,
        irq: next()?,
        softirq: next()?,
        steal: next()?,
    })
}

/// Percentage of CPU time spent active between two samples.
///
/// Returns `NaN` when no ticks elapsed between the samples (also covers a
/// counter reset, where the subtraction saturates to zero).
pub fn cpu_active_percentage(prev: &CpuTimes, next: &CpuTimes) -> f64 {
    let total_delta = next.total_ticks().saturating_sub(prev.total_ticks());
    if total_delta == 0 {
        return f64::NAN;
    }
    let active_delta = next.active_ticks().saturating_sub(prev.active_ticks());
    100.0 * active_delta as f64 / total_delta as f64
}

/// One sample of a process's CPU accounting: the process's own active
/// ticks (`utime + stime`) denominated in total system ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessCpuTimes {
    pub process_ticks: u64,
    pub total_ticks: u64,
}

/// Extract `utime + stime` from a `/proc/<pid>/stat` record.
///
/// The comm field may contain spaces and parentheses, so fields are taken
/// after the last `)`: state, ppid, ..., with utime and stime at offsets
/// 11 and 12.
pub fn parse_process_ticks(contents: &str) -> Result<u64, ProcStatError> {
    let malformed = || ProcStatError::MalformedProcessStat(contents.trim_end().to_string());

    let after_comm = contents
        .rfind(')')
        .map(|i| &contents[i + 1..])
        .ok_or_else(malformed)?;

    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    let utime: u64 = fields.get(11).and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
    let stime: u64 = fields.get(12).and_then(|f| f.parse().ok()).ok_or_else(malformed)?;

    Ok(utime + stime)
}

/// Percentage of total system CPU time this process used between two
/// samples. `NaN` when no system ticks elapsed.
pub fn process_cpu_active_percentage(prev: &ProcessCpuTimes, next: &ProcessCpuTimes) -> f64 {
    let total_delta = next.total_ticks.saturating_sub(prev.total_ticks);
    if total_delta == 0 {
        return f64::NAN;
    }
    let process_delta = next.process_ticks.saturating_sub(prev.process_ticks);
    100.0 * process_delta as f64 / total_delta as f64
}
