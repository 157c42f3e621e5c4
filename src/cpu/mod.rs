//! Linux CPU measurement module
//!
//! Reads CPU utilization from procfs and exposes it as measurement sources
//! for the collector: system-wide active percentage from `/proc/stat` and
//! per-process active percentage from `/proc/<pid>/stat`.

mod proc_stat;
mod sources;

pub use proc_stat::{
    cpu_active_percentage, parse_cpu_times, parse_process_ticks, process_cpu_active_percentage,
    CpuTimes, ProcStatError, ProcessCpuTimes,
};
pub use sources::{LinuxCpuSource, LinuxProcessCpuSource};
