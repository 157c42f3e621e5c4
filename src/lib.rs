//! Sysmetrics
//!
//! Thread-safe streaming statistics collection for Linux system metrics.
//! Folds scalar measurements (CPU utilization samples, or any other
//! resource counter) into running aggregates without retaining the raw
//! samples, behind an explicit start/stop lifecycle.
//!
//! ## Quick start
//!
//! ```no_run
//! use sysmetrics::collector::Collector;
//! use sysmetrics::cpu::LinuxCpuSource;
//!
//! let collector = Collector::new(LinuxCpuSource::new());
//!
//! assert!(collector.start());
//! collector.sample();
//! collector.sample();
//!
//! println!("{}", collector.status_string());
//! collector.stop();
//! ```
//!
//! The collector is safe to share across a sampling thread, a reporting
//! thread, and a control thread; see [`collector::Collector`]. Custom
//! measurement sources implement [`collector::MeasurementSource`] (and
//! [`collector::PeriodicSource`] to work with the [`sampler`]).

pub mod collector;
pub mod cpu;
pub mod sampler;
pub mod stats;

pub use collector::{Collector, MeasurementSource, PeriodicSource};
pub use stats::{StatisticsAccumulator, StatisticsSnapshot};

/// Initialize logging for binaries (env-filtered console output).
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
