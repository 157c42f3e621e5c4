//! Periodic sampling runner
//!
//! Drives a started collector: samples the measurement source every
//! measurement period and logs the collector status every report period.
//! Runs until the shared running flag flips to false.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::collector::{Collector, PeriodicSource};

/// Sampler configuration
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// How often to poll the measurement source (default: 1s)
    pub measurement_period: Duration,
    /// How often to log the aggregate status (default: 60s)
    pub report_period: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            measurement_period: Duration::from_secs(1),
            report_period: Duration::from_secs(60),
        }
    }
}

/// Periodic sampling driver for a collector
pub struct Sampler;

impl Sampler {
    /// Start the sampling background task.
    ///
    /// Runs until `is_running` becomes false. Every `measurement_period`
    /// the collector samples its source; every `report_period` worth of
    /// ticks the collector status is logged at info level.
    ///
    /// The caller is responsible for having called `collector.start()`:
    /// the task samples regardless, but sources typically return `NaN`
    /// until their setup has run.
    pub fn start<S>(
        collector: Arc<Collector<S>>,
        config: SamplerConfig,
        is_running: Arc<AtomicBool>,
    ) -> tokio::task::JoinHandle<()>
    where
        S: PeriodicSource + Send + 'static,
    {
        tokio::spawn(async move {
            info!(
                "[Sampler] Started (measure every {:?}, report every {:?})",
                config.measurement_period, config.report_period
            );

            let ticks_per_report = (config.report_period.as_millis()
                / config.measurement_period.as_millis().max(1))
            .max(1) as u64;
            let mut tick_counter: u64 = 0;

            while is_running.load(Ordering::Relaxed) {
                tokio::time::sleep(config.measurement_period).await;

                if !is_running.load(Ordering::Relaxed) {
                    break;
                }

                let measurement = collector.sample();
                debug!("[Sampler] measured {}", measurement);

                tick_counter += 1;
                if tick_counter % ticks_per_report == 0 {
                    info!("[Sampler] {}", collector.status_string());
                }
            }

            info!("[Sampler] Stopped");
        })
    }
}
