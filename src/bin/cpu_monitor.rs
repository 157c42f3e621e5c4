//! CPU Monitor - Standalone sampling daemon
//!
//! Collects system CPU utilization from `/proc/stat` and prints aggregate
//! statistics as JSON until interrupted.
//!
//! Environment variables:
//! - `SYSMETRICS_MEASURE_MS` - Measurement period in ms (default: 1000)
//! - `SYSMETRICS_REPORT_MS` - Snapshot print period in ms (default: 5000)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use tracing::info;

use sysmetrics::collector::Collector;
use sysmetrics::cpu::LinuxCpuSource;
use sysmetrics::sampler::{Sampler, SamplerConfig};

fn env_ms(name: &str, default: u64) -> Duration {
    let ms = std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_millis(ms)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sysmetrics::init_logging();

    info!("Starting CPU monitor");

    let config = SamplerConfig {
        measurement_period: env_ms("SYSMETRICS_MEASURE_MS", 1000),
        report_period: env_ms("SYSMETRICS_REPORT_MS", 5000),
    };
    let report_period = config.report_period;

    let collector = Arc::new(Collector::new(LinuxCpuSource::new()));
    if !collector.start() {
        bail!("failed to start CPU collector (is /proc/stat readable?)");
    }

    let is_running = Arc::new(AtomicBool::new(true));
    let sampler = Sampler::start(Arc::clone(&collector), config, Arc::clone(&is_running));

    // Print a JSON snapshot every report period until Ctrl-C
    let printer_collector = Arc::clone(&collector);
    let printer_running = Arc::clone(&is_running);
    let printer = tokio::spawn(async move {
        while printer_running.load(Ordering::Relaxed) {
            tokio::time::sleep(report_period).await;
            let snapshot = printer_collector.statistics_results();
            match serde_json::to_string(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::warn!("failed to serialize snapshot: {}", e),
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    is_running.store(false, Ordering::Relaxed);
    sampler.await?;
    printer.abort();

    info!("Final: {}", collector.status_string());
    collector.stop();

    Ok(())
}
