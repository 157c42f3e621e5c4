//! Measurement collector module
//!
//! Thread-safe collection of observed measurements with a start/stop
//! lifecycle. Source-specific setup and teardown is supplied through the
//! [`MeasurementSource`] trait.

mod lifecycle;

pub use lifecycle::{Collector, MeasurementSource, PeriodicSource};
