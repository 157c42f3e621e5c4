//! Periodic sampling module
//!
//! Background task that polls a collector's measurement source on a fixed
//! period and periodically logs the aggregate status.

mod runner;

pub use runner::{Sampler, SamplerConfig};
