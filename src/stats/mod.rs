//! Streaming statistics module
//!
//! Single-pass, constant-memory aggregation of scalar measurements using
//! Welford's online algorithm.

mod accumulator;

pub use accumulator::{StatisticsAccumulator, StatisticsSnapshot};
