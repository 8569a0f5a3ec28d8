//! Player performance metering
//!
//! Counters fed by discrete game events and reset at every evaluation
//! boundary, except for time alive which only ever grows.

pub mod accumulator;

pub use accumulator::{MetricsAccumulator, PerformanceMetrics};
