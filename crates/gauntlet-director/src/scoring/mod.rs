//! State discretization, performance score and reward

pub mod encoder;
pub mod performance;

pub use encoder::StateEncoder;
pub use performance::{PerformanceCalculator, PerformanceWeights};
