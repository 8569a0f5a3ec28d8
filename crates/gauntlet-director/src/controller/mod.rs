//! Difficulty control: decision engine, presentation facade and parameter mapping

pub mod director;
pub mod engine;
pub mod params;
