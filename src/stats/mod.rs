//! Stats module - Quartiles, clipping bounds, correlation

mod calculator;

pub use calculator::{ClipBounds, StatsCalculator};
