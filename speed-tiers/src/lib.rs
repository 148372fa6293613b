//! Speed stat formula, speed tier aggregation and benchmark detection.

mod analysis;
mod config;
mod interface;

pub use analysis::{
    benchmark::{AxisReport, BenchmarkEntry, BenchmarkScanner, Investment, ScanAxis, SpeciesReport},
    TierAggregator
};
pub use config::{ConfigError, EngineConfig, LookbackMode, SpeciesFilter};
pub use interface::*;
