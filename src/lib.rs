#![warn(clippy::all, rust_2018_idioms)]

mod app;

pub use app::{
    dataset::Pokedex,
    output::{file_name_for, OutputSink},
    report::ReportFormatter,
    settings::{AxisToggles, Settings},
    Error, Result, RunSummary, SpeedTierApp
};
