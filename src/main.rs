#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use speed_tiers::LevelType;
use speed_tiers_cli::{Pokedex, Settings, SpeedTierApp};
use tracing_subscriber::EnvFilter;

/// Computes speed tiers for a species dataset and the benchmarks each
/// requested species can hit.
#[derive(Parser)]
#[command(name = "speed-tiers", version, long_about = None)]
struct Cli {
    /// JSON settings file, missing fields keep their defaults
    #[arg(short, long, value_name = "FILE")]
    config : Option<PathBuf>,

    /// Pokedex JSON to read species from
    #[arg(short, long, value_name = "FILE")]
    dataset : Option<PathBuf>,

    /// Folder the reports are written to
    #[arg(short, long, value_name = "DIR")]
    output : Option<PathBuf>,

    #[arg(short, long, value_name = "N")]
    level : Option<LevelType>,

    /// List the slowest tiers first
    #[arg(long)]
    ascending : bool,

    /// Dex numbers, dataset keys or names to write benchmark reports for
    #[arg(value_name = "SPECIES")]
    species : Vec<String>
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("failed to read settings from {}", path.display()))?,
            None => Settings::default()
        };

        if let Some(dataset) = &self.dataset {
            settings.dataset = dataset.clone();
        }
        if let Some(output) = &self.output {
            settings.output_folder = output.clone();
        }
        if let Some(level) = self.level {
            settings.level = level;
        }
        if self.ascending {
            settings.sort_descending = false;
        }

        Ok(settings)
    }
}

fn main() -> Result<()> {
    // Log to stderr (`RUST_LOG=debug` for per-species details).
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    let pokedex = Pokedex::load(&settings.dataset)
        .with_context(|| format!("failed to load species from {}", settings.dataset.display()))?;
    let app = SpeedTierApp::new(settings, pokedex)?;
    let summary = app.run(&cli.species)?;

    // skipped requests were already logged while running
    println!("{summary}");

    Ok(())
}
