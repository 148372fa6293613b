use std::{fmt, path::PathBuf};

use speed_tiers::{
    BenchmarkScanner, ConfigError, EngineConfig, ScanAxis, Species, SpeciesReport, TierAggregator,
    TierMap
};

use self::{
    dataset::Pokedex,
    output::{file_name_for, OutputSink},
    report::ReportFormatter,
    settings::Settings
};

pub mod dataset;
pub mod output;
pub mod report;
pub mod settings;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no species matches {0:?}")]
    SpeciesNotFound(String)
}

pub type Result<T> = std::result::Result<T, Error>;

/// What a run produced. Failed species requests do not abort a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tiers : usize,
    pub labels : usize,
    pub written : Vec<PathBuf>,
    pub failures : Vec<Error>
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} speed tiers, {} labels, {} files written",
            self.tiers,
            self.labels,
            self.written.len()
        )?;
        if !self.failures.is_empty() {
            write!(f, ", {} species requests skipped", self.failures.len())?;
        }
        Ok(())
    }
}

pub struct SpeedTierApp {
    settings : Settings,
    engine : EngineConfig,
    axes : Vec<ScanAxis>,
    pokedex : Pokedex,
    formatter : ReportFormatter,
    sink : OutputSink
}

impl SpeedTierApp {
    /// Fails on invalid settings before anything is computed.
    pub fn new(settings : Settings, pokedex : Pokedex) -> Result<Self> {
        let engine = settings.engine_config()?;
        Ok(Self {
            axes : settings.axes.enabled(),
            formatter : ReportFormatter::new(settings.json_indent),
            sink : OutputSink::new(settings.output_folder.clone()),
            settings,
            engine,
            pokedex
        })
    }

    pub fn tiers(&self) -> TierMap {
        TierAggregator::new(&self.engine).aggregate(self.pokedex.species())
    }

    pub fn species_report(&self, tiers : &TierMap, species : &Species) -> SpeciesReport {
        BenchmarkScanner::new(&self.engine, tiers).report(species, &self.axes)
    }

    pub fn run(&self, requests : &[String]) -> Result<RunSummary> {
        let tiers = self.tiers();
        let mut summary = RunSummary {
            tiers : tiers.len(),
            labels : tiers.num_labels(),
            ..Default::default()
        };
        tracing::info!(
            "Aggregated {} labels into {} speed tiers at level {}",
            summary.labels,
            summary.tiers,
            self.engine.level()
        );

        let tier_documents = [
            self.settings
                .tiers_json
                .as_ref()
                .map(|name| Ok::<_, Error>((name.clone(), self.formatter.json(&tiers)?)))
                .transpose()?,
            self.settings.tiers_markdown.as_ref().map(|name| {
                (
                    name.clone(),
                    self.formatter
                        .tier_table(&tiers, self.settings.sort_descending)
                )
            })
        ];
        for (name, contents) in tier_documents.into_iter().flatten() {
            summary.written.push(self.sink.write(&name, &contents)?);
        }

        for request in requests {
            match self.pokedex.find(request) {
                Ok(matches) => {
                    for species in matches {
                        let written = self.write_species_report(&tiers, species)?;
                        summary.written.extend(written);
                    }
                },
                Err(error @ Error::SpeciesNotFound(_)) => {
                    tracing::warn!("Skipping species request: {error}");
                    summary.failures.push(error);
                },
                Err(error) => return Err(error)
            }
        }

        for path in &summary.written {
            tracing::info!("Wrote {}", path.display());
        }

        Ok(summary)
    }

    fn write_species_report(&self, tiers : &TierMap, species : &Species) -> Result<Vec<PathBuf>> {
        let report = self.species_report(tiers, species);
        tracing::debug!(
            "{} has {} benchmark entries",
            report.name,
            report.axes.values().map(|axis| axis.len()).sum::<usize>()
        );

        let mut documents = Vec::new();
        if self.settings.species_json {
            documents.push((file_name_for(&report.name, "json"), self.formatter.json(&report)?));
        }
        if self.settings.species_markdown {
            documents.push((
                file_name_for(&report.name, "md"),
                self.formatter.species_table(&report)
            ));
        }

        documents
            .into_iter()
            .map(|(name, contents)| self.sink.write(&name, &contents))
            .collect()
    }
}
