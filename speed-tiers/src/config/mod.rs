use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{LevelType, SpeciesId, Spread, StageType, MAX_EV, MAX_IV, MAX_LEVEL, MAX_STAGE};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("level {0} is outside of 1..={max}", max = MAX_LEVEL)]
    LevelOutOfRange(LevelType),
    #[error("at least one spread has to be configured")]
    NoSpreads,
    #[error("spread {spread} has an iv above {max}", max = MAX_IV)]
    IvOutOfRange { spread : Spread },
    #[error("spread {spread} has an ev above {max}", max = MAX_EV)]
    EvOutOfRange { spread : Spread },
    #[error("at least one stage has to be configured (use 0 for no boost)")]
    NoStages,
    #[error("stage +{0} is above the maximum of +{max}", max = MAX_STAGE)]
    StageOutOfRange(StageType),
    #[error("nature multiplier {0} is not one of 0.9, 1.0 or 1.1")]
    UnknownNature(f64)
}

/// Which species take part in the tier aggregation.
///
/// Inclusion and exclusion are checked independently, so an id that is in
/// both sets is excluded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesFilter {
    pub include : Option<BTreeSet<SpeciesId>>,
    pub exclude : Option<BTreeSet<SpeciesId>>
}

impl SpeciesFilter {
    pub fn allows(&self, id : SpeciesId) -> bool {
        let excluded = self
            .exclude
            .as_ref()
            .map_or(false, |exclude| exclude.contains(&id));
        let included = self
            .include
            .as_ref()
            .map_or(true, |include| include.contains(&id));
        included && !excluded
    }
}

/// How the benchmark scanner finds the stat value one below the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackMode {
    /// Look one below the value the axis just reached.
    #[default]
    Scanned,
    /// Reproduces the historical report: the negative-nature IV axis looks one
    /// below the positive-nature stat at the same IV instead of its own.
    PositiveNature
}

/// Validated inputs shared by the aggregator and the benchmark scanner.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    level : LevelType,
    spreads : Vec<Spread>,
    stages : Vec<StageType>,
    filter : SpeciesFilter,
    lookback : LookbackMode
}

impl EngineConfig {
    pub fn new(
        level : LevelType,
        spreads : Vec<Spread>,
        stages : Vec<StageType>
    ) -> Result<Self, ConfigError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(ConfigError::LevelOutOfRange(level));
        }
        if spreads.is_empty() {
            return Err(ConfigError::NoSpreads);
        }
        if let Some(spread) = spreads.iter().find(|spread| spread.iv > MAX_IV) {
            return Err(ConfigError::IvOutOfRange { spread : *spread });
        }
        if let Some(spread) = spreads.iter().find(|spread| spread.ev > MAX_EV) {
            return Err(ConfigError::EvOutOfRange { spread : *spread });
        }
        if stages.is_empty() {
            return Err(ConfigError::NoStages);
        }
        if let Some(stage) = stages.iter().find(|stage| **stage > MAX_STAGE) {
            return Err(ConfigError::StageOutOfRange(*stage));
        }

        Ok(Self {
            level,
            spreads,
            stages,
            filter : SpeciesFilter::default(),
            lookback : LookbackMode::default()
        })
    }

    pub fn with_filter(mut self, filter : SpeciesFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_lookback(mut self, lookback : LookbackMode) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn level(&self) -> LevelType { self.level }

    pub fn spreads(&self) -> &[Spread] { &self.spreads }

    pub fn stages(&self) -> &[StageType] { &self.stages }

    pub fn filter(&self) -> &SpeciesFilter { &self.filter }

    pub fn lookback(&self) -> LookbackMode { self.lookback }
}
