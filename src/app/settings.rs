use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf}
};

use serde::{Deserialize, Serialize};
use speed_tiers::{
    ConfigError, EngineConfig, LevelType, LookbackMode, Nature, ScanAxis, SpeciesFilter,
    SpeciesId, Spread, StageType
};

use super::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisToggles {
    pub positive_ev : bool,
    pub neutral_ev : bool,
    pub neutral_iv : bool,
    pub negative_iv : bool
}

impl Default for AxisToggles {
    fn default() -> Self {
        Self {
            positive_ev : true,
            neutral_ev : true,
            neutral_iv : true,
            negative_iv : true
        }
    }
}

impl AxisToggles {
    pub fn enabled(&self) -> Vec<ScanAxis> {
        ScanAxis::ALL
            .into_iter()
            .filter(|axis| match axis {
                ScanAxis::PositiveEv => self.positive_ev,
                ScanAxis::NeutralEv => self.neutral_ev,
                ScanAxis::NeutralIv => self.neutral_iv,
                ScanAxis::NegativeIv => self.negative_iv
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // settings files only need to name the fields they change
pub struct Settings {
    pub dataset : PathBuf,
    /// Use level 100 for Smogon formats.
    pub level : LevelType,
    #[serde(alias = "stat_combinations")]
    pub spreads : Vec<Spread>,
    /// Applied to every spread, 0 is unboosted.
    pub stages : Vec<StageType>,
    pub sort_descending : bool,
    pub species_include : Option<BTreeSet<SpeciesId>>,
    pub species_exclude : Option<BTreeSet<SpeciesId>>,
    pub output_folder : PathBuf,
    pub tiers_json : Option<String>,
    pub tiers_markdown : Option<String>,
    pub species_json : bool,
    pub species_markdown : bool,
    pub json_indent : usize,
    pub axes : AxisToggles,
    pub legacy_negative_iv_lookup : bool
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset : PathBuf::from("data/pokedex.json"),
            level : 50,
            spreads : vec![
                Spread::new(31, 252, Nature::Positive),
                Spread::new(31, 252, Nature::Neutral),
                Spread::new(31, 0, Nature::Neutral),
                Spread::new(0, 0, Nature::Negative)
            ],
            stages : vec![0],
            sort_descending : true,
            species_include : None,
            species_exclude : None,
            output_folder : PathBuf::from("out"),
            tiers_json : Some("tiers.json".to_string()),
            tiers_markdown : Some("TIERS.MD".to_string()),
            species_json : true,
            species_markdown : true,
            json_indent : 2,
            axes : AxisToggles::default(),
            legacy_negative_iv_lookup : false
        }
    }
}

impl Settings {
    pub fn load(path : &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn engine_config(&self) -> std::result::Result<EngineConfig, ConfigError> {
        let lookback = if self.legacy_negative_iv_lookup {
            LookbackMode::PositiveNature
        }
        else {
            LookbackMode::Scanned
        };

        Ok(
            EngineConfig::new(self.level, self.spreads.clone(), self.stages.clone())?
                .with_filter(SpeciesFilter {
                    include : self.species_include.clone(),
                    exclude : self.species_exclude.clone()
                })
                .with_lookback(lookback)
        )
    }
}
