use std::{collections::BTreeMap, fmt, ops::Deref};

use cached::proc_macro::cached;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TryFromInto};

use crate::config::ConfigError;

pub type StatType = u16;
pub type LevelType = u16;
pub type StageType = u8;
pub type SpeciesId = i32;

pub const MAX_IV : u8 = 31;
pub const MAX_EV : u16 = 252;
pub const EV_STEP : u16 = 4;
pub const MAX_LEVEL : LevelType = 100;
pub const MAX_STAGE : StageType = 6;

const NATURE_TOLERANCE : f64 = 1e-9;

/// The three ways a nature can affect a single stat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nature {
    Positive,
    #[default]
    Neutral,
    Negative
}

impl Nature {
    pub const fn percent(self) -> u32 {
        match self {
            Nature::Positive => 110,
            Nature::Neutral => 100,
            Nature::Negative => 90
        }
    }

    pub fn multiplier(self) -> f64 { self.percent() as f64 / 100.0 }

    /// Floors `value * multiplier` without going through floating point.
    pub const fn apply(self, value : u32) -> u32 { value * self.percent() / 100 }

    pub const fn suffix(self) -> &'static str {
        match self {
            Nature::Positive => "+",
            Nature::Neutral => "",
            Nature::Negative => "-"
        }
    }
}

impl TryFrom<f64> for Nature {
    type Error = ConfigError;

    fn try_from(multiplier : f64) -> Result<Self, Self::Error> {
        [Nature::Positive, Nature::Neutral, Nature::Negative]
            .into_iter()
            .find(|nature| (nature.multiplier() - multiplier).abs() < NATURE_TOLERANCE)
            .ok_or(ConfigError::UnknownNature(multiplier))
    }
}

impl From<Nature> for f64 {
    fn from(nature : Nature) -> Self { nature.multiplier() }
}

/// A single IV/EV/nature investment into the speed stat.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spread {
    #[serde(alias = "ivs")]
    pub iv : u8,
    #[serde(alias = "evs")]
    pub ev : u16,
    #[serde_as(as = "TryFromInto<f64>")]
    pub nature : Nature
}

impl Spread {
    pub const fn new(iv : u8, ev : u16, nature : Nature) -> Self { Self { iv, ev, nature } }
}

impl fmt::Display for Spread {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.iv, self.ev, self.nature.suffix())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(default)]
    pub hp : StatType,
    #[serde(default)]
    pub atk : StatType,
    #[serde(default)]
    pub def : StatType,
    #[serde(default)]
    pub spa : StatType,
    #[serde(default)]
    pub spd : StatType,
    pub spe : StatType
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Species {
    #[serde(rename = "num")]
    pub id : SpeciesId,
    pub name : String,
    #[serde(rename = "baseStats")]
    pub base_stats : BaseStats
}

impl Species {
    pub fn base_speed(&self) -> StatType { self.base_stats.spe }
}

/// `floor(floor((2 * base + iv + floor(ev / 4)) * level / 100 + 5) * nature)`
///
/// Inputs are not range checked, `EngineConfig` is responsible for that.
#[cached(size = 4096)]
pub fn stat(base : StatType, level : LevelType, iv : u8, ev : u16, nature : Nature) -> StatType {
    let pre_nature = core_term(base, level, iv, ev) + 5;
    nature.apply(pre_nature) as StatType
}

pub fn hp_stat(base : StatType, level : LevelType, iv : u8, ev : u16) -> StatType {
    (core_term(base, level, iv, ev) + level as u32 + 10) as StatType
}

fn core_term(base : StatType, level : LevelType, iv : u8, ev : u16) -> u32 {
    (2 * base as u32 + iv as u32 + ev as u32 / 4) * level as u32 / 100
}

/// `floor(stat * (1 + stage / 2))`, a no-op for stage zero.
pub fn apply_stage(stat : StatType, stage : StageType) -> StatType {
    if stage == 0 {
        stat
    }
    else {
        (stat as u32 * (2 + stage as u32) / 2) as StatType
    }
}

/// Renders e.g. `+1 31/252+ Gengar`.
pub fn label(spread : &Spread, species : Option<&str>, stage : Option<StageType>) -> String {
    let mut label = match stage {
        Some(stage) if stage > 0 => format!("+{stage} {spread}"),
        _ => spread.to_string()
    };
    if let Some(name) = species {
        label.push(' ');
        label.push_str(name);
    }
    label
}

/// Append-only multimap from a reached stat value to every label reaching it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierMap {
    tiers : BTreeMap<StatType, Vec<String>>
}

impl Deref for TierMap {
    type Target = BTreeMap<StatType, Vec<String>>;

    fn deref(&self) -> &Self::Target { &self.tiers }
}

impl TierMap {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, stat : StatType, label : String) {
        self.tiers.entry(stat).or_default().push(label);
    }

    pub fn labels(&self, stat : StatType) -> &[String] {
        self.tiers.get(&stat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn num_labels(&self) -> usize { self.tiers.values().map(Vec::len).sum() }

    pub fn sorted(&self, descending : bool) -> Vec<(StatType, &[String])> {
        let mut rows = self
            .tiers
            .iter()
            .map(|(stat, labels)| (*stat, labels.as_slice()))
            .collect::<Vec<_>>();
        if descending {
            rows.reverse();
        }
        rows
    }
}
