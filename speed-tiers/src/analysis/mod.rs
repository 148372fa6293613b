use contracts::debug_ensures;
use itertools::iproduct;

use crate::{apply_stage, label, stat, EngineConfig, Species, StatType, TierMap};

pub mod benchmark;

/// Builds the global speed tiers from every allowed species, spread and stage.
pub struct TierAggregator<'c> {
    config : &'c EngineConfig
}

impl<'c> TierAggregator<'c> {
    pub fn new(config : &'c EngineConfig) -> Self { Self { config } }

    /// Every (stat, label) pair in insertion order: species first, then
    /// spreads, then stages.
    pub fn placements<'s>(
        &'s self,
        species : &'s [Species]
    ) -> impl Iterator<Item = (StatType, String)> + 's {
        let allowed = species
            .iter()
            .filter(move |species| self.config.filter().allows(species.id));

        iproduct!(allowed, self.config.spreads(), self.config.stages()).map(
            move |(species, spread, stage)| {
                let unboosted = stat(
                    species.base_speed(),
                    self.config.level(),
                    spread.iv,
                    spread.ev,
                    spread.nature
                );
                (
                    apply_stage(unboosted, *stage),
                    label(spread, Some(&species.name), Some(*stage))
                )
            }
        )
    }

    #[debug_ensures(ret.num_labels() == self.expected_labels(species))]
    pub fn aggregate(&self, species : &[Species]) -> TierMap {
        let mut tiers = TierMap::new();
        for (stat, label) in self.placements(species) {
            tiers.push(stat, label);
        }
        tiers
    }

    fn expected_labels(&self, species : &[Species]) -> usize {
        species
            .iter()
            .filter(|species| self.config.filter().allows(species.id))
            .count()
            * self.config.spreads().len()
            * self.config.stages().len()
    }
}
