use std::{
    collections::BTreeMap,
    iter::{self, StepBy},
    ops::RangeInclusive
};

use contracts::debug_ensures;
use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    stat, EngineConfig, LookbackMode, Nature, Species, Spread, StatType, TierMap, EV_STEP,
    MAX_EV, MAX_IV
};

/// Investment value (EV or IV, depending on the axis) to the entry it produced.
pub type AxisReport = BTreeMap<u16, BenchmarkEntry>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Investment {
    Ev,
    Iv
}

/// One monotonic investment curve scanned per species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAxis {
    PositiveEv,
    NeutralEv,
    NeutralIv,
    NegativeIv
}

impl ScanAxis {
    pub const ALL : [ScanAxis; 4] = [
        ScanAxis::PositiveEv,
        ScanAxis::NeutralEv,
        ScanAxis::NeutralIv,
        ScanAxis::NegativeIv
    ];

    pub const fn nature(self) -> Nature {
        match self {
            ScanAxis::PositiveEv => Nature::Positive,
            ScanAxis::NeutralEv | ScanAxis::NeutralIv => Nature::Neutral,
            ScanAxis::NegativeIv => Nature::Negative
        }
    }

    pub const fn investment(self) -> Investment {
        match self {
            ScanAxis::PositiveEv | ScanAxis::NeutralEv => Investment::Ev,
            ScanAxis::NeutralIv | ScanAxis::NegativeIv => Investment::Iv
        }
    }

    /// The key the axis is serialized under.
    pub const fn name(self) -> &'static str {
        match self {
            ScanAxis::PositiveEv => "positive_ev",
            ScanAxis::NeutralEv => "neutral_ev",
            ScanAxis::NeutralIv => "neutral_iv",
            ScanAxis::NegativeIv => "negative_iv"
        }
    }

    /// Only a non-neutral nature can skip a stat value between two steps.
    pub const fn jump_eligible(self) -> bool { !matches!(self.nature(), Nature::Neutral) }

    pub fn steps(self) -> StepBy<RangeInclusive<u16>> {
        match self.investment() {
            Investment::Ev => (0..=MAX_EV).step_by(EV_STEP as usize),
            Investment::Iv => (0..=MAX_IV as u16).step_by(1)
        }
    }

    /// EV axes keep a perfect IV, IV axes keep zero EVs. `investment` comes
    /// from `steps`.
    fn spread_at(self, investment : u16) -> Spread {
        match self.investment() {
            Investment::Ev => Spread::new(MAX_IV, investment, self.nature()),
            Investment::Iv => Spread::new(investment as u8, 0, self.nature())
        }
    }
}

/// Fields are declared in key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BenchmarkEntry {
    pub benchmark : Vec<String>,
    pub jump : bool,
    pub speedties : Vec<String>,
    pub stat : StatType,
    /// The spread reaching `stat`, rendered by the species table.
    #[serde(skip)]
    pub spread : Spread
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeciesReport {
    pub name : String,
    pub axes : BTreeMap<ScanAxis, AxisReport>
}

#[derive(Serialize)]
#[serde(untagged)]
enum ReportField<'r> {
    Name(&'r str),
    Axis(&'r AxisReport)
}

impl Serialize for SpeciesReport {
    /// Top level keys are sorted like every other key in the report.
    fn serialize<S : Serializer>(&self, serializer : S) -> Result<S::Ok, S::Error> {
        iter::once(("name", ReportField::Name(&self.name)))
            .chain(
                self.axes
                    .iter()
                    .map(|(axis, report)| (axis.name(), ReportField::Axis(report)))
            )
            .collect::<BTreeMap<_, _>>()
            .serialize(serializer)
    }
}

fn strictly_increasing(report : &AxisReport) -> bool {
    report
        .values()
        .map(|entry| entry.stat)
        .tuple_windows()
        .all(|(lower, higher)| lower < higher)
}

/// Finds the smallest investments that outspeed entries of a finished tier map.
pub struct BenchmarkScanner<'a> {
    config : &'a EngineConfig,
    tiers : &'a TierMap
}

impl<'a> BenchmarkScanner<'a> {
    pub fn new(config : &'a EngineConfig, tiers : &'a TierMap) -> Self { Self { config, tiers } }

    pub fn report(&self, species : &Species, axes : &[ScanAxis]) -> SpeciesReport {
        SpeciesReport {
            name : species.name.clone(),
            axes : axes
                .iter()
                .map(|axis| (*axis, self.scan(species, *axis)))
                .collect()
        }
    }

    #[debug_ensures(strictly_increasing(&ret))]
    pub fn scan(&self, species : &Species, axis : ScanAxis) -> AxisReport {
        let mut report = AxisReport::new();
        let mut last_value : Option<StatType> = None;

        for investment in axis.steps() {
            let spread = axis.spread_at(investment);
            let current = self.stat(species, &spread);

            if last_value.map_or(false, |last| current <= last) {
                continue;
            }

            let jump = axis.jump_eligible() && last_value.map_or(false, |last| current - last > 1);

            let mut benchmark = Vec::new();
            if jump {
                benchmark.extend_from_slice(self.labels_below(current, 2));
            }
            let lookback = self.lookback_value(species, axis, &spread, current);
            benchmark.extend_from_slice(self.labels_below(lookback, 1));

            if !benchmark.is_empty() {
                report.insert(investment, BenchmarkEntry {
                    benchmark,
                    jump,
                    speedties : self.tiers.labels(current).to_vec(),
                    stat : current,
                    spread
                });
            }

            last_value = Some(current);
        }

        report
    }

    fn stat(&self, species : &Species, spread : &Spread) -> StatType {
        stat(
            species.base_speed(),
            self.config.level(),
            spread.iv,
            spread.ev,
            spread.nature
        )
    }

    fn lookback_value(
        &self,
        species : &Species,
        axis : ScanAxis,
        spread : &Spread,
        current : StatType
    ) -> StatType {
        match (self.config.lookback(), axis) {
            (LookbackMode::PositiveNature, ScanAxis::NegativeIv) => self.stat(species, &Spread {
                nature : Nature::Positive,
                ..*spread
            }),
            _ => current
        }
    }

    fn labels_below(&self, value : StatType, distance : StatType) -> &'a [String] {
        value
            .checked_sub(distance)
            .map(|below| self.tiers.labels(below))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        tests::{default_spreads, species},
        TierAggregator
    };

    fn tiers(entries : &[(StatType, &str)]) -> TierMap {
        let mut tiers = TierMap::new();
        for (stat, label) in entries {
            tiers.push(*stat, label.to_string());
        }
        tiers
    }

    fn level(level : u16) -> EngineConfig {
        EngineConfig::new(level, default_spreads(), vec![0]).unwrap()
    }

    #[test]
    fn axes_cover_their_investment_ranges() {
        assert_eq!(ScanAxis::PositiveEv.steps().count(), 64);
        assert_eq!(ScanAxis::NeutralEv.steps().last(), Some(252));
        assert_eq!(ScanAxis::NeutralIv.steps().count(), 32);
        assert_eq!(ScanAxis::NegativeIv.steps().last(), Some(31));
        assert_eq!(
            ScanAxis::PositiveEv.spread_at(100),
            Spread::new(31, 100, Nature::Positive)
        );
        assert_eq!(
            ScanAxis::NegativeIv.spread_at(7),
            Spread::new(7, 0, Nature::Negative)
        );
        assert!(ScanAxis::PositiveEv.jump_eligible());
        assert!(ScanAxis::NegativeIv.jump_eligible());
        assert!(!ScanAxis::NeutralEv.jump_eligible());
        assert!(!ScanAxis::NeutralIv.jump_eligible());
    }

    #[test]
    fn skipped_value_looks_two_back() {
        // Level 100, base 30, positive nature, 31 IVs:
        // 105, 106, 107, 108 (12 EVs), 110 (16 EVs), 111 (20 EVs), 112, ...
        let config = level(100);
        let tiers = tiers(&[(108, "b"), (109, "a"), (110, "tie")]);
        let report = BenchmarkScanner::new(&config, &tiers)
            .scan(&species(1, "Slowpoke", 30), ScanAxis::PositiveEv);

        assert_eq!(report.keys().copied().collect::<Vec<_>>(), [16, 20]);
        assert_eq!(report[&16], BenchmarkEntry {
            benchmark : vec!["b".to_string(), "a".to_string()],
            jump : true,
            speedties : vec!["tie".to_string()],
            stat : 110,
            spread : Spread::new(31, 16, Nature::Positive)
        });
        assert_eq!(report[&20], BenchmarkEntry {
            benchmark : vec!["tie".to_string()],
            jump : false,
            speedties : vec![],
            stat : 111,
            spread : Spread::new(31, 20, Nature::Positive)
        });
    }

    #[test]
    fn steps_without_anything_below_are_omitted() {
        let config = level(50);
        let tiers = tiers(&[(500, "far away")]);
        let scanner = BenchmarkScanner::new(&config, &tiers);
        for axis in ScanAxis::ALL {
            assert!(scanner.scan(&species(1, "Mew", 100), axis).is_empty());
        }
    }

    #[test]
    fn ties_are_not_recorded_twice() {
        // At level 50 neutral EVs raise the stat every other step.
        let config = level(50);
        let tiers = tiers(&[(120, "x"), (121, "y")]);
        let report = BenchmarkScanner::new(&config, &tiers)
            .scan(&species(1, "Mew", 100), ScanAxis::NeutralEv);

        // 31/0 reaches 120, 31/4 and 31/8 reach 121, 31/12 reaches 122.
        assert_eq!(report.keys().copied().collect::<Vec<_>>(), [4, 12]);
        assert_eq!(report[&4].benchmark, ["x"]);
        assert_eq!(report[&4].speedties, ["y"]);
        assert_eq!(report[&12].benchmark, ["y"]);
        assert!(report[&12].speedties.is_empty());
    }

    #[test]
    fn neutral_axes_never_jump() {
        let config = level(100);
        let roster = (1..=255)
            .map(|base| species(base as i32, "Any", base))
            .collect::<Vec<_>>();
        let tiers = TierAggregator::new(&config).aggregate(&roster);
        let scanner = BenchmarkScanner::new(&config, &tiers);

        for subject in roster.iter().step_by(17) {
            for axis in [ScanAxis::NeutralEv, ScanAxis::NeutralIv] {
                assert!(scanner.scan(subject, axis).values().all(|entry| !entry.jump));
            }
        }
    }

    #[test]
    fn recorded_stats_strictly_increase() {
        let config = level(50);
        let roster = (20..=200)
            .map(|base| species(base as i32, "Any", base))
            .collect::<Vec<_>>();
        let tiers = TierAggregator::new(&config).aggregate(&roster);
        let scanner = BenchmarkScanner::new(&config, &tiers);

        for subject in roster.iter().step_by(9) {
            for axis in ScanAxis::ALL {
                let report = scanner.scan(subject, axis);
                assert!(!report.is_empty());
                assert!(strictly_increasing(&report));
            }
        }
    }

    #[test]
    fn negative_iv_lookback_follows_own_curve_by_default() {
        // Level 50, base 100, negative nature reaches 99 at 10 IVs; positive
        // nature reaches 121 at the same IV.
        let config = level(50);
        let tiers = tiers(&[(120, "positive neighbour")]);
        let report = BenchmarkScanner::new(&config, &tiers)
            .scan(&species(1, "Mew", 100), ScanAxis::NegativeIv);

        assert!(report.is_empty());
    }

    #[test]
    fn legacy_negative_iv_lookback_uses_positive_curve() {
        let config = level(50).with_lookback(LookbackMode::PositiveNature);
        let tiers = tiers(&[(120, "positive neighbour")]);
        let scanner = BenchmarkScanner::new(&config, &tiers);
        let report = scanner.scan(&species(1, "Mew", 100), ScanAxis::NegativeIv);

        assert_eq!(report.keys().copied().collect::<Vec<_>>(), [10]);
        assert_eq!(report[&10].stat, 99);
        assert_eq!(report[&10].benchmark, ["positive neighbour"]);

        // Other axes are untouched by the legacy lookback.
        assert!(scanner
            .scan(&species(1, "Mew", 100), ScanAxis::NeutralIv)
            .is_empty());
    }

    #[test]
    fn report_contains_requested_axes_only() {
        let config = level(50);
        let roster = vec![species(94, "Gengar", 110), species(59, "Arcanine", 95)];
        let tiers = TierAggregator::new(&config).aggregate(&roster);
        let report = BenchmarkScanner::new(&config, &tiers)
            .report(&roster[0], &[ScanAxis::PositiveEv, ScanAxis::NegativeIv]);

        assert_eq!(report.name, "Gengar");
        assert_eq!(
            report.axes.keys().copied().collect::<Vec<_>>(),
            [ScanAxis::PositiveEv, ScanAxis::NegativeIv]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "Gengar");
        assert!(json.get("positive_ev").is_some());
        assert!(json.get("neutral_ev").is_none());
    }

    #[test]
    fn species_json_keys_are_sorted() {
        let entry = |benchmark : &str, stat, spread| BenchmarkEntry {
            benchmark : vec![benchmark.to_string()],
            jump : false,
            speedties : vec![],
            stat,
            spread
        };
        let mut axes = BTreeMap::new();
        axes.insert(
            ScanAxis::PositiveEv,
            [(4, entry("31/0 Mew", 121, ScanAxis::PositiveEv.spread_at(4)))].into_iter().collect()
        );
        axes.insert(
            ScanAxis::NegativeIv,
            [(0, entry("0/0- Slowbro", 94, ScanAxis::NegativeIv.spread_at(0)))]
                .into_iter()
                .collect()
        );
        axes.insert(ScanAxis::NeutralEv, AxisReport::new());
        let report = SpeciesReport {
            name : "Mew".to_string(),
            axes
        };

        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"name":"Mew","negative_iv":{"0":{"benchmark":["0/0- Slowbro"],"jump":false,"speedties":[],"stat":94}},"neutral_ev":{},"positive_ev":{"4":{"benchmark":["31/0 Mew"],"jump":false,"speedties":[],"stat":121}}}"#
        );
    }

    #[test]
    fn entries_carry_the_spread_that_reached_them() {
        let config = level(100);
        let tiers = tiers(&[(108, "b"), (109, "a"), (110, "tie")]);
        let report = BenchmarkScanner::new(&config, &tiers)
            .scan(&species(1, "Slowpoke", 30), ScanAxis::PositiveEv);

        for (investment, entry) in &report {
            assert_eq!(entry.spread, Spread::new(MAX_IV, *investment, Nature::Positive));
        }
    }
}
