use itertools::Itertools;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use speed_tiers::{SpeciesReport, TierMap};

use super::Result;

const TIER_HEADER : [&str; 2] = [
    "| Speed | Amount | Benchmarks |",
    "| ----- | ------ | ---------- |"
];

const SPECIES_HEADER : [&str; 2] = [
    "| Spread | Speed | Jump | Benchmarks | Speed Ties |",
    "| ------ | ----- | ---- | ---------- | ---------- |"
];

/// Renders tier maps and species reports into their document formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportFormatter {
    json_indent : usize
}

impl Default for ReportFormatter {
    fn default() -> Self { Self { json_indent : 2 } }
}

impl ReportFormatter {
    pub fn new(json_indent : usize) -> Self { Self { json_indent } }

    /// Indented JSON with sorted keys. Stat and investment keys sort numerically.
    pub fn json<T : Serialize>(&self, value : &T) -> Result<String> {
        let indent = " ".repeat(self.json_indent);
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        value.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn tier_table(&self, tiers : &TierMap, descending : bool) -> String {
        TIER_HEADER
            .into_iter()
            .map(str::to_string)
            .chain(tiers.sorted(descending).into_iter().map(|(speed, labels)| {
                format!("| {speed} | {} | {} |", labels.len(), labels.join(", "))
            }))
            .join("\n")
    }

    pub fn species_table(&self, report : &SpeciesReport) -> String {
        let rows = report.axes.values().flat_map(|entries| {
            entries.values().rev().map(|entry| {
                format!(
                    "| {} | {} | {} | {} | {} |",
                    entry.spread,
                    entry.stat,
                    if entry.jump { "Yes" } else { "No" },
                    entry.benchmark.join(", "),
                    entry.speedties.join(", ")
                )
            })
        });

        SPECIES_HEADER
            .into_iter()
            .map(str::to_string)
            .chain(rows)
            .join("\n")
    }
}
