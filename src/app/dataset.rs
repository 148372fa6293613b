use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::serde_as;
use speed_tiers::{Species, SpeciesId};

use super::{Error, Result};

/// The on-disk pokedex is a JSON object from dataset key to species record.
/// Entries are kept in file order, which is the order species are aggregated in.
#[serde_as]
#[derive(Deserialize)]
struct PokedexFile(#[serde_as(as = "BTreeMap<_, _>")] Vec<(String, Species)>);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pokedex {
    keys : Vec<String>,
    species : Vec<Species>
}

impl Pokedex {
    pub fn new(entries : impl IntoIterator<Item = (String, Species)>) -> Self {
        let (keys, species) = entries.into_iter().unzip();
        Self { keys, species }
    }

    pub fn load(path : &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let dex = Self::from_json(&text)?;
        tracing::info!("Loaded {} species from {}", dex.species.len(), path.display());
        Ok(dex)
    }

    pub fn from_json(text : &str) -> Result<Self> {
        let PokedexFile(entries) = serde_json::from_str(text)?;
        Ok(Self::new(entries))
    }

    pub fn species(&self) -> &[Species] { &self.species }

    /// Resolves a dex number (every form sharing it), a dataset key or a
    /// display name. Names ignore case and punctuation.
    pub fn find(&self, query : &str) -> Result<Vec<&Species>> {
        let found : Vec<&Species> = match query.trim().parse::<SpeciesId>() {
            Ok(id) => self.species.iter().filter(|species| species.id == id).collect(),
            Err(_) => {
                let wanted = to_id(query);
                self.keys
                    .iter()
                    .zip(&self.species)
                    .filter(|(key, species)| to_id(key) == wanted || to_id(&species.name) == wanted)
                    .map(|(_key, species)| species)
                    .collect()
            }
        };

        if found.is_empty() {
            Err(Error::SpeciesNotFound(query.to_string()))
        }
        else {
            Ok(found)
        }
    }
}

fn to_id(name : &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
