//! Starting populations.
//!
//! A population is a list of `species count` requests. It can come from the
//! `[[population]]` tables of the run config or from a plain text file with
//! one `Name count` pair per line.

use ecosim_core::{KernelError, Result, SpeciesRegistry, World};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PopulationEntry {
    pub species: String,
    pub count: usize,
}

impl PopulationEntry {
    pub fn new(species: impl Into<String>, count: usize) -> Self {
        Self {
            species: species.into(),
            count,
        }
    }
}

/// Parses `Name count` lines. Blank lines and `#` comments are skipped.
pub fn parse_population(text: &str) -> Result<Vec<PopulationEntry>> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [species, count] = tokens.as_slice() else {
            return Err(KernelError::population(format!(
                "line {}: expected `<species> <count>`, got `{line}`",
                number + 1
            )));
        };
        let count = count.parse::<usize>().map_err(|e| {
            KernelError::population(format!("line {}: bad count `{count}`: {e}", number + 1))
        })?;
        entries.push(PopulationEntry::new(*species, count));
    }
    Ok(entries)
}

pub fn load_population(path: impl AsRef<Path>) -> Result<Vec<PopulationEntry>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| KernelError::from(e).with_context(format!("reading {}", path.display())))?;
    parse_population(&text).map_err(|e| e.with_context(path.display().to_string()))
}

/// Creates and places every requested life form at a random free spot.
///
/// All species names are checked before anything is placed. Returns how
/// many life forms made it into the field; a crowded field can leave some
/// requests unplaced.
pub fn populate(
    world: &mut World,
    registry: &SpeciesRegistry,
    entries: &[PopulationEntry],
) -> Result<usize> {
    if let Some(unknown) = entries.iter().find(|e| !registry.contains(&e.species)) {
        return Err(KernelError::unknown_species(&unknown.species));
    }

    let mut placed = 0;
    for entry in entries {
        let mut landed = 0;
        for _ in 0..entry.count {
            let life = world.spawn(registry.create(&entry.species)?);
            if world.place_randomly(&life).is_some() {
                landed += 1;
            }
        }
        if landed < entry.count {
            tracing::warn!(
                species = %entry.species,
                requested = entry.count,
                placed = landed,
                "Field too crowded for the full population"
            );
        }
        placed += landed;
    }
    world.prune_roster();
    tracing::info!(placed, species = entries.len(), "Population created");
    Ok(placed)
}
