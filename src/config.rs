//! Run configuration: kernel parameters, species parameters, the starting
//! population and when to stop.

use crate::population::PopulationEntry;
use crate::species::{AlgaeParams, HunterParams};
use ecosim_core::{KernelConfig, KernelError, SimTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationStrategy {
    /// Stop once half the species ever seen have died out.
    #[default]
    RunTillHalfExtinct,
    /// Stop once algae and a single other species remain.
    RunTillOneSpeciesLeft,
    /// Keep going until nothing is left to do (or time runs out).
    RunTillEventsExhausted,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RunConfig {
    pub termination: TerminationStrategy,
    pub max_time: SimTime,
    /// Simulated time between census reports.
    pub report_interval: SimTime,
    /// Drop a fresh alga into the field every time unit.
    pub algae_spores: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            termination: TerminationStrategy::RunTillHalfExtinct,
            max_time: 50_000.0,
            report_interval: 1.0,
            algae_spores: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub run: RunConfig,
    pub kernel: KernelConfig,
    pub algae: AlgaeParams,
    pub hunter: HunterParams,
    pub population: Vec<PopulationEntry>,
}

impl SimConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.kernel.validate()?;

        anyhow::ensure!(
            self.run.max_time.is_finite() && self.run.max_time > 0.0,
            "Max time must be positive"
        );
        anyhow::ensure!(
            self.run.report_interval > 0.0,
            "Report interval must be positive"
        );

        anyhow::ensure!(self.algae.photo_period > 0.0, "Photosynthesis period must be positive");
        anyhow::ensure!(self.algae.photo_gain >= 0.0, "Photosynthesis gain must be non-negative");

        anyhow::ensure!(self.hunter.hunt_period > 0.0, "Hunt period must be positive");
        anyhow::ensure!(
            self.hunter.min_speed >= 0.0 && self.hunter.min_speed <= self.hunter.max_speed,
            "Hunter speeds must satisfy 0 <= min <= max"
        );
        anyhow::ensure!(self.hunter.spawn_health > 0.0, "Hunter spawn health must be positive");

        for entry in &self.population {
            anyhow::ensure!(
                !entry.species.is_empty(),
                "Population entries need a species name"
            );
        }
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| KernelError::from(e).with_context(format!("reading {}", path.display())))?;
        let config = Self::from_toml(&content).map_err(KernelError::from)?;
        config
            .validate()
            .map_err(|e| KernelError::config(format!("{}: {e:#}", path.display())))?;
        Ok(config)
    }
}
