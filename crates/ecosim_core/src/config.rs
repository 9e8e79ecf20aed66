//! Configuration management for kernel parameters.
//!
//! Every tunable that shapes the simulation lives here, grouped the same way
//! as the `[kernel.*]` tables of the run configuration file.
//!
//! ## Example
//!
//! ```toml
//! seed = 42
//!
//! [field]
//! grid_max = 500.0
//!
//! [energy]
//! start_energy = 100.0
//! age_penalty = 10.0
//!
//! [encounter]
//! strategy = "BigGuyWins"
//! ```

use ecosim_data::SimTime;
use serde::{Deserialize, Serialize};

/// How a mutual eat attempt is settled when both parties succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EncounterStrategy {
    /// Flip a coin.
    EvenMoney,
    /// The party with more energy eats.
    #[default]
    BigGuyWins,
    /// The party with less (or equal) energy eats.
    UnderdogIsHere,
    /// The faster party eats.
    FasterGuyWins,
    /// The slower (or equally fast) party eats.
    SlowerGuyWins,
}

/// Geometry of the playing field and the clock resolution.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FieldConfig {
    /// Side of the square field `[0, grid_max) × [0, grid_max)`.
    pub grid_max: f64,
    /// Smallest gap between scheduling a task and running it.
    pub min_delta_time: SimTime,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_max: 500.0,
            min_delta_time: 1.0e-6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnergyConfig {
    pub start_energy: f64,
    /// Anything below this dies.
    pub min_energy: f64,
    pub age_penalty: f64,
    pub age_frequency: SimTime,
    /// `cost = factor * speed^1.5 * elapsed`
    pub movement_cost_factor: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            start_energy: 100.0,
            min_energy: 6.0,
            age_penalty: 10.0,
            age_frequency: 100.0,
            movement_cost_factor: 0.01,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EncounterConfig {
    /// Centers this close (or closer) have collided.
    pub distance: f64,
    /// Paid by both parties of every encounter.
    pub penalty: f64,
    /// Paid by an eater on every successful meal.
    pub eat_cost: f64,
    /// Share of the prey's energy gained after digestion.
    pub eat_efficiency: f64,
    /// Lower bound of the eat success probability.
    pub eat_success_floor: f64,
    pub digestion_time: SimTime,
    pub strategy: EncounterStrategy,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            distance: 1.0,
            penalty: 5.0,
            eat_cost: 5.0,
            eat_efficiency: 0.95,
            eat_success_floor: 0.10,
            digestion_time: 5.0,
            strategy: EncounterStrategy::BigGuyWins,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PerceptionConfig {
    pub min_range: f64,
    pub max_range: f64,
    /// `cost = range / divisor`
    pub cost_divisor: f64,
    pub max_speed: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            min_range: 2.0,
            max_range: 100.0,
            cost_divisor: 20.0,
            max_speed: 10.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Children land at most this far from the parent.
    pub distance: f64,
    /// Fraction of the energy lost by parent and child alike.
    pub cost: f64,
    pub min_interval: SimTime,
    /// Placement tries before the attempt is abandoned.
    pub attempts: u32,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            cost: 0.05,
            min_interval: 1.0,
            attempts: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct KernelConfig {
    pub field: FieldConfig,
    pub energy: EnergyConfig,
    pub encounter: EncounterConfig,
    pub perception: PerceptionConfig,
    pub reproduction: ReproductionConfig,
    /// Seed for the uniform random source; entropy when absent.
    pub seed: Option<u64>,
}

impl KernelConfig {
    /// Eat success probability for an eater with `eater` energy against `prey`.
    #[must_use]
    pub fn eat_success_chance(&self, eater: f64, prey: f64) -> f64 {
        let total = eater + prey;
        let share = if total > 0.0 { eater / total } else { 0.0 };
        share.max(self.encounter.eat_success_floor)
    }

    #[must_use]
    pub fn movement_cost(&self, speed: f64, elapsed: SimTime) -> f64 {
        self.energy.movement_cost_factor * speed.powf(1.5) * elapsed
    }

    #[must_use]
    pub fn perceive_cost(&self, range: f64) -> f64 {
        range / self.perception.cost_divisor
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Field
        anyhow::ensure!(
            self.field.grid_max.is_finite() && self.field.grid_max > 0.0,
            "Field size must be positive"
        );
        anyhow::ensure!(
            self.field.min_delta_time > 0.0,
            "Minimum delta time must be positive"
        );

        // Energy
        anyhow::ensure!(
            self.energy.start_energy > self.energy.min_energy,
            "Start energy must exceed the minimum energy"
        );
        anyhow::ensure!(self.energy.min_energy >= 0.0, "Minimum energy must be non-negative");
        anyhow::ensure!(self.energy.age_penalty >= 0.0, "Age penalty must be non-negative");
        anyhow::ensure!(self.energy.age_frequency > 0.0, "Age frequency must be positive");
        anyhow::ensure!(
            self.energy.movement_cost_factor >= 0.0,
            "Movement cost factor must be non-negative"
        );

        // Encounter
        anyhow::ensure!(self.encounter.distance > 0.0, "Encounter distance must be positive");
        anyhow::ensure!(self.encounter.penalty >= 0.0, "Encounter penalty must be non-negative");
        anyhow::ensure!(self.encounter.eat_cost >= 0.0, "Eat cost must be non-negative");
        anyhow::ensure!(
            self.encounter.eat_efficiency >= 0.0 && self.encounter.eat_efficiency <= 1.0,
            "Eat efficiency must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.encounter.eat_success_floor >= 0.0 && self.encounter.eat_success_floor <= 1.0,
            "Eat success floor must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.encounter.digestion_time >= 0.0,
            "Digestion time must be non-negative"
        );

        // Perception
        anyhow::ensure!(
            self.perception.min_range > 0.0 && self.perception.min_range < self.perception.max_range,
            "Perception range must satisfy 0 < min < max"
        );
        anyhow::ensure!(
            self.perception.cost_divisor > 0.0,
            "Perception cost divisor must be positive"
        );
        anyhow::ensure!(self.perception.max_speed > 0.0, "Max speed must be positive");

        // Reproduction
        anyhow::ensure!(
            self.reproduction.distance > self.encounter.distance,
            "Reproduction distance must exceed the encounter distance"
        );
        anyhow::ensure!(
            self.reproduction.cost >= 0.0 && self.reproduction.cost < 1.0,
            "Reproduction cost must be in [0.0, 1.0)"
        );
        anyhow::ensure!(
            self.reproduction.min_interval >= 0.0,
            "Reproduction interval must be non-negative"
        );
        anyhow::ensure!(
            self.reproduction.attempts > 0,
            "Reproduction needs at least one placement attempt"
        );

        Ok(())
    }

    /// Parses and validates a configuration.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable digest of every parameter that affects simulation outcomes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.field).as_bytes());
        hasher.update(format!("{:?}", self.energy).as_bytes());
        hasher.update(format!("{:?}", self.encounter).as_bytes());
        hasher.update(format!("{:?}", self.perception).as_bytes());
        hasher.update(format!("{:?}", self.reproduction).as_bytes());
        hex::encode(hasher.finalize())
    }
}
