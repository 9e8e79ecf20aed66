//! Species shipped with the simulator.

pub mod algae;
pub mod hunter;

pub use algae::{Algae, AlgaeParams};
pub use hunter::{Hunter, HunterParams};

use ecosim_core::SpeciesRegistry;

/// Registers every built-in species under its name.
pub fn register_builtin(registry: &mut SpeciesRegistry, algae: AlgaeParams, hunter: HunterParams) {
    registry.register(Algae::NAME, move || Box::new(Algae::new(algae)));
    registry.register(Hunter::NAME, move || Box::new(Hunter::new(hunter.clone())));
}
