//! Policy seam between the kernel and concrete species.
//!
//! The kernel never decides what an organism wants; it asks the species
//! through [`Species`] and enforces the consequences. New species register a
//! factory under their name so populations can be built from configuration.

use crate::error::{KernelError, Result};
use crate::handle::LifeFormRef;
use crate::world::World;
use ecosim_data::{Action, ObjInfo};
use std::any::Any;
use std::collections::BTreeMap;

/// Object-safe access to `Any`, so handles can narrow to a concrete species.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub trait Species: AsAny {
    /// Grouping key. Read once when the life form is created.
    fn species_name(&self) -> &str;

    /// Name used in reports; by default the species name.
    fn player_name(&self) -> String {
        self.species_name().to_string()
    }

    /// Decide what to do about a life form we just bumped into.
    fn encounter(&mut self, world: &mut World, me: &LifeFormRef, other: &ObjInfo) -> Action;

    /// Called once the life form is alive in the field.
    ///
    /// This is the earliest point at which it may move, perceive or reproduce.
    fn on_birth(&mut self, _world: &mut World, _me: &LifeFormRef) {}

    /// Single-character marker used by render sinks.
    fn glyph(&self) -> char {
        '*'
    }
}

pub type SpeciesFactory = Box<dyn Fn() -> Box<dyn Species>>;

/// Factories keyed by species name.
#[derive(Default)]
pub struct SpeciesRegistry {
    creators: BTreeMap<String, SpeciesFactory>,
}

impl SpeciesRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Species> + 'static,
    {
        self.creators.insert(name.into(), Box::new(factory));
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn Species>> {
        self.creators
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| KernelError::unknown_species(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }
}
