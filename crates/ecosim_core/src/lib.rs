//! # Ecosim Core
//!
//! The discrete-event kernel behind the ecosim ecological simulation.
//!
//! This crate contains:
//! - A logical clock with a time-ordered task queue and O(1) cancellation
//! - A quadrant tree over moving point occupants with resize notifications
//! - Shared ownership of life forms, kept alive by the tasks that act on them
//! - The life-form lifecycle: lazy movement, ageing, perception,
//!   reproduction, encounters and death
//! - Configuration, error types, metrics and structured logging
//!
//! ## Architecture
//!
//! A [`World`] is the one context object of a run. Scheduled tasks are
//! closures over `&mut World`; the only loop is [`World::step`] popping the
//! next due task and running it to completion. Species behaviour plugs in
//! through the [`Species`] trait and never touches kernel state directly.
//!
//! ## Example
//!
//! ```
//! use ecosim_core::{Action, KernelConfig, LifeFormRef, ObjInfo, Point, Species, World};
//!
//! struct Lichen;
//!
//! impl Species for Lichen {
//!     fn species_name(&self) -> &str {
//!         "Lichen"
//!     }
//!
//!     fn encounter(&mut self, _: &mut World, _: &LifeFormRef, _: &ObjInfo) -> Action {
//!         Action::Ignore
//!     }
//! }
//!
//! let mut world = World::new(KernelConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! })
//! .unwrap();
//! let lichen = world.spawn(Box::new(Lichen));
//! world.place(&lichen, Point::new(50.0, 50.0));
//!
//! // ageing runs every 100 time units until the energy is gone
//! while world.step() {}
//! assert!(!lichen.is_alive());
//! assert_eq!(world.now(), 1000.0);
//! ```

/// Logical clock and task queue
pub mod clock;
/// Per-species population summaries and the render boundary
pub mod census;
/// Configuration management for kernel parameters
pub mod config;
/// Error types and result aliases
pub mod error;
/// Shared and weak handles to life forms
pub mod handle;
/// Per-organism state
pub mod lifeform;
/// Counters and structured logging
pub mod metrics;
/// Quadrant tree spatial index
pub mod quadtree;
/// Species behaviour trait and factory registry
pub mod species;
/// The simulation context and every life-form operation
pub mod world;

pub use census::{Census, LifeFormView, RenderSink, SpeciesTally};
pub use clock::{Scheduler, TaskHandle};
pub use config::{EncounterStrategy, KernelConfig};
pub use ecosim_data::{Action, LifeFormId, ObjInfo, Point, SimTime, POINT_TOLERANCE};
pub use error::{KernelError, Result};
pub use handle::{LifeFormRef, WeakLifeForm};
pub use lifeform::{LifeForm, LifeState};
pub use metrics::{init_logging, DeathCause, Metrics};
pub use quadtree::{QuadTree, Region, Resized};
pub use species::{Species, SpeciesFactory, SpeciesRegistry};
pub use world::World;
