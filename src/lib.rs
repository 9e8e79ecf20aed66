//! # Ecosim
//!
//! Runs ecological simulations on top of [`ecosim_core`]: built-in species,
//! starting populations, the report loop and a text renderer.

pub mod config;
pub mod population;
pub mod render;
pub mod runner;
pub mod species;

pub use config::{RunConfig, SimConfig, TerminationStrategy};
pub use population::{load_population, parse_population, populate, PopulationEntry};
pub use render::AsciiGrid;
pub use runner::{RunSummary, Runner, StopReason};
