//! The top-level run loop: step the world, report a census at a fixed
//! interval and stop when the termination strategy is satisfied.

use crate::config::{RunConfig, SimConfig, TerminationStrategy};
use crate::population::{populate, PopulationEntry};
use crate::species::{register_builtin, Algae, AlgaeParams};
use ecosim_core::{Census, RenderSink, SimTime, SpeciesRegistry, World};
use serde::Serialize;
use std::fmt;

const SPORE_INTERVAL: SimTime = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    HalfExtinct,
    OneSpeciesLeft,
    EventsExhausted,
    TimeLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::HalfExtinct => "half the species are extinct",
            Self::OneSpeciesLeft => "one species left",
            Self::EventsExhausted => "no events left",
            Self::TimeLimit => "time limit reached",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub reason: StopReason,
    pub end_time: SimTime,
    /// Most distinct species alive at any report.
    pub max_species: usize,
    pub reports: usize,
    pub census: Census,
}

pub struct Runner {
    world: World,
    run: RunConfig,
    next_report: SimTime,
    max_species: usize,
    reports: usize,
}

impl Runner {
    /// Wraps an already populated world. Starts the spore drop if enabled.
    pub fn new(mut world: World, run: RunConfig, algae: AlgaeParams) -> Self {
        if run.algae_spores {
            schedule_spores(&mut world, algae);
        }
        let next_report = world.now() + run.report_interval;
        Self {
            world,
            run,
            next_report,
            max_species: 0,
            reports: 0,
        }
    }

    /// Builds the world, registers the built-in species and creates the
    /// configured population plus any `extra` entries.
    pub fn from_config(config: &SimConfig, extra: &[PopulationEntry]) -> anyhow::Result<Self> {
        config.validate()?;
        let mut world = World::new(config.kernel.clone())?;
        let mut registry = SpeciesRegistry::new();
        register_builtin(&mut registry, config.algae, config.hunter.clone());

        let entries: Vec<PopulationEntry> =
            config.population.iter().chain(extra).cloned().collect();
        populate(&mut world, &registry, &entries)?;
        Ok(Self::new(world, config.run.clone(), config.algae))
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Runs to completion, drawing a frame into `sink` at every report.
    pub fn run(&mut self, mut sink: Option<&mut dyn RenderSink>) -> RunSummary {
        tracing::info!(
            population = self.world.population(),
            pending = self.world.pending_count(),
            termination = ?self.run.termination,
            "Simulation starting"
        );
        let reason = match self.report(sink.as_deref_mut()) {
            Some(reason) => reason,
            None => self.step_until_stopped(sink),
        };

        let census = self.world.census();
        tracing::info!(
            time = self.world.now(),
            %reason,
            living = census.living,
            reports = self.reports,
            "Simulation complete"
        );
        self.world.metrics.log_summary(self.world.now());
        RunSummary {
            reason,
            end_time: self.world.now(),
            max_species: self.max_species,
            reports: self.reports,
            census,
        }
    }

    fn step_until_stopped(&mut self, mut sink: Option<&mut dyn RenderSink>) -> StopReason {
        loop {
            if self.world.now() > self.run.max_time {
                break StopReason::TimeLimit;
            }
            if !self.world.step() {
                break StopReason::EventsExhausted;
            }
            if self.world.now() >= self.next_report {
                while self.next_report <= self.world.now() {
                    self.next_report += self.run.report_interval;
                }
                if let Some(reason) = self.report(sink.as_deref_mut()) {
                    break reason;
                }
            }
        }
    }

    /// Logs a census, draws a frame and checks the termination strategy.
    fn report(&mut self, sink: Option<&mut (dyn RenderSink + '_)>) -> Option<StopReason> {
        // spores that found no room were spawned but never placed
        self.world.prune_roster();
        let census = self.world.census();
        self.reports += 1;
        self.max_species = self.max_species.max(census.species_alive());
        tracing::info!(
            time = census.time,
            living = census.living,
            species = census.species_alive(),
            pending = census.pending_tasks,
            "Census"
        );
        for (rank, tally) in census.species.iter().enumerate() {
            tracing::debug!(
                rank = rank + 1,
                species = %tally.name,
                count = tally.count,
                energy = tally.total_energy,
                "Species standing"
            );
        }
        if let Some(sink) = sink {
            self.world.render(sink);
        }
        self.stop_reason(&census)
    }

    fn stop_reason(&self, census: &Census) -> Option<StopReason> {
        let alive = census.species_alive();
        match self.run.termination {
            TerminationStrategy::RunTillHalfExtinct if alive <= self.max_species / 2 => {
                Some(StopReason::HalfExtinct)
            }
            TerminationStrategy::RunTillOneSpeciesLeft if alive <= 2 => {
                Some(StopReason::OneSpeciesLeft)
            }
            _ => None,
        }
    }
}

/// Drops a spore every time unit for as long as anything else is pending.
fn schedule_spores(world: &mut World, algae: AlgaeParams) {
    world.schedule(SPORE_INTERVAL, move |world| {
        if Algae::create_spontaneously(world, algae).is_none() {
            tracing::debug!(time = world.now(), "No room for a spore");
        }
        if world.pending_count() > 1 {
            schedule_spores(world, algae);
        }
    });
}
