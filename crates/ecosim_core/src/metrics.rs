//! Counters and structured logging for a simulation run.
//!
//! The kernel is single-threaded, so the counters are plain integers owned
//! by the world rather than atomics.

use std::fmt;
use std::time::{Duration, Instant};

/// Why a life form died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Lost an encounter.
    Eaten,
    /// Energy fell below the minimum after moving, perceiving, meeting or eating.
    Exhaustion,
    /// Upkeep drained the last of its energy.
    Age,
    /// Walked off the playing field.
    OutOfBounds,
    /// Reproduction left too little energy for the child to live.
    Stillborn,
    /// Removed by species code through [`crate::world::World::die`].
    Killed,
}

impl DeathCause {
    pub const ALL: [DeathCause; 6] = [
        DeathCause::Eaten,
        DeathCause::Exhaustion,
        DeathCause::Age,
        DeathCause::OutOfBounds,
        DeathCause::Stillborn,
        DeathCause::Killed,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeathCause::Eaten => "eaten",
            DeathCause::Exhaustion => "exhaustion",
            DeathCause::Age => "age",
            DeathCause::OutOfBounds => "out of bounds",
            DeathCause::Stillborn => "stillborn",
            DeathCause::Killed => "killed",
        };
        f.write_str(s)
    }
}

/// Running totals for one world.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub tasks_run: u64,
    pub tasks_discarded: u64,
    pub births: u64,
    pub encounters: u64,
    pub meals: u64,
    pub abandoned_reproductions: u64,
    pub resize_notifications: u64,
    deaths: [u64; DeathCause::ALL.len()],
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks_run: 0,
            tasks_discarded: 0,
            births: 0,
            encounters: 0,
            meals: 0,
            abandoned_reproductions: 0,
            resize_notifications: 0,
            deaths: [0; DeathCause::ALL.len()],
            start_time: Instant::now(),
        }
    }

    pub fn record_death(&mut self, cause: DeathCause) {
        self.deaths[cause.index()] += 1;
    }

    #[must_use]
    pub fn deaths(&self, cause: DeathCause) -> u64 {
        self.deaths[cause.index()]
    }

    #[must_use]
    pub fn total_deaths(&self) -> u64 {
        self.deaths.iter().sum()
    }

    /// Wall-clock time since the world was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Emits the totals as a single `info` event.
    pub fn log_summary(&self, now: f64) {
        tracing::info!(
            time = now,
            tasks_run = self.tasks_run,
            tasks_discarded = self.tasks_discarded,
            births = self.births,
            deaths = self.total_deaths(),
            eaten = self.deaths(DeathCause::Eaten),
            encounters = self.encounters,
            meals = self.meals,
            abandoned_reproductions = self.abandoned_reproductions,
            wall_ms = self.elapsed().as_millis() as u64,
            "Simulation totals"
        );
    }
}

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
