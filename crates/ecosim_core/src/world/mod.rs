//! The simulation context.
//!
//! A [`World`] owns the clock, the spatial index, the roster and the random
//! source for one run. Every kernel operation is a method on it, and every
//! scheduled task receives it mutably when it fires.
//!
//! Operations on life forms follow the same rules throughout:
//! - a dead life form is silently ignored (two resolutions in the same
//!   instant may both decide to kill it);
//! - a dormant one, not yet placed in the field, is a usage error and panics;
//! - running out of energy or leaving the field ends in [`World::die`],
//!   never in an error.

mod encounter;
mod lifecycle;
mod movement;

use crate::clock::{Popped, Scheduler, TaskHandle};
use crate::config::KernelConfig;
use crate::handle::{LifeFormRef, WeakLifeForm};
use crate::lifeform::{LifeForm, LifeState};
use crate::metrics::Metrics;
use crate::quadtree::{QuadTree, Resized};
use crate::species::Species;
use ecosim_data::{LifeFormId, Point, SimTime, POINT_TOLERANCE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Callback registered with the spatial index for each placed life form.
pub type ResizeHook = Rc<dyn Fn(&mut World)>;

/// The index type used by the world.
pub type Space = QuadTree<LifeFormRef, ResizeHook>;

/// How many random spots [`World::place_randomly`] tries before giving up.
const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

pub struct World {
    config: KernelConfig,
    clock: Scheduler<World>,
    space: Space,
    roster: BTreeMap<LifeFormId, WeakLifeForm>,
    rng: ChaCha8Rng,
    pub metrics: Metrics,
}

impl World {
    /// Builds an empty world. Fails if the configuration does not validate.
    pub fn new(config: KernelConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let side = config.field.grid_max;
        tracing::debug!(
            grid_max = side,
            seed = ?config.seed,
            fingerprint = %config.fingerprint(),
            "World created"
        );
        Ok(Self {
            clock: Scheduler::new(config.field.min_delta_time),
            space: QuadTree::new(0.0, 0.0, side, side),
            roster: BTreeMap::new(),
            rng,
            metrics: Metrics::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Read-only view of the spatial index.
    #[must_use]
    pub fn space(&self) -> &Space {
        &self.space
    }

    // ---- clock -------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Queued tasks, including cancelled ones that have not been popped yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.clock.pending_count()
    }

    /// Time of the next queued task.
    #[must_use]
    pub fn next_due(&self) -> Option<SimTime> {
        self.clock.peek_time()
    }

    /// Runs `handler` against this world after `delay` (at least `min_delta_time`).
    pub fn schedule<F>(&mut self, delay: SimTime, handler: F) -> TaskHandle
    where
        F: FnOnce(&mut World) + 'static,
    {
        self.clock.schedule(delay, handler)
    }

    pub fn cancel(&self, handle: &TaskHandle) {
        self.clock.cancel(handle);
    }

    /// Pops and runs the next task. Returns `false` once the queue is empty.
    pub fn step(&mut self) -> bool {
        match self.clock.pop_due() {
            None => false,
            Some(Popped::Ready(handler)) => {
                tracing::trace!(time = self.now(), "task");
                self.metrics.tasks_run += 1;
                handler(self);
                true
            }
            Some(Popped::Cancelled) => {
                self.metrics.tasks_discarded += 1;
                true
            }
        }
    }

    /// Runs every task due at or before `until`. Returns how many were popped.
    pub fn run_until(&mut self, until: SimTime) -> usize {
        let mut popped = 0;
        while self.clock.peek_time().is_some_and(|due| due <= until) {
            self.step();
            popped += 1;
        }
        popped
    }

    /// Uniform sample in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    // ---- population ----------------------------------------------------------

    /// Creates a dormant life form with the configured starting energy.
    ///
    /// It joins the roster immediately but does nothing until it is placed.
    pub fn spawn(&mut self, species: Box<dyn Species>) -> LifeFormRef {
        let id = LifeFormId::from_u128(self.rng.gen::<u128>());
        let life = LifeFormRef::new(LifeForm::new(
            id,
            species,
            self.config.energy.start_energy,
            self.now(),
        ));
        self.roster.insert(id, life.downgrade());
        life
    }

    /// Puts a dormant life form into the field at `pos` and brings it to life.
    ///
    /// Ageing starts, neighbours whose leaf was split are notified, and the
    /// species gets its [`Species::on_birth`] call.
    ///
    /// # Panics
    /// If the life form is not dormant, `pos` is outside the field or
    /// already occupied.
    pub fn place(&mut self, life: &LifeFormRef, pos: Point) {
        assert_eq!(
            life.state(),
            LifeState::Dormant,
            "life form {} placed twice",
            life.id()
        );
        let now = self.now();
        self.roster.insert(life.id(), life.downgrade());
        life.set_position(pos);
        life.touch(now);
        let resized = self
            .space
            .insert(life.clone(), pos, Self::resize_hook(life));
        life.set_state(LifeState::Alive);
        self.metrics.births += 1;
        tracing::debug!(
            id = %life.id(),
            species = life.species_name(),
            x = pos.x,
            y = pos.y,
            time = now,
            "Birth"
        );

        self.schedule_age(life);
        self.fire(resized);
        if life.is_alive() {
            self.with_species(life, |species, world| species.on_birth(world, life));
        }
    }

    /// Places a dormant life form at a random free spot in the central three
    /// quarters of the field.
    ///
    /// A spot is free when nothing lies within encounter distance of it.
    /// Returns `None`, leaving the life form dormant, if no free spot turned up.
    pub fn place_randomly(&mut self, life: &LifeFormRef) -> Option<Point> {
        let side = self.config.field.grid_max;
        let margin = side / 8.0;
        let span = side * 0.75;
        for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
            let pos = Point::new(
                margin + self.uniform() * span,
                margin + self.uniform() * span,
            );
            if self.is_clear(&pos) {
                self.place(life, pos);
                return Some(pos);
            }
        }
        tracing::debug!(id = %life.id(), "No free spot found for life form");
        None
    }

    /// True when no living life form is within encounter distance of `pos`.
    ///
    /// A mover is somewhere in its leaf until its crossing task fires, so
    /// every occupant of a leaf within reach is brought up to date and
    /// measured.
    fn is_clear(&mut self, pos: &Point) -> bool {
        let reach = self.config.encounter.distance;
        let candidates: Vec<LifeFormRef> = self
            .space
            .reachable(pos, reach + POINT_TOLERANCE)
            .into_iter()
            .cloned()
            .collect();
        for other in candidates {
            self.update_position(&other);
            if other.is_alive() && other.position().distance(pos) <= reach {
                return false;
            }
        }
        true
    }

    /// Life forms currently alive, in roster order.
    #[must_use]
    pub fn living(&self) -> Vec<LifeFormRef> {
        self.roster
            .values()
            .filter_map(WeakLifeForm::upgrade)
            .filter(|life| life.is_alive())
            .collect()
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.space.len()
    }

    /// Roster entries, including dormant life forms not yet reclaimed.
    #[must_use]
    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Forgets roster entries whose life form has been reclaimed.
    pub fn prune_roster(&mut self) -> usize {
        let before = self.roster.len();
        self.roster.retain(|_, weak| !weak.is_released());
        before - self.roster.len()
    }

    /// Drops every pending task and kills everything left in the field.
    ///
    /// No hooks fire and no species code runs. Afterwards the world holds no
    /// handles, so every life form is reclaimed as soon as outside holders
    /// let go.
    pub fn teardown(&mut self) {
        let remaining = self.space.drain();
        for life in &remaining {
            life.set_state(LifeState::Dead);
            life.replace_border_cross(None);
        }
        self.clock.clear();
        self.roster.clear();
        tracing::debug!(
            time = self.now(),
            remaining = remaining.len(),
            "World torn down"
        );
    }

    // ---- plumbing ------------------------------------------------------------

    /// Hands `life`'s species to `f` along with the world.
    ///
    /// # Panics
    /// If the species is already borrowed, i.e. a species hook triggered
    /// another hook on the same life form.
    pub fn with_species<R>(
        &mut self,
        life: &LifeFormRef,
        f: impl FnOnce(&mut dyn Species, &mut World) -> R,
    ) -> R {
        let mut species = life
            .species
            .try_borrow_mut()
            .unwrap_or_else(|_| panic!("species of {} re-entered from its own hook", life.id()));
        f(&mut **species, self)
    }

    fn resize_hook(life: &LifeFormRef) -> ResizeHook {
        let life = life.clone();
        Rc::new(move |world: &mut World| world.region_resize(&life))
    }

    /// Calls the resize hooks returned by an index operation.
    fn fire(&mut self, resized: Resized<ResizeHook>) {
        for hook in resized {
            self.metrics.resize_notifications += 1;
            tracing::trace!(time = self.now(), "region resized");
            hook(self);
        }
    }

    /// True for a placed, living life form; false once dead.
    ///
    /// # Panics
    /// On a dormant life form.
    fn is_active(life: &LifeForm) -> bool {
        match life.state() {
            LifeState::Alive => true,
            LifeState::Dead => false,
            LifeState::Dormant => panic!(
                "life form {} ({}) used before it was placed",
                life.id(),
                life.species_name()
            ),
        }
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.teardown();
    }
}
