//! Per-organism kernel state.
//!
//! All mutable fields live in `Cell`s so that re-entrant kernel code (a
//! resize hook moving a neighbour while the caller still holds a handle to
//! it) never trips over an outstanding borrow. Only the kernel writes them.

use crate::clock::TaskHandle;
use crate::species::Species;
use ecosim_data::{LifeFormId, Point, SimTime};
use std::cell::{Cell, RefCell};

/// Lifecycle of a life form. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    /// Constructed but not yet placed in the field.
    Dormant,
    Alive,
    Dead,
}

pub struct LifeForm {
    id: LifeFormId,
    species_name: String,
    state: Cell<LifeState>,
    pos: Cell<Point>,
    course: Cell<f64>,
    speed: Cell<f64>,
    energy: Cell<f64>,
    update_time: Cell<SimTime>,
    reproduce_time: Cell<SimTime>,
    border_cross: RefCell<Option<TaskHandle>>,
    pub(crate) species: RefCell<Box<dyn Species>>,
}

impl LifeForm {
    pub(crate) fn new(id: LifeFormId, species: Box<dyn Species>, energy: f64, now: SimTime) -> Self {
        Self {
            id,
            species_name: species.species_name().to_string(),
            state: Cell::new(LifeState::Dormant),
            pos: Cell::new(Point::default()),
            course: Cell::new(0.0),
            speed: Cell::new(0.0),
            energy: Cell::new(energy),
            update_time: Cell::new(now),
            reproduce_time: Cell::new(0.0),
            border_cross: RefCell::new(None),
            species: RefCell::new(species),
        }
    }

    #[must_use]
    pub fn id(&self) -> LifeFormId {
        self.id
    }

    #[must_use]
    pub fn species_name(&self) -> &str {
        &self.species_name
    }

    #[must_use]
    pub fn state(&self) -> LifeState {
        self.state.get()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state.get() == LifeState::Alive
    }

    /// Position as of the last update; may lag behind a moving life form.
    #[must_use]
    pub fn position(&self) -> Point {
        self.pos.get()
    }

    #[must_use]
    pub fn course(&self) -> f64 {
        self.course.get()
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed.get()
    }

    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy.get()
    }

    #[must_use]
    pub fn last_update(&self) -> SimTime {
        self.update_time.get()
    }

    #[must_use]
    pub fn last_reproduction(&self) -> SimTime {
        self.reproduce_time.get()
    }

    pub(crate) fn set_state(&self, state: LifeState) {
        self.state.set(state);
    }

    pub(crate) fn set_position(&self, pos: Point) {
        self.pos.set(pos);
    }

    pub(crate) fn set_course(&self, course: f64) {
        self.course.set(course);
    }

    pub(crate) fn set_speed(&self, speed: f64) {
        self.speed.set(speed);
    }

    pub(crate) fn set_energy(&self, energy: f64) {
        self.energy.set(energy);
    }

    pub(crate) fn charge(&self, cost: f64) {
        self.energy.set(self.energy.get() - cost);
    }

    pub(crate) fn touch(&self, now: SimTime) {
        self.update_time.set(now);
    }

    pub(crate) fn mark_reproduced(&self, now: SimTime) {
        self.reproduce_time.set(now);
    }

    /// Replaces the pending region-crossing task, cancelling the old one.
    pub(crate) fn replace_border_cross(&self, next: Option<TaskHandle>) {
        if let Some(previous) = self.border_cross.replace(next) {
            previous.cancel();
        }
    }

    #[must_use]
    pub fn has_pending_move(&self) -> bool {
        self.border_cross
            .borrow()
            .as_ref()
            .is_some_and(TaskHandle::is_active)
    }
}

impl Drop for LifeForm {
    fn drop(&mut self) {
        debug_assert!(
            self.state.get() != LifeState::Alive || std::thread::panicking(),
            "life form {} released while still alive",
            self.id
        );
        tracing::trace!(id = %self.id, species = %self.species_name, "life form reclaimed");
    }
}
