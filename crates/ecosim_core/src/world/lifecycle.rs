//! Ageing, reproduction and death.

use super::World;
use crate::handle::LifeFormRef;
use crate::lifeform::LifeState;
use crate::metrics::DeathCause;
use std::f64::consts::TAU;

impl World {
    pub(super) fn schedule_age(&mut self, life: &LifeFormRef) {
        let me = life.clone();
        self.clock
            .schedule(self.config.energy.age_frequency, move |world| world.age(&me));
    }

    /// Charges the periodic upkeep and books the next charge.
    ///
    /// Dropping to the minimum energy or below is fatal on this very firing.
    pub fn age(&mut self, life: &LifeFormRef) {
        if !Self::is_active(life) {
            return;
        }
        life.charge(self.config.energy.age_penalty);
        if life.energy() > self.config.energy.min_energy {
            self.schedule_age(life);
        } else {
            life.set_energy(0.0);
            self.die(life, DeathCause::Age);
        }
    }

    /// Splits `parent`'s energy with the dormant `child` and tries to place
    /// the child nearby.
    ///
    /// Ignored if the parent reproduced less than `min_interval` ago. Both
    /// keep half of what is left after the reproduction cost; if that is
    /// below the minimum energy, both die. Otherwise a handful of random
    /// spots between encounter distance and reproduction distance from the
    /// parent are tried, and a spot within encounter distance of anything
    /// is rejected. If every try fails the child is never placed and stays
    /// dormant with its share of energy. A child that is not placed leaves
    /// the roster.
    ///
    /// # Panics
    /// If `child` has already been placed.
    pub fn reproduce(&mut self, parent: &LifeFormRef, child: &LifeFormRef) {
        assert_eq!(
            child.state(),
            LifeState::Dormant,
            "child {} has already been placed",
            child.id()
        );
        if !Self::is_active(parent) {
            self.roster.remove(&child.id());
            return;
        }
        self.update_position(parent);
        if !parent.is_alive() {
            self.roster.remove(&child.id());
            return;
        }

        let now = self.now();
        if now - parent.last_reproduction() < self.config.reproduction.min_interval {
            self.roster.remove(&child.id());
            return;
        }
        parent.mark_reproduced(now);

        let share = parent.energy() * (1.0 - self.config.reproduction.cost) / 2.0;
        parent.set_energy(share);
        child.set_energy(share);
        if share < self.config.energy.min_energy {
            child.set_energy(0.0);
            parent.set_energy(0.0);
            self.die(child, DeathCause::Stillborn);
            self.die(parent, DeathCause::Exhaustion);
            return;
        }

        let near = self.config.encounter.distance;
        let far = self.config.reproduction.distance;
        for _ in 0..self.config.reproduction.attempts {
            let dist = near + self.uniform() * (far - near);
            let course = self.uniform() * TAU;
            let spot = parent.position().advance(course, dist);
            if self.space.is_out_of_bounds(&spot) {
                continue;
            }
            if self.is_clear(&spot) {
                self.place(child, spot);
                return;
            }
        }

        // never placed; placing it later puts it back on the roster
        self.roster.remove(&child.id());
        self.metrics.abandoned_reproductions += 1;
        tracing::debug!(
            parent = %parent.id(),
            species = parent.species_name(),
            time = now,
            "Reproduction abandoned, no room for the child"
        );
    }

    /// Kills `life`.
    ///
    /// The life form leaves the index at once and its pending crossing task
    /// is cancelled; other pending tasks find it dead when they fire. Killing
    /// the dead again does nothing. A dormant life form is simply marked
    /// dead.
    pub fn die(&mut self, life: &LifeFormRef, cause: DeathCause) {
        let was = life.state();
        if was == LifeState::Dead {
            return;
        }
        life.set_state(LifeState::Dead);
        life.replace_border_cross(None);
        self.roster.remove(&life.id());
        self.metrics.record_death(cause);
        tracing::debug!(
            id = %life.id(),
            species = life.species_name(),
            %cause,
            time = self.now(),
            "Death"
        );

        if was == LifeState::Alive {
            let (removed, resized) = self.space.remove(&life.position());
            debug_assert!(removed.ptr_eq(life), "index held a different life form");
            drop(removed);
            self.fire(resized);
        }
    }
}
