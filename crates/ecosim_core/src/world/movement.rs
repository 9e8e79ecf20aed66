//! Lazy motion and region-crossing checks.
//!
//! A moving life form's stored position is only brought up to date when
//! something needs it. Between updates the only pending work is a single
//! task scheduled for the moment it would leave its current leaf, which is
//! when it might first come close enough to something to matter.

use super::World;
use crate::handle::LifeFormRef;
use crate::metrics::DeathCause;
use ecosim_data::POINT_TOLERANCE;
use std::f64::consts::TAU;

impl World {
    /// Advances `life` along its course to the current time.
    ///
    /// Does nothing if less than `min_delta_time` has passed since the last
    /// update. Moving costs energy; leaving the field or running out of
    /// energy kills the life form where it stood.
    pub fn update_position(&mut self, life: &LifeFormRef) {
        if !Self::is_active(life) {
            return;
        }
        let now = self.now();
        let elapsed = now - life.last_update();
        if elapsed < self.config.field.min_delta_time {
            return;
        }

        let speed = life.speed();
        if speed == 0.0 {
            life.touch(now);
            return;
        }

        let old = life.position();
        let new = old.advance(life.course(), speed * elapsed);
        if self.space.is_out_of_bounds(&new) {
            life.set_energy(0.0);
            self.die(life, DeathCause::OutOfBounds);
            return;
        }

        // another occupant is recorded exactly where we would land; stay put
        // and let the next update cover the whole interval
        if !new.coincides(&old) && self.space.is_occupied(&new) {
            return;
        }

        life.charge(self.config.movement_cost(speed, elapsed));
        if life.energy() < self.config.energy.min_energy {
            life.set_energy(0.0);
            self.die(life, DeathCause::Exhaustion);
            return;
        }

        life.touch(now);
        let resized = self.space.update_position(&old, new);
        life.set_position(new);
        self.fire(resized);
    }

    /// Turns `life` onto a new course, in radians.
    pub fn set_course(&mut self, life: &LifeFormRef, course: f64) {
        if !Self::is_active(life) {
            return;
        }
        self.update_position(life);
        if !life.is_alive() {
            return;
        }
        life.set_course(course.rem_euclid(TAU));
        self.compute_next_move(life);
    }

    /// Changes speed, silently clamped to `[0, max_speed]`.
    pub fn set_speed(&mut self, life: &LifeFormRef, speed: f64) {
        if !Self::is_active(life) {
            return;
        }
        self.update_position(life);
        if !life.is_alive() {
            return;
        }
        life.set_speed(speed.max(0.0).min(self.config.perception.max_speed));
        self.compute_next_move(life);
    }

    /// Replaces the pending region-crossing task with one timed for the
    /// moment `life` reaches the edge of its current leaf.
    ///
    /// A stationary life form has no crossing task.
    pub fn compute_next_move(&mut self, life: &LifeFormRef) {
        if !Self::is_active(life) {
            return;
        }
        life.replace_border_cross(None);

        let speed = life.speed();
        if speed <= 0.0 {
            return;
        }
        let edge = self.space.distance_to_edge(&life.position(), life.course());
        let delay = (edge + POINT_TOLERANCE) / speed;
        let me = life.clone();
        let handle = self.clock.schedule(delay, move |world| world.border_cross(&me));
        life.replace_border_cross(Some(handle));
    }

    /// Fires when `life` should have crossed into a new leaf.
    pub fn border_cross(&mut self, life: &LifeFormRef) {
        if !life.is_alive() {
            return;
        }
        self.update_position(life);
        self.check_encounter(life);
        self.compute_next_move(life);
    }

    /// Resize hook: `life`'s leaf changed shape, so its crossing time did too.
    pub fn region_resize(&mut self, life: &LifeFormRef) {
        if !life.is_alive() {
            return;
        }
        self.update_position(life);
        self.compute_next_move(life);
    }
}
