//! Perception, encounters and eating.

use super::World;
use crate::config::EncounterStrategy;
use crate::handle::LifeFormRef;
use crate::lifeform::LifeState;
use crate::metrics::DeathCause;
use ecosim_data::{Action, ObjInfo, POINT_TOLERANCE};

impl World {
    /// Energy relative to the starting energy; zero once dead.
    #[must_use]
    pub fn health(&self, life: &LifeFormRef) -> f64 {
        match life.state() {
            LifeState::Dead => 0.0,
            LifeState::Alive | LifeState::Dormant => {
                life.energy() / self.config.energy.start_energy
            }
        }
    }

    /// What `observer` can tell about `observed` right now.
    #[must_use]
    pub fn info_about(&self, observer: &LifeFormRef, observed: &LifeFormRef) -> ObjInfo {
        let from = observer.position();
        let to = observed.position();
        let bearing = if from.coincides(&to) {
            0.0
        } else {
            from.bearing(&to)
        };
        ObjInfo {
            species: observed.species_name().to_string(),
            health: self.health(observed),
            distance: from.distance(&to),
            bearing,
            their_speed: observed.speed(),
            their_course: observed.course(),
        }
    }

    /// Looks around `life` for other life forms within `range`.
    ///
    /// `range` is clamped to the configured perception limits and costs
    /// energy in proportion. Every occupant of a leaf within range is
    /// brought up to date and kept only if it is then within range.
    pub fn perceive(&mut self, life: &LifeFormRef, range: f64) -> Vec<ObjInfo> {
        if !Self::is_active(life) {
            return Vec::new();
        }
        self.update_position(life);
        if !life.is_alive() {
            return Vec::new();
        }

        let range = range.clamp(
            self.config.perception.min_range,
            self.config.perception.max_range,
        );
        life.charge(self.config.perceive_cost(range));
        if life.energy() < self.config.energy.min_energy {
            life.set_energy(0.0);
            self.die(life, DeathCause::Exhaustion);
            return Vec::new();
        }

        let candidates: Vec<LifeFormRef> = self
            .space
            .reachable(&life.position(), range + POINT_TOLERANCE)
            .into_iter()
            .filter(|other| !other.ptr_eq(life))
            .cloned()
            .collect();

        let mut seen = Vec::with_capacity(candidates.len());
        for other in candidates {
            self.update_position(&other);
            if other.is_alive() && life.position().distance(&other.position()) <= range {
                seen.push(self.info_about(life, &other));
            }
        }
        seen
    }

    /// Brings `life` up to date and resolves an encounter with whatever is
    /// closest, if that is within encounter distance.
    pub fn check_encounter(&mut self, life: &LifeFormRef) {
        if !Self::is_active(life) {
            return;
        }
        self.update_position(life);
        if !life.is_alive() {
            return;
        }

        let Some(other) = self
            .space
            .closest(&life.position())
            .map(|(other, _)| other.clone())
        else {
            return;
        };
        self.update_position(&other);
        if !life.is_alive() || !other.is_alive() {
            return;
        }
        if life.position().distance(&other.position()) <= self.config.encounter.distance {
            self.resolve_encounter(life, &other);
        }
    }

    /// Settles a meeting between `a` and `b`.
    ///
    /// Both pay the encounter penalty. Each survivor's species then decides
    /// whether to eat the other. A one-sided attempt succeeds with the
    /// eater's success chance. When both try, each draw is made on its own
    /// and, if both succeed, the configured strategy picks the single winner.
    pub fn resolve_encounter(&mut self, a: &LifeFormRef, b: &LifeFormRef) {
        if !Self::is_active(a) || !Self::is_active(b) {
            return;
        }
        assert!(!a.ptr_eq(b), "life form {} cannot meet itself", a.id());
        self.metrics.encounters += 1;
        tracing::trace!(a = %a.id(), b = %b.id(), time = self.now(), "encounter");

        let penalty = self.config.encounter.penalty;
        let min_energy = self.config.energy.min_energy;
        a.charge(penalty);
        b.charge(penalty);
        for party in [a, b] {
            if party.energy() < min_energy {
                party.set_energy(0.0);
                self.die(party, DeathCause::Exhaustion);
            }
        }
        if !a.is_alive() || !b.is_alive() {
            return;
        }

        let a_sees = self.info_about(a, b);
        let b_sees = self.info_about(b, a);
        let a_action = self.with_species(a, |species, world| species.encounter(world, a, &a_sees));
        if !a.is_alive() || !b.is_alive() {
            return;
        }
        let b_action = self.with_species(b, |species, world| species.encounter(world, b, &b_sees));
        if !a.is_alive() || !b.is_alive() {
            return;
        }

        match (a_action, b_action) {
            (Action::Eat, Action::Eat) => {
                let a_chance = self.config.eat_success_chance(a.energy(), b.energy());
                let b_chance = self.config.eat_success_chance(b.energy(), a.energy());
                let a_succeeds = self.uniform() < a_chance;
                let b_succeeds = self.uniform() < b_chance;
                match (a_succeeds, b_succeeds) {
                    (true, true) => {
                        if self.first_prevails(a, b) {
                            self.eat(a, b);
                        } else {
                            self.eat(b, a);
                        }
                    }
                    (true, false) => self.eat(a, b),
                    (false, true) => self.eat(b, a),
                    (false, false) => {}
                }
            }
            (Action::Eat, Action::Ignore) => {
                if self.uniform() < self.config.eat_success_chance(a.energy(), b.energy()) {
                    self.eat(a, b);
                }
            }
            (Action::Ignore, Action::Eat) => {
                if self.uniform() < self.config.eat_success_chance(b.energy(), a.energy()) {
                    self.eat(b, a);
                }
            }
            (Action::Ignore, Action::Ignore) => {}
        }
    }

    /// Tie-break when both parties of an encounter managed to eat the other.
    fn first_prevails(&mut self, a: &LifeFormRef, b: &LifeFormRef) -> bool {
        match self.config.encounter.strategy {
            EncounterStrategy::EvenMoney => self.uniform() < 0.5,
            EncounterStrategy::BigGuyWins => a.energy() > b.energy(),
            EncounterStrategy::UnderdogIsHere => a.energy() <= b.energy(),
            EncounterStrategy::FasterGuyWins => a.speed() > b.speed(),
            EncounterStrategy::SlowerGuyWins => a.speed() <= b.speed(),
        }
    }

    /// `eater` eats `prey`.
    ///
    /// The prey dies at once. The eater pays the eat cost now and receives
    /// its share of the prey's energy after the digestion delay.
    pub fn eat(&mut self, eater: &LifeFormRef, prey: &LifeFormRef) {
        if !Self::is_active(eater) || !Self::is_active(prey) {
            return;
        }
        let meal = prey.energy() * self.config.encounter.eat_efficiency;
        self.die(prey, DeathCause::Eaten);
        self.metrics.meals += 1;
        tracing::debug!(
            eater = %eater.id(),
            prey = %prey.id(),
            prey_species = prey.species_name(),
            meal,
            time = self.now(),
            "Meal"
        );

        eater.charge(self.config.encounter.eat_cost);
        if eater.energy() < self.config.energy.min_energy {
            eater.set_energy(0.0);
            self.die(eater, DeathCause::Exhaustion);
            return;
        }

        let me = eater.clone();
        self.clock.schedule(self.config.encounter.digestion_time, move |world| {
            world.gain_energy(&me, meal);
        });
    }

    /// Adds `amount` to `life`'s energy. Ignored once dead.
    pub fn gain_energy(&mut self, life: &LifeFormRef, amount: f64) {
        if !Self::is_active(life) {
            return;
        }
        life.charge(-amount);
        if life.energy() < self.config.energy.min_energy {
            life.set_energy(0.0);
            self.die(life, DeathCause::Exhaustion);
        }
    }
}
