//! Roaming predator. Steers toward the nearest algae it can see, eats
//! anything that is not its own kind, and splits once it is well fed.

use ecosim_core::{Action, LifeFormRef, ObjInfo, Species, TaskHandle, World};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HunterParams {
    pub hunt_period: f64,
    pub perceive_range: f64,
    /// Health at which a hunter spawns a child.
    pub spawn_health: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub favourite_food: String,
}

impl Default for HunterParams {
    fn default() -> Self {
        Self {
            hunt_period: 10.0,
            perceive_range: 20.0,
            spawn_health: 4.0,
            min_speed: 2.0,
            max_speed: 7.0,
            favourite_food: "Algae".to_string(),
        }
    }
}

pub struct Hunter {
    params: HunterParams,
    hunt_task: Option<TaskHandle>,
}

impl Hunter {
    pub const NAME: &'static str = "Hunter";

    #[must_use]
    pub fn new(params: HunterParams) -> Self {
        Self {
            params,
            hunt_task: None,
        }
    }

    /// Cancels any pending hunt and books a new one `delay` from now.
    fn rearm(&mut self, world: &mut World, me: &LifeFormRef, delay: f64) {
        if let Some(previous) = self.hunt_task.take() {
            previous.cancel();
        }
        let me = me.clone();
        self.hunt_task = Some(world.schedule(delay, move |world| Self::hunt(world, &me)));
    }

    fn hunt(world: &mut World, me: &LifeFormRef) {
        if !me.is_alive() {
            return;
        }
        let params = match me.species::<Hunter>() {
            Some(hunter) => hunter.params.clone(),
            None => return,
        };

        let seen = world.perceive(me, params.perceive_range);
        if !me.is_alive() {
            return;
        }
        let target = seen
            .iter()
            .filter(|info| info.species == params.favourite_food)
            .min_by(|a, b| a.distance.total_cmp(&b.distance));
        if let Some(target) = target {
            world.set_course(me, target.bearing);
        }

        if let Some(mut hunter) = me.species_mut::<Hunter>() {
            hunter.rearm(world, me, params.hunt_period);
        }

        if world.health(me) >= params.spawn_health {
            let child = world.spawn(Box::new(Hunter::new(params)));
            world.reproduce(me, &child);
        }
    }
}

impl Species for Hunter {
    fn species_name(&self) -> &str {
        Self::NAME
    }

    fn encounter(&mut self, world: &mut World, me: &LifeFormRef, other: &ObjInfo) -> Action {
        if other.species == Self::NAME {
            // no cannibalism; turn around
            world.set_course(me, other.bearing + PI);
            Action::Ignore
        } else {
            self.rearm(world, me, 0.0);
            Action::Eat
        }
    }

    fn on_birth(&mut self, world: &mut World, me: &LifeFormRef) {
        let course = world.uniform() * TAU;
        let speed =
            self.params.min_speed + world.uniform() * (self.params.max_speed - self.params.min_speed);
        world.set_course(me, course);
        world.set_speed(me, speed);
        self.rearm(world, me, 0.0);
    }

    fn glyph(&self) -> char {
        'H'
    }
}
