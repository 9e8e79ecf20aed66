//! Stationary producer. Grows by photosynthesis and buds off children when
//! it has more than twice the starting energy.

use ecosim_core::{Action, LifeFormRef, ObjInfo, Point, Species, World};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct AlgaeParams {
    /// Energy gained per photosynthesis cycle.
    pub photo_gain: f64,
    pub photo_period: f64,
}

impl Default for AlgaeParams {
    fn default() -> Self {
        Self {
            photo_gain: 2.0,
            photo_period: 5.0,
        }
    }
}

pub struct Algae {
    params: AlgaeParams,
}

impl Algae {
    pub const NAME: &'static str = "Algae";

    #[must_use]
    pub fn new(params: AlgaeParams) -> Self {
        Self { params }
    }

    fn schedule_photosynthesis(world: &mut World, me: &LifeFormRef, params: AlgaeParams) {
        let me = me.clone();
        world.schedule(params.photo_period, move |world| {
            Self::photosynthesize(world, &me, params);
        });
    }

    fn photosynthesize(world: &mut World, me: &LifeFormRef, params: AlgaeParams) {
        if !me.is_alive() {
            return;
        }
        world.gain_energy(me, params.photo_gain);
        if !me.is_alive() {
            return;
        }
        if me.energy() > 2.0 * world.config().energy.start_energy {
            let child = world.spawn(Box::new(Algae::new(params)));
            world.reproduce(me, &child);
        }
        Self::schedule_photosynthesis(world, me, params);
    }

    /// Drops a fresh alga at a random free spot. Returns where it landed.
    pub fn create_spontaneously(world: &mut World, params: AlgaeParams) -> Option<Point> {
        let spore = world.spawn(Box::new(Algae::new(params)));
        world.place_randomly(&spore)
    }
}

impl Species for Algae {
    fn species_name(&self) -> &str {
        Self::NAME
    }

    fn encounter(&mut self, _: &mut World, _: &LifeFormRef, _: &ObjInfo) -> Action {
        Action::Ignore
    }

    fn on_birth(&mut self, world: &mut World, me: &LifeFormRef) {
        Self::schedule_photosynthesis(world, me, self.params);
    }

    fn glyph(&self) -> char {
        '.'
    }
}
