use ecosim_core::{Action, KernelConfig, LifeFormRef, ObjInfo, Point, Species, World};

/// Never moves on its own and never eats.
pub struct Inert;

impl Species for Inert {
    fn species_name(&self) -> &str {
        "Inert"
    }

    fn encounter(&mut self, _: &mut World, _: &LifeFormRef, _: &ObjInfo) -> Action {
        Action::Ignore
    }
}

/// Tries to eat anything it meets.
pub struct Biter;

impl Species for Biter {
    fn species_name(&self) -> &str {
        "Biter"
    }

    fn encounter(&mut self, _: &mut World, _: &LifeFormRef, _: &ObjInfo) -> Action {
        Action::Eat
    }
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: KernelConfig,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            config: KernelConfig {
                seed: Some(42),
                ..Default::default()
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut KernelConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn build(self) -> World {
        World::new(self.config).expect("Failed to create world")
    }
}

#[allow(dead_code)]
pub fn inert_at(world: &mut World, x: f64, y: f64) -> LifeFormRef {
    let life = world.spawn(Box::new(Inert));
    world.place(&life, Point::new(x, y));
    life
}

#[allow(dead_code)]
pub fn biter_at(world: &mut World, x: f64, y: f64) -> LifeFormRef {
    let life = world.spawn(Box::new(Biter));
    world.place(&life, Point::new(x, y));
    life
}

/// Moves the clock forward to `t` by scheduling a no-op there.
#[allow(dead_code)]
pub fn advance_to(world: &mut World, t: f64) {
    let delay = t - world.now();
    let marker = world.schedule(delay, |_| {});
    world.run_until(marker.due());
}
