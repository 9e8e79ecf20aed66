//! Read-only summaries of a running world.
//!
//! Nothing here changes simulation state. Positions handed to a
//! [`RenderSink`] are projected from each life form's last update rather than
//! brought up to date, so drawing a frame cannot charge movement costs.

use crate::handle::LifeFormRef;
use crate::quadtree::Region;
use crate::world::World;
use ecosim_data::{LifeFormId, Point, SimTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Totals for one player (species, or species variant).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesTally {
    pub name: String,
    pub count: usize,
    pub total_energy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Census {
    pub time: SimTime,
    pub living: usize,
    pub pending_tasks: usize,
    /// Largest total energy first.
    pub species: Vec<SpeciesTally>,
}

impl Census {
    #[must_use]
    pub fn count_of(&self, name: &str) -> usize {
        self.species
            .iter()
            .find(|t| t.name == name)
            .map_or(0, |t| t.count)
    }

    /// Number of players with at least one living member.
    #[must_use]
    pub fn species_alive(&self) -> usize {
        self.species.iter().filter(|t| t.count > 0).count()
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "t = {:.2}: {} alive, {} tasks pending",
            self.time, self.living, self.pending_tasks
        )?;
        for tally in &self.species {
            writeln!(
                f,
                "  {:<16} {:>6} {:>12.1}",
                tally.name, tally.count, tally.total_energy
            )?;
        }
        Ok(())
    }
}

/// Snapshot of one life form for display.
#[derive(Debug, Clone)]
pub struct LifeFormView {
    pub id: LifeFormId,
    pub species: String,
    pub glyph: char,
    pub position: Point,
    pub energy: f64,
}

/// Display boundary. Called for side effects only; never read back.
pub trait RenderSink {
    fn begin(&mut self, _time: SimTime, _bounds: Region) {}
    fn draw(&mut self, life: &LifeFormView);
    fn finish(&mut self) {}
}

/// Player name up to the first `:`, so variants of a species report together.
fn player_of(life: &LifeFormRef) -> String {
    let name = life
        .species
        .try_borrow()
        .map(|s| s.player_name())
        .unwrap_or_else(|_| life.species_name().to_string());
    match name.split_once(':') {
        Some((head, _)) => head.to_string(),
        None => name,
    }
}

fn glyph_of(life: &LifeFormRef) -> char {
    life.species.try_borrow().map_or('*', |s| s.glyph())
}

impl World {
    #[must_use]
    pub fn census(&self) -> Census {
        let mut groups: BTreeMap<String, (usize, f64)> = BTreeMap::new();
        let living = self.living();
        for life in &living {
            let entry = groups.entry(player_of(life)).or_default();
            entry.0 += 1;
            entry.1 += life.energy();
        }

        let mut species: Vec<SpeciesTally> = groups
            .into_iter()
            .map(|(name, (count, total_energy))| SpeciesTally {
                name,
                count,
                total_energy,
            })
            .collect();
        species.sort_by(|a, b| b.total_energy.total_cmp(&a.total_energy));

        Census {
            time: self.now(),
            living: living.len(),
            pending_tasks: self.pending_count(),
            species,
        }
    }

    /// Where `life` would be now, without updating it.
    #[must_use]
    pub fn projected_position(&self, life: &LifeFormRef) -> Point {
        let elapsed = (self.now() - life.last_update()).max(0.0);
        life.position()
            .advance(life.course(), life.speed() * elapsed)
    }

    /// Draws every living life form into `sink`.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.begin(self.now(), self.space().bounds());
        for life in self.living() {
            sink.draw(&LifeFormView {
                id: life.id(),
                species: life.species_name().to_string(),
                glyph: glyph_of(&life),
                position: self.projected_position(&life),
                energy: life.energy(),
            });
        }
        sink.finish();
    }
}
