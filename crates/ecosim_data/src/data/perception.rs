use serde::{Deserialize, Serialize};

/// What a species decides to do about a life form it bumped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Ignore,
    Eat,
}

/// Snapshot of another life form as seen by an observer.
///
/// Produced fresh on every query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjInfo {
    pub species: String,
    /// Energy relative to the starting energy; 0 once dead.
    pub health: f64,
    pub distance: f64,
    /// Course the observer would take to reach the observed position.
    pub bearing: f64,
    pub their_speed: f64,
    pub their_course: f64,
}
