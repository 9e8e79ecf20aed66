//! Core data structures for the ecosim kernel.

pub mod geometry;
pub mod perception;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical simulation time. Advanced only by the scheduler.
pub type SimTime = f64;

/// Stable identity of a life form, used by the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LifeFormId(pub Uuid);

impl LifeFormId {
    #[must_use]
    pub fn from_u128(raw: u128) -> Self {
        Self(Uuid::from_u128(raw))
    }
}

impl fmt::Display for LifeFormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the first group is plenty to tell life forms apart in logs
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}
