//! Plain value types shared by the simulation kernel and the policy layers.

pub mod data;

pub use data::geometry::{Point, POINT_TOLERANCE};
pub use data::perception::{Action, ObjInfo};
pub use data::{LifeFormId, SimTime};
