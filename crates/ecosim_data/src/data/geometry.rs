use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Two points closer than this are the same point.
pub const POINT_TOLERANCE: f64 = 1.0e-6;

/// Position on the playing field.
///
/// `y` grows downward, so the "top" edge of a region is its minimum `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Tolerant equality: true when the two points are within [`POINT_TOLERANCE`].
    #[inline]
    #[must_use]
    pub fn coincides(&self, other: &Point) -> bool {
        self.distance(other) < POINT_TOLERANCE
    }

    /// Course (radians, in `[0, 2π)`) to travel from `self` to reach `other`.
    #[must_use]
    pub fn bearing(&self, other: &Point) -> f64 {
        debug_assert!(!self.coincides(other), "bearing between coincident points");
        let angle = (other.y - self.y).atan2(other.x - self.x);
        if angle < 0.0 {
            angle + 2.0 * PI
        } else {
            angle
        }
    }

    /// The point reached after travelling `dist` units along `course`.
    #[inline]
    #[must_use]
    pub fn advance(&self, course: f64, dist: f64) -> Point {
        Point::new(self.x + course.cos() * dist, self.y + course.sin() * dist)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
