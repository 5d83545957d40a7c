//! Circle overlap tests
//!
//! Everything that can touch in Pendulum Hop is a circle: joints, apples,
//! and the character's bounding circle. Tests compare squared distances so no
//! square root is taken per check.

use glam::Vec2;

/// A circle in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        circles_overlap(self.center, self.radius, other.center, other.radius)
    }
}

/// True when two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Index of the first circle in `others` that `target` touches
pub fn first_overlap<'a, I>(target: &Circle, others: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Circle>,
{
    others.into_iter().position(|c| target.overlaps(c))
}
