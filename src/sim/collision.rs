//! Collision detection and confinement
//!
//! Everything in the shooter collides as circles: two entities touch when
//! their centers are closer than the sum of their half-sizes.

use glam::Vec2;

/// Combined-radius overlap test
///
/// Strictly less than, so entities exactly touching don't collide.
#[inline]
pub fn circles_overlap(a: Vec2, a_half: f32, b: Vec2, b_half: f32) -> bool {
    a.distance(b) < a_half + b_half
}

/// Keep a box of the given half extents fully inside the field
///
/// Saturating: if the field is smaller than the box the box is pinned to the
/// top-left instead of panicking like `f32::clamp` would.
#[inline]
pub fn confine(pos: Vec2, half: Vec2, field: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.min(field.x - half.x).max(half.x),
        pos.y.min(field.y - half.y).max(half.y),
    )
}

/// Unit vector from `from` toward `to`, or `None` when they coincide
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    (dist > 0.0).then(|| delta / dist)
}
