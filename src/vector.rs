//! 2D vector helpers
//!
//! Thin free functions over `glam::Vec2` so the physics reads like its formulas.

use glam::Vec2;

#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

#[inline]
pub fn subtract(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

/// Scale `v` by `k`
#[inline]
pub fn scale(k: f32, v: Vec2) -> Vec2 {
    v * k
}

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let d = subtract(a, b);
    dot(d, d).sqrt()
}

/// Rescale `v` to length `max` if it is longer, otherwise return it unchanged.
///
/// A zero vector is never normalized.
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let magnitude = distance(v, Vec2::ZERO);
    if magnitude > max && magnitude > 0.0 {
        scale(max / magnitude, v)
    } else {
        v
    }
}
