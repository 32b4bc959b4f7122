//! Body types: hands and balls
//!
//! Both are point-mass circles. Radii are shared per kind and live in the world config.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identity of a live hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandId(pub u32);

impl fmt::Display for HandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand#{}", self.0)
    }
}

/// A controllable circular zone that chases an externally supplied target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    pub id: HandId,
    pub pos: Vec2,
    /// Displacement applied on the last tick; only the motion controller writes it
    pub vel: Vec2,
    pub target: Vec2,
}

impl Hand {
    /// A hand at rest on its own target
    pub fn new(id: HandId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            target: pos,
        }
    }
}

/// A free body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Velocity at the start of the last tick (diagnostics only)
    pub prev_vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            prev_vel: vel,
        }
    }

    /// Velocity change over the last tick
    pub fn acceleration(&self) -> Vec2 {
        self.vel - self.prev_vel
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hand_rests_on_target() {
        let hand = Hand::new(HandId(3), Vec2::new(10.0, 20.0));
        assert_eq!(hand.target, hand.pos);
        assert_eq!(hand.vel, Vec2::ZERO);
        assert_eq!(hand.id.to_string(), "hand#3");
    }

    #[test]
    fn test_ball_acceleration() {
        let mut ball = Ball::new(Vec2::ZERO, Vec2::new(1.0, 2.0));
        assert_eq!(ball.acceleration(), Vec2::ZERO);
        ball.vel.y += 0.5;
        assert_eq!(ball.acceleration(), Vec2::new(0.0, 0.5));
    }
}
