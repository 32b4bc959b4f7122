//! Hand motion controller
//!
//! Hands chase their targets with a per-tick displacement cap. This is a velocity
//! clamp, not a spring: hands never overshoot.

use super::body::Hand;
use crate::vector::{add, clamp_length, subtract};

/// Move a hand one tick toward its target, at most `max_speed` pixels
pub fn move_hand(hand: &mut Hand, max_speed: f32) {
    let desired = subtract(hand.target, hand.pos);
    hand.vel = clamp_length(desired, max_speed);
    hand.pos = add(hand.pos, hand.vel);
}
