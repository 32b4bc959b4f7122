//! Fixed timestep simulation tick
//!
//! Advances the world by exactly one step. Order within a tick is fixed:
//! hands move, then every ball integrates, then ball pairs repel.

use super::body::{Ball, Hand};
use super::collision::{
    apply_ceiling, collides_with_hand, find_closest_hand, hand_catches, hand_spring,
    reflect_walls, resolve_ball_pairs,
};
use super::motion::move_hand;
use super::world::World;
use crate::config::WorldConfig;
use crate::consts::FLOOR_KICK;
use crate::vector::add;

/// What happened to one ball during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BallStep {
    pub caught: bool,
    pub hit_wall: bool,
}

/// Aggregate counts for one tick (for logging and tests)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub catches: usize,
    pub wall_hits: usize,
    pub ball_contacts: usize,
}

/// Advance one ball by one tick.
///
/// Hand contact is judged on the pre-gravity velocity, so gravity comes last.
pub fn integrate_ball<'a, I>(ball: &mut Ball, hands: I, config: &WorldConfig) -> BallStep
where
    I: IntoIterator<Item = &'a Hand>,
{
    let mut step = BallStep::default();
    let radius = config.ball_radius();

    // Semi-implicit: last tick's velocity moves the ball first
    ball.pos = add(ball.pos, ball.vel);
    ball.prev_vel = ball.vel;

    if let Some(hand) = find_closest_hand(ball.pos, hands) {
        if collides_with_hand(ball, hand, radius, config.hand_radius())
            && hand_catches(ball, hand, config.speed_limit())
        {
            hand_spring(ball, hand, config.stiffness());
            step.caught = true;
        }
    }

    step.hit_wall = reflect_walls(ball, config.width(), radius);
    apply_ceiling(ball, radius, config.ceiling_mode());

    if ball.pos.y <= config.height() - radius {
        ball.vel.y += config.gravity();
    } else {
        // No floor body exists; kick resting balls back up
        ball.vel.y = FLOOR_KICK;
    }

    step
}

/// Advance the world state by one fixed timestep
pub fn tick(world: &mut World) -> TickReport {
    let mut report = TickReport::default();
    let (config, hands, balls) = world.parts_mut();

    let max_hand_speed = config.max_hand_speed();
    for hand in hands.values_mut() {
        move_hand(hand, max_hand_speed);
    }

    for ball in balls.iter_mut() {
        let step = integrate_ball(ball, hands.values(), config);
        report.catches += step.caught as usize;
        report.wall_hits += step.hit_wall as usize;
    }

    report.ball_contacts =
        resolve_ball_pairs(balls, config.ball_radius(), config.ball_stiffness());

    debug_assert!(
        balls.iter().all(Ball::is_finite),
        "non-finite ball state after tick"
    );

    world.time_ticks += 1;
    report
}
