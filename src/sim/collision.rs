//! Collision detection and response
//!
//! Hand contacts are resolved as a damped spring toward the hand center, never as an
//! impulse or positional correction. Penetration is worked out over later ticks.

use glam::Vec2;

use super::body::{Ball, Hand};
use crate::config::CeilingMode;
use crate::consts::SPRING_DAMPING;
use crate::vector::{add, distance, dot, scale, subtract};

/// Closest live hand to `pos`, first one wins on ties
pub fn find_closest_hand<'a, I>(pos: Vec2, hands: I) -> Option<&'a Hand>
where
    I: IntoIterator<Item = &'a Hand>,
{
    let mut best: Option<(&Hand, f32)> = None;
    for hand in hands {
        let d = distance(pos, hand.pos);
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((hand, d)),
        }
    }
    best.map(|(hand, _)| hand)
}

/// Ball and hand circles overlap (touching counts)
#[inline]
pub fn collides_with_hand(ball: &Ball, hand: &Hand, ball_radius: f32, hand_radius: f32) -> bool {
    distance(ball.pos, hand.pos) <= ball_radius + hand_radius
}

/// Whether a hand in contact should push the ball this tick.
///
/// The hand must be moving up relative to the ball (screen +y is down) and the ball
/// must still be under the upward speed limit.
#[inline]
pub fn hand_catches(ball: &Ball, hand: &Hand, speed_limit: f32) -> bool {
    hand.vel.y - ball.vel.y < 0.0 && -ball.vel.y < speed_limit
}

/// Damped spring pulling the ball toward the hand center
pub fn hand_spring(ball: &mut Ball, hand: &Hand, stiffness: f32) {
    let separation = subtract(ball.pos, hand.pos);
    let spring = scale(-stiffness, separation);
    let damping = scale(-SPRING_DAMPING, subtract(ball.vel, hand.vel));
    ball.vel = add(ball.vel, add(spring, damping));
}

/// Invert horizontal velocity if the ball crossed a side wall in its direction of travel.
///
/// Returns true on reflection. Position is not corrected.
pub fn reflect_walls(ball: &mut Ball, width: f32, radius: f32) -> bool {
    let moving_left_out = ball.vel.x < 0.0 && ball.pos.x < radius;
    let moving_right_out = ball.vel.x > 0.0 && ball.pos.x > width - radius;
    if moving_left_out || moving_right_out {
        ball.vel.x = -ball.vel.x;
        true
    } else {
        false
    }
}

/// Apply the ceiling rule if the ball is touching the top of the field
pub fn apply_ceiling(ball: &mut Ball, radius: f32, mode: CeilingMode) {
    if ball.pos.y > radius {
        return;
    }
    match mode {
        CeilingMode::Off => {}
        CeilingMode::Elastic => ball.vel.y = -ball.vel.y,
        CeilingMode::Dead => ball.vel.y = 0.0,
    }
}

/// Pairwise repulsion between two overlapping balls.
///
/// Returns the acceleration applied to `a` (`b` receives the opposite), or `None` when
/// the circles do not overlap.
pub fn ball_bounce(a: &mut Ball, b: &mut Ball, radius: f32, stiffness: f32) -> Option<Vec2> {
    let d = subtract(a.pos, b.pos);
    let penetration = dot(d, d).sqrt() - 2.0 * radius;
    if penetration >= 0.0 {
        return None;
    }
    let accel = scale(-stiffness * penetration, d);
    a.vel = add(a.vel, accel);
    b.vel = subtract(b.vel, accel);
    Some(accel)
}

/// Run `ball_bounce` over every unordered pair, in index order. Returns the overlap count.
pub fn resolve_ball_pairs(balls: &mut [Ball], radius: f32, stiffness: f32) -> usize {
    let mut contacts = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if ball_bounce(a, b, radius, stiffness).is_some() {
                contacts += 1;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::HandId;

    fn ball(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(vx, vy))
    }

    #[test]
    fn test_find_closest_hand_none() {
        let hands: Vec<Hand> = Vec::new();
        assert!(find_closest_hand(Vec2::ZERO, &hands).is_none());
    }

    #[test]
    fn test_find_closest_hand_picks_nearest() {
        let hands = vec![
            Hand::new(HandId(1), Vec2::new(100.0, 0.0)),
            Hand::new(HandId(2), Vec2::new(10.0, 0.0)),
            Hand::new(HandId(3), Vec2::new(-50.0, 0.0)),
        ];
        let closest = find_closest_hand(Vec2::ZERO, &hands).unwrap();
        assert_eq!(closest.id, HandId(2));
    }

    #[test]
    fn test_find_closest_hand_tie_goes_to_first() {
        let hands = vec![
            Hand::new(HandId(7), Vec2::new(10.0, 0.0)),
            Hand::new(HandId(8), Vec2::new(-10.0, 0.0)),
        ];
        let closest = find_closest_hand(Vec2::ZERO, &hands).unwrap();
        assert_eq!(closest.id, HandId(7));
    }

    #[test]
    fn test_collides_with_hand_touching() {
        let hand = Hand::new(HandId(1), Vec2::new(0.0, 0.0));
        assert!(collides_with_hand(&ball(100.0, 0.0, 0.0, 0.0), &hand, 20.0, 80.0));
        assert!(!collides_with_hand(&ball(100.5, 0.0, 0.0, 0.0), &hand, 20.0, 80.0));
    }

    #[test]
    fn test_spring_on_overlapping_upward_hand() {
        let mut hand = Hand::new(HandId(1), Vec2::new(100.0, 100.0));
        hand.vel = Vec2::new(0.0, -5.0);
        let mut b = ball(100.0, 100.0, 0.0, 1.0);

        assert!(collides_with_hand(&b, &hand, 20.0, 80.0));
        assert!(hand_catches(&b, &hand, 10.0));

        let before = b.vel.y;
        hand_spring(&mut b, &hand, 0.15);
        assert!(b.vel.y < before);
        // Zero separation: only damping acts, -0.3 * (1 - -5)
        assert!((b.vel.y - (1.0 - 0.3 * 6.0)).abs() < 1e-6);
        assert_eq!(b.vel.x, 0.0);
    }

    #[test]
    fn test_spring_pulls_toward_hand_center() {
        let hand = Hand::new(HandId(1), Vec2::new(0.0, 0.0));
        let mut b = ball(10.0, -20.0, 0.0, 0.0);
        hand_spring(&mut b, &hand, 0.1);
        assert!((b.vel - Vec2::new(-1.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_hand_catches_requires_upward_relative_motion() {
        let mut hand = Hand::new(HandId(1), Vec2::ZERO);
        hand.vel = Vec2::new(0.0, 3.0);
        assert!(!hand_catches(&ball(0.0, 0.0, 0.0, 1.0), &hand, 10.0));
        assert!(hand_catches(&ball(0.0, 0.0, 0.0, 4.0), &hand, 10.0));
    }

    #[test]
    fn test_hand_catches_respects_speed_limit() {
        let mut hand = Hand::new(HandId(1), Vec2::ZERO);
        hand.vel = Vec2::new(0.0, -20.0);
        assert!(hand_catches(&ball(0.0, 0.0, 0.0, -9.0), &hand, 10.0));
        assert!(!hand_catches(&ball(0.0, 0.0, 0.0, -10.0), &hand, 10.0));
        assert!(!hand_catches(&ball(0.0, 0.0, 0.0, -15.0), &hand, 10.0));
    }

    #[test]
    fn test_reflect_left_wall() {
        let mut b = ball(5.0, 300.0, -3.0, 0.0);
        assert!(reflect_walls(&mut b, 500.0, 20.0));
        assert_eq!(b.vel.x, 3.0);
        assert_eq!(b.pos.x, 5.0);
    }

    #[test]
    fn test_reflect_right_wall() {
        let mut b = ball(490.0, 300.0, 2.0, 0.0);
        assert!(reflect_walls(&mut b, 500.0, 20.0));
        assert_eq!(b.vel.x, -2.0);
    }

    #[test]
    fn test_no_reflect_when_moving_back_in() {
        // Already heading back into the field: no double flip
        let mut b = ball(5.0, 300.0, 3.0, 0.0);
        assert!(!reflect_walls(&mut b, 500.0, 20.0));
        assert_eq!(b.vel.x, 3.0);
    }

    #[test]
    fn test_ceiling_dead() {
        let mut b = ball(200.0, 20.0, 0.0, -4.0);
        apply_ceiling(&mut b, 20.0, CeilingMode::Dead);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_ceiling_elastic() {
        let mut b = ball(200.0, 10.0, 0.0, -4.0);
        apply_ceiling(&mut b, 20.0, CeilingMode::Elastic);
        assert_eq!(b.vel.y, 4.0);
    }

    #[test]
    fn test_ceiling_off_or_below() {
        let mut b = ball(200.0, 10.0, 0.0, -4.0);
        apply_ceiling(&mut b, 20.0, CeilingMode::Off);
        assert_eq!(b.vel.y, -4.0);

        let mut b = ball(200.0, 21.0, 0.0, -4.0);
        apply_ceiling(&mut b, 20.0, CeilingMode::Dead);
        assert_eq!(b.vel.y, -4.0);
    }

    #[test]
    fn test_ball_bounce_separated() {
        let mut a = ball(0.0, 0.0, 1.0, 2.0);
        let mut b = ball(41.0, 0.0, -1.0, 0.5);
        assert!(ball_bounce(&mut a, &mut b, 20.0, 0.005).is_none());
        assert_eq!(a.vel, Vec2::new(1.0, 2.0));
        assert_eq!(b.vel, Vec2::new(-1.0, 0.5));
    }

    #[test]
    fn test_ball_bounce_equal_and_opposite() {
        let mut a = ball(0.0, 0.0, 0.0, 0.0);
        let mut b = ball(30.0, 0.0, 0.0, 0.0);
        let accel = ball_bounce(&mut a, &mut b, 20.0, 0.005).unwrap();

        // penetration -10, d = (-30, 0): accel = -0.005 * -10 * (-30, 0)
        assert!((accel - Vec2::new(-1.5, 0.0)).length() < 1e-6);
        assert_eq!(a.vel, accel);
        assert_eq!(b.vel, -accel);
        // Pushed apart
        assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
    }

    #[test]
    fn test_resolve_ball_pairs_counts_overlaps() {
        let mut balls = vec![
            ball(0.0, 0.0, 0.0, 0.0),
            ball(30.0, 0.0, 0.0, 0.0),
            ball(500.0, 0.0, 0.0, 0.0),
        ];
        assert_eq!(resolve_ball_pairs(&mut balls, 20.0, 0.005), 1);
        assert_eq!(balls[2].vel, Vec2::ZERO);
        let total: Vec2 = balls.iter().map(|b| b.vel).sum();
        assert!(total.length() < 1e-6);
    }
}
