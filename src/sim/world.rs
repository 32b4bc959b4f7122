//! World state: hands, balls, config and RNG
//!
//! This is the whole of the mutable simulation. Input adapters and control surfaces
//! talk to it between ticks; render adapters read `snapshot()`.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Ball, Hand, HandId};
use super::snapshot::{BallView, HandView, Snapshot};
use crate::config::{CeilingMode, WorldConfig};
use crate::consts::{SPAWN_MAX_RISE, SPAWN_MAX_SPEED_X};
use crate::error::ConfigResult;

#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    config: WorldConfig,
    /// Live hands, iterated in id order
    hands: BTreeMap<HandId, Hand>,
    /// Balls in spawn order; never removed
    pub balls: Vec<Ball>,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    next_hand_id: u32,
}

impl World {
    /// Create a world with the two opening balls: one resting at the top center, one
    /// thrown up from the floor.
    pub fn new(config: WorldConfig, seed: u64) -> Self {
        let center_x = config.width() / 2.0;
        let balls = vec![
            Ball::new(Vec2::new(center_x, 0.0), Vec2::ZERO),
            Ball::new(Vec2::new(center_x, config.height()), Vec2::new(0.5, -15.0)),
        ];
        log::info!(
            "World created ({}x{}, seed {})",
            config.width(),
            config.height(),
            seed
        );
        Self {
            seed,
            config,
            hands: BTreeMap::new(),
            balls,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_hand_id: 1,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Split borrow for the tick loop
    pub(crate) fn parts_mut(&mut self) -> (&WorldConfig, &mut BTreeMap<HandId, Hand>, &mut Vec<Ball>) {
        (&self.config, &mut self.hands, &mut self.balls)
    }

    // --- Input adapter ---

    /// Create a hand at rest at `pos`
    pub fn add_hand(&mut self, pos: Vec2) -> HandId {
        let id = HandId(self.next_hand_id);
        self.next_hand_id += 1;
        self.hands.insert(id, Hand::new(id, pos));
        log::debug!("Added {} at ({:.0}, {:.0})", id, pos.x, pos.y);
        id
    }

    /// Remove a hand. Unknown ids are ignored.
    pub fn remove_hand(&mut self, id: HandId) {
        if self.hands.remove(&id).is_some() {
            log::debug!("Removed {}", id);
        } else {
            log::debug!("Ignoring removal of unknown {}", id);
        }
    }

    /// Point a hand at a new target. Unknown ids are ignored.
    pub fn set_hand_target(&mut self, id: HandId, target: Vec2) {
        match self.hands.get_mut(&id) {
            Some(hand) if target.is_finite() => hand.target = target,
            Some(_) => log::warn!("Ignoring non-finite target for {}", id),
            None => log::debug!("Ignoring target for unknown {}", id),
        }
    }

    pub fn hand(&self, id: HandId) -> Option<&Hand> {
        self.hands.get(&id)
    }

    pub fn hands(&self) -> impl Iterator<Item = &Hand> {
        self.hands.values()
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    // --- Control surface ---

    pub fn set_gravity(&mut self, gravity: f32) -> ConfigResult<()> {
        self.config
            .set_gravity(gravity)
            .inspect_err(|e| log::warn!("Rejected gravity: {}", e))
    }

    pub fn set_force(&mut self, force: f32) -> ConfigResult<()> {
        self.config
            .set_force(force)
            .inspect_err(|e| log::warn!("Rejected force: {}", e))
    }

    pub fn set_ball_stiffness(&mut self, ball_stiffness: f32) -> ConfigResult<()> {
        self.config
            .set_ball_stiffness(ball_stiffness)
            .inspect_err(|e| log::warn!("Rejected ball stiffness: {}", e))
    }

    pub fn set_max_hand_speed(&mut self, max_hand_speed: f32) -> ConfigResult<()> {
        self.config
            .set_max_hand_speed(max_hand_speed)
            .inspect_err(|e| log::warn!("Rejected max hand speed: {}", e))
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) -> ConfigResult<()> {
        self.config
            .set_bounds(width, height)
            .inspect_err(|e| log::warn!("Rejected bounds: {}", e))
    }

    pub fn set_radii(&mut self, hand_radius: f32, ball_radius: f32) -> ConfigResult<()> {
        self.config
            .set_radii(hand_radius, ball_radius)
            .inspect_err(|e| log::warn!("Rejected radii: {}", e))
    }

    pub fn set_ceiling_mode(&mut self, mode: CeilingMode) {
        log::info!("Ceiling mode: {}", mode.as_str());
        self.config.set_ceiling_mode(mode);
    }

    pub fn set_damping_visualization(&mut self, enabled: bool) {
        self.config.set_damping_visualization(enabled);
    }

    /// Append one ball at a random spot in the upper half of the field, drifting
    /// sideways and rising.
    pub fn spawn_ball(&mut self) {
        let r = self.config.ball_radius();
        let x = self.rng.random_range(r..=self.config.width() - r);
        let y = self.rng.random_range(r..=self.config.height() / 2.0);
        let vx = self.rng.random_range(-SPAWN_MAX_SPEED_X..=SPAWN_MAX_SPEED_X);
        let vy = self.rng.random_range(-SPAWN_MAX_RISE..=0.0);
        self.balls.push(Ball::new(Vec2::new(x, y), Vec2::new(vx, vy)));
        log::info!("Spawned ball #{} at ({:.0}, {:.0})", self.balls.len(), x, y);
    }

    // --- Render adapter ---

    /// Read-only view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let show_acceleration = self.config.damping_visualization();
        Snapshot {
            tick: self.time_ticks,
            hand_radius: self.config.hand_radius(),
            ball_radius: self.config.ball_radius(),
            show_acceleration,
            hands: self
                .hands
                .values()
                .map(|h| HandView {
                    id: h.id,
                    pos: h.pos,
                    vel: h.vel,
                    target: h.target,
                })
                .collect(),
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    pos: b.pos,
                    vel: b.vel,
                    acceleration: b.acceleration(),
                })
                .collect(),
        }
    }
}
