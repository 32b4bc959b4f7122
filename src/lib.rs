//! Juggler - a fixed-step 2D juggling simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hands, balls, springs, scheduler)
//! - `config`: Runtime tunables with validated setters
//! - `vector`: 2D vector helpers over `glam::Vec2`
//! - `platform`: Host input adapters (pointer/touch to hand mapping)

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;
pub mod vector;

pub use config::{CeilingMode, Tunables, WorldConfig};
pub use error::ConfigError;

/// Simulation constants
pub mod consts {
    /// Fixed simulation tick interval in milliseconds (30 Hz)
    pub const TICK_INTERVAL_MS: f64 = 1000.0 / 30.0;

    /// Default gravity (pixels/tick²)
    pub const GRAVITY: f32 = 0.15;
    /// Default spring compliance divisor (stiffness = gravity / force)
    pub const FORCE: f32 = 1.0;
    /// Spring damping between a caught ball and its hand
    pub const SPRING_DAMPING: f32 = 0.3;
    /// Default pairwise ball repulsion constant
    pub const BALL_STIFFNESS: f32 = 0.005;
    /// Default maximum hand displacement per tick (pixels)
    pub const MAX_HAND_SPEED: f32 = 20.0;

    /// Body radii
    pub const HAND_RADIUS: f32 = 80.0;
    pub const BALL_RADIUS: f32 = 20.0;

    /// Default play field
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Vertical velocity forced on a ball resting below the floor line
    pub const FLOOR_KICK: f32 = -2.0;

    /// Spawned ball velocity ranges (pixels/tick)
    pub const SPAWN_MAX_SPEED_X: f32 = 2.0;
    pub const SPAWN_MAX_RISE: f32 = 5.0;
}
