//! World tunables
//!
//! Every value the simulation reads each tick lives here. Setters validate at the
//! boundary and keep the previous value on rejection.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// What happens when a ball reaches the top of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CeilingMode {
    /// No ceiling, balls fly off the top and come back down
    #[default]
    Off,
    /// Vertical velocity is inverted
    Elastic,
    /// Vertical velocity is zeroed
    Dead,
}

impl CeilingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CeilingMode::Off => "off",
            CeilingMode::Elastic => "elastic",
            CeilingMode::Dead => "dead",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(CeilingMode::Off),
            "elastic" | "bounce" => Some(CeilingMode::Elastic),
            "dead" | "stop" => Some(CeilingMode::Dead),
            _ => None,
        }
    }
}

/// Raw tunables, as written in a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub gravity: f32,
    pub force: f32,
    pub ball_stiffness: f32,
    pub max_hand_speed: f32,
    pub width: f32,
    pub height: f32,
    pub hand_radius: f32,
    pub ball_radius: f32,
    pub ceiling_mode: CeilingMode,
    pub damping_visualization: bool,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            force: FORCE,
            ball_stiffness: BALL_STIFFNESS,
            max_hand_speed: MAX_HAND_SPEED,
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            hand_radius: HAND_RADIUS,
            ball_radius: BALL_RADIUS,
            ceiling_mode: CeilingMode::Off,
            damping_visualization: false,
        }
    }
}

fn finite(field: &'static str, value: f32) -> ConfigResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite {
            field,
            value: value as f64,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> ConfigResult<f32> {
    if finite(field, value)? < 0.0 {
        return Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            reason: "must not be negative",
        });
    }
    Ok(value)
}

fn positive(field: &'static str, value: f32) -> ConfigResult<f32> {
    if finite(field, value)? <= 0.0 {
        return Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            reason: "must be positive",
        });
    }
    Ok(value)
}

/// A ball must fit inside the field in both directions.
fn check_fit(width: f32, height: f32, ball_radius: f32) -> ConfigResult<()> {
    let diameter = 2.0 * ball_radius;
    if width < diameter {
        return Err(ConfigError::OutOfRange {
            field: "width",
            value: width as f64,
            reason: "must be at least one ball diameter",
        });
    }
    if height < diameter {
        return Err(ConfigError::OutOfRange {
            field: "height",
            value: height as f64,
            reason: "must be at least one ball diameter",
        });
    }
    Ok(())
}

/// Validated world configuration.
///
/// `stiffness` and `speed_limit` are derived and always recomputed together, so they
/// can never be stale relative to gravity, force or field height.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    gravity: f32,
    force: f32,
    stiffness: f32,
    speed_limit: f32,
    ball_stiffness: f32,
    max_hand_speed: f32,
    width: f32,
    height: f32,
    hand_radius: f32,
    ball_radius: f32,
    ceiling_mode: CeilingMode,
    damping_visualization: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let mut config = Self {
            gravity: GRAVITY,
            force: FORCE,
            stiffness: 0.0,
            speed_limit: 0.0,
            ball_stiffness: BALL_STIFFNESS,
            max_hand_speed: MAX_HAND_SPEED,
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            hand_radius: HAND_RADIUS,
            ball_radius: BALL_RADIUS,
            ceiling_mode: CeilingMode::Off,
            damping_visualization: false,
        };
        config.recompute_derived();
        config
    }
}

impl TryFrom<Tunables> for WorldConfig {
    type Error = ConfigError;

    fn try_from(t: Tunables) -> ConfigResult<Self> {
        let mut config = Self::default();
        // Field and radii constrain each other, so they are checked as a set.
        let width = positive("width", t.width)?;
        let height = positive("height", t.height)?;
        config.hand_radius = positive("hand_radius", t.hand_radius)?;
        let ball_radius = positive("ball_radius", t.ball_radius)?;
        check_fit(width, height, ball_radius)?;
        config.width = width;
        config.height = height;
        config.ball_radius = ball_radius;
        config.set_force(t.force)?;
        config.set_gravity(t.gravity)?;
        config.set_ball_stiffness(t.ball_stiffness)?;
        config.set_max_hand_speed(t.max_hand_speed)?;
        config.set_ceiling_mode(t.ceiling_mode);
        config.set_damping_visualization(t.damping_visualization);
        Ok(config)
    }
}

impl WorldConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let tunables: Tunables = serde_json::from_str(json)?;
        Self::try_from(tunables)
    }

    /// Export the current values in config-file form
    pub fn tunables(&self) -> Tunables {
        Tunables {
            gravity: self.gravity,
            force: self.force,
            ball_stiffness: self.ball_stiffness,
            max_hand_speed: self.max_hand_speed,
            width: self.width,
            height: self.height,
            hand_radius: self.hand_radius,
            ball_radius: self.ball_radius,
            ceiling_mode: self.ceiling_mode,
            damping_visualization: self.damping_visualization,
        }
    }

    fn recompute_derived(&mut self) {
        self.stiffness = self.gravity / self.force;
        self.speed_limit = (self.height * self.gravity).sqrt();
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn force(&self) -> f32 {
        self.force
    }

    /// Spring constant, `gravity / force`
    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Upward ball speed above which hands stop pushing, `sqrt(height * gravity)`
    pub fn speed_limit(&self) -> f32 {
        self.speed_limit
    }

    pub fn ball_stiffness(&self) -> f32 {
        self.ball_stiffness
    }

    pub fn max_hand_speed(&self) -> f32 {
        self.max_hand_speed
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn hand_radius(&self) -> f32 {
        self.hand_radius
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_radius
    }

    pub fn ceiling_mode(&self) -> CeilingMode {
        self.ceiling_mode
    }

    pub fn damping_visualization(&self) -> bool {
        self.damping_visualization
    }

    pub fn set_gravity(&mut self, gravity: f32) -> ConfigResult<()> {
        self.gravity = non_negative("gravity", gravity)?;
        self.recompute_derived();
        Ok(())
    }

    pub fn set_force(&mut self, force: f32) -> ConfigResult<()> {
        self.force = positive("force", force)?;
        self.recompute_derived();
        Ok(())
    }

    pub fn set_ball_stiffness(&mut self, ball_stiffness: f32) -> ConfigResult<()> {
        self.ball_stiffness = non_negative("ball_stiffness", ball_stiffness)?;
        Ok(())
    }

    pub fn set_max_hand_speed(&mut self, max_hand_speed: f32) -> ConfigResult<()> {
        self.max_hand_speed = non_negative("max_hand_speed", max_hand_speed)?;
        Ok(())
    }

    /// Resize the play field. Both sides must fit a ball.
    pub fn set_bounds(&mut self, width: f32, height: f32) -> ConfigResult<()> {
        let width = positive("width", width)?;
        let height = positive("height", height)?;
        check_fit(width, height, self.ball_radius)?;
        self.width = width;
        self.height = height;
        self.recompute_derived();
        Ok(())
    }

    pub fn set_radii(&mut self, hand_radius: f32, ball_radius: f32) -> ConfigResult<()> {
        let hand_radius = positive("hand_radius", hand_radius)?;
        let ball_radius = positive("ball_radius", ball_radius)?;
        check_fit(self.width, self.height, ball_radius)?;
        self.hand_radius = hand_radius;
        self.ball_radius = ball_radius;
        Ok(())
    }

    pub fn set_ceiling_mode(&mut self, mode: CeilingMode) {
        self.ceiling_mode = mode;
    }

    /// Diagnostic overlay toggle, no physics effect
    pub fn set_damping_visualization(&mut self, enabled: bool) {
        self.damping_visualization = enabled;
    }
}
