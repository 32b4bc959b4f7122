//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (hands by id, balls by spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod motion;
pub mod scheduler;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use body::{Ball, Hand, HandId};
pub use collision::{ball_bounce, find_closest_hand, hand_spring, resolve_ball_pairs};
pub use motion::move_hand;
pub use scheduler::{FixedStepScheduler, FrameHost, SchedulerState};
pub use snapshot::{BallView, HandView, Snapshot};
pub use tick::{BallStep, TickReport, integrate_ball, tick};
pub use world::World;
