//! Platform abstraction layer
//!
//! Host-side adapters that translate browser/native events into world calls.

pub mod input;

pub use input::{PointerHands, PointerId};
