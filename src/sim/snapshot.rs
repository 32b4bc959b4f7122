//! Read-only render view of the world

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::HandId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandView {
    pub id: HandId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Velocity change over the last tick, for the diagnostic overlay
    pub acceleration: Vec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub hand_radius: f32,
    pub ball_radius: f32,
    /// Whether to draw `BallView::acceleration`
    pub show_acceleration: bool,
    pub hands: Vec<HandView>,
    pub balls: Vec<BallView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_shape() {
        let snap = Snapshot {
            tick: 3,
            hand_radius: 80.0,
            ball_radius: 20.0,
            show_acceleration: false,
            hands: vec![HandView {
                id: HandId(1),
                pos: Vec2::new(1.0, 2.0),
                vel: Vec2::ZERO,
                target: Vec2::new(1.0, 2.0),
            }],
            balls: Vec::new(),
        };
        let json: serde_json::Value = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["tick"], 3);
        assert_eq!(json["hands"][0]["id"], 1);
        assert_eq!(json["hands"][0]["pos"][0], 1.0);
        assert!(json["balls"].as_array().unwrap().is_empty());
    }
}
