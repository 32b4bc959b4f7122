//! Pointer and touch input to hand mapping
//!
//! Each active pointer owns one hand. Touches are keyed by their host identifier, not
//! their position in the host's touch list, so ending one touch never rebinds another.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::{HandId, World};

/// Host pointer identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointerId {
    Mouse,
    Touch(i32),
}

#[derive(Debug, Clone, Default)]
pub struct PointerHands {
    bound: BTreeMap<PointerId, HandId>,
}

impl PointerHands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand_for(&self, pointer: PointerId) -> Option<HandId> {
        self.bound.get(&pointer).copied()
    }

    pub fn active(&self) -> usize {
        self.bound.len()
    }

    /// Pointer became active: bind a new hand, or retarget the existing one
    pub fn pointer_down(&mut self, world: &mut World, pointer: PointerId, pos: Vec2) -> HandId {
        if let Some(id) = self.hand_for(pointer) {
            world.set_hand_target(id, pos);
            return id;
        }
        let id = world.add_hand(pos);
        self.bound.insert(pointer, id);
        id
    }

    /// Pointer moved. A mouse gets a hand on its first move; an unknown touch is ignored.
    pub fn pointer_move(&mut self, world: &mut World, pointer: PointerId, pos: Vec2) {
        match (self.hand_for(pointer), pointer) {
            (Some(id), _) => world.set_hand_target(id, pos),
            (None, PointerId::Mouse) => {
                self.pointer_down(world, pointer, pos);
            }
            (None, PointerId::Touch(_)) => {}
        }
    }

    /// Pointer ended: its hand is destroyed
    pub fn pointer_up(&mut self, world: &mut World, pointer: PointerId) {
        if let Some(id) = self.bound.remove(&pointer) {
            world.remove_hand(id);
        }
    }

    /// Drop hands for every touch not in `active` (the host's remaining touch list)
    pub fn retain_touches(&mut self, world: &mut World, active: &[i32]) {
        let ended: Vec<PointerId> = self
            .bound
            .keys()
            .copied()
            .filter(|p| matches!(p, PointerId::Touch(t) if !active.contains(t)))
            .collect();
        for pointer in ended {
            self.pointer_up(world, pointer);
        }
    }
}
