use serde::{Deserialize, Serialize};

use crate::level::Point;
use crate::physics::Aabb;

pub const CHECKPOINT_WIDTH: f32 = 24.0;
pub const CHECKPOINT_HEIGHT: f32 = 64.0;

/// Which checkpoint, if any, the player respawns at. Storing a single index
/// means at most one can ever be active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRegistry {
    points: Vec<Point>,
    active: Option<usize>,
    respawn_lift: f32,
}

impl CheckpointRegistry {
    pub fn from_level(points: &[Point], respawn_lift: f32) -> Self {
        Self {
            points: points.to_vec(),
            active: None,
            respawn_lift,
        }
    }

    /// Make `i` the active checkpoint. False if it already is or does not
    /// exist.
    pub fn activate(&mut self, i: usize) -> bool {
        if i >= self.points.len() || self.active == Some(i) {
            return false;
        }
        self.active = Some(i);
        true
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, i: usize) -> bool {
        self.active == Some(i)
    }

    /// Where the player reappears: above the active checkpoint.
    pub fn respawn_point(&self) -> Option<(f32, f32)> {
        let p = self.points.get(self.active?)?;
        Some((p.x, p.y - self.respawn_lift))
    }

    pub fn reset(&mut self) {
        self.active = None;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn trigger_aabb(&self, i: usize) -> Option<Aabb> {
        self.points
            .get(i)
            .map(|p| Aabb::from_center(p.x, p.y, CHECKPOINT_WIDTH, CHECKPOINT_HEIGHT))
    }

    /// First inactive checkpoint whose trigger overlaps `bounds`.
    pub fn inactive_overlapping(&self, bounds: &Aabb) -> Option<usize> {
        (0..self.points.len()).find(|&i| {
            !self.is_active(i) && self.trigger_aabb(i).is_some_and(|t| t.overlaps(bounds))
        })
    }
}
