use serde::{Deserialize, Serialize};

use crate::level::MovingPlatformSpec;
use crate::physics::{Aabb, Body};

/// Kinematic platform ping-ponging along a line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub start_x: f32,
    pub start_y: f32,
    pub dx: f32,
    pub dy: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    /// Progress along the segment, always in [0, 1].
    pub t: f32,
    pub direction: f32,
    pub x: f32,
    pub y: f32,
    pub last_x: f32,
    pub last_y: f32,
    /// Set by the game when the player landed on this platform this tick.
    pub touched_up: bool,
}

impl MovingPlatform {
    pub fn from_spec(spec: &MovingPlatformSpec) -> Self {
        Self {
            start_x: spec.x,
            start_y: spec.y,
            dx: spec.dx,
            dy: spec.dy,
            speed: spec.speed,
            width: spec.w,
            height: spec.h,
            t: 0.0,
            direction: 1.0,
            x: spec.x,
            y: spec.y,
            last_x: spec.x,
            last_y: spec.y,
            touched_up: false,
        }
    }

    /// Seconds for one end-to-end trip, or `None` when the platform has
    /// nowhere to go.
    pub fn one_way_time(&self) -> Option<f32> {
        let distance = self.dx.hypot(self.dy);
        if distance > 0.0 {
            Some(distance / self.speed.max(1.0))
        } else {
            None
        }
    }

    /// Pre-physics step: cache the current position, then advance along the
    /// segment, reflecting at either end.
    pub fn advance(&mut self, dt: f32) {
        self.last_x = self.x;
        self.last_y = self.y;
        self.touched_up = false;

        let Some(one_way) = self.one_way_time() else {
            return;
        };
        self.t += dt / one_way * self.direction;
        if self.t >= 1.0 {
            self.t = 1.0;
            self.direction = -1.0;
        } else if self.t <= 0.0 {
            self.t = 0.0;
            self.direction = 1.0;
        }
        self.x = self.start_x + self.dx * self.t;
        self.y = self.start_y + self.dy * self.t;
    }

    /// Displacement applied by the most recent [`MovingPlatform::advance`].
    pub fn delta(&self) -> (f32, f32) {
        (self.x - self.last_x, self.y - self.last_y)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, self.width, self.height)
    }

    /// Bounds before the most recent advance. The solver separates riders
    /// against these so the frame delta reaches them only through [`carry`].
    pub fn previous_aabb(&self) -> Aabb {
        Aabb::from_center(self.last_x, self.last_y, self.width, self.height)
    }
}

/// Post-physics carry: translate `body` by the delta of every platform it is
/// standing on. Returns true if any carry happened.
pub fn carry(body: &mut Body, platforms: &[MovingPlatform]) -> bool {
    if !body.touching.down {
        return false;
    }
    let mut carried = false;
    for platform in platforms.iter().filter(|p| p.touched_up) {
        let (dx, dy) = platform.delta();
        if dx == 0.0 && dy == 0.0 {
            continue;
        }
        body.translate(dx, dy);
        carried = true;
    }
    carried
}
