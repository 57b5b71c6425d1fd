//! Kinematic body adapter and the arcade solver that steps it.
//!
//! Coordinates are pixels with +y pointing down; body positions are centers.
//! The solver is intentionally small: gravity, linear horizontal drag,
//! velocity clamping, AABB separation against static rectangles and
//! kinematic platforms, and world-bounds clamping on the left, right and top
//! edges. The bottom edge stays open so bodies can reach the kill plane.

use serde::{Deserialize, Serialize};

/// Tolerance used when deciding which side a body came from.
const SIDE_EPSILON: f32 = 0.01;

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            left: x - hw,
            top: y - hh,
            right: x + hw,
            bottom: y + hh,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Whether a circle at (cx, cy) with `radius` intersects this rectangle.
    pub fn overlaps_circle(&self, cx: f32, cy: f32, radius: f32) -> bool {
        let nx = cx.clamp(self.left, self.right);
        let ny = cy.clamp(self.top, self.bottom);
        let dx = cx - nx;
        let dy = cy - ny;
        dx * dx + dy * dy < radius * radius
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }
}

/// Contact flags reported by the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Side of an obstacle a body was pushed out through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A rectangular rigid body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub allow_gravity: bool,
    pub drag_x: f32,
    pub max_vx: f32,
    pub max_vy: f32,
    /// When false the solver neither integrates nor separates this body.
    pub moves: bool,
    pub collide_world_bounds: bool,
    pub touching: Touching,
    bounds: Aabb,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            vx: 0.0,
            vy: 0.0,
            allow_gravity: true,
            drag_x: 0.0,
            max_vx: f32::MAX,
            max_vy: f32::MAX,
            moves: true,
            collide_world_bounds: false,
            touching: Touching::default(),
            bounds: Aabb::from_center(x, y, width, height),
        }
    }

    pub fn with_gravity(mut self, allow: bool) -> Self {
        self.allow_gravity = allow;
        self
    }

    pub fn with_drag_x(mut self, drag: f32) -> Self {
        self.drag_x = drag;
        self
    }

    pub fn with_max_velocity(mut self, max_vx: f32, max_vy: f32) -> Self {
        self.max_vx = max_vx;
        self.max_vy = max_vy;
        self
    }

    pub fn with_world_bounds(mut self, collide: bool) -> Self {
        self.collide_world_bounds = collide;
        self
    }

    /// Bounds as of the last solver step or [`Body::sync_bounds`] call.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Recompute cached bounds after writing `x`/`y` directly.
    pub fn sync_bounds(&mut self) {
        self.bounds = Aabb::from_center(self.x, self.y, self.width, self.height);
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    /// Teleport to (x, y) at rest.
    pub fn reset(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.touching = Touching::default();
        self.sync_bounds();
    }

    /// Move by (dx, dy) without touching velocity.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
        self.sync_bounds();
    }

    fn apply_drag(&mut self, dt: f32) {
        if self.drag_x <= 0.0 {
            return;
        }
        let dv = self.drag_x * dt;
        if self.vx.abs() <= dv {
            self.vx = 0.0;
        } else {
            self.vx -= dv * self.vx.signum();
        }
    }

    /// Push this body out of `obstacle`, choosing the side it came from when
    /// the previous bounds make that unambiguous and the side of minimum
    /// penetration otherwise.
    fn separate(&mut self, prev: &Aabb, obstacle: &Aabb) -> Option<Side> {
        let cur = self.bounds;
        if !cur.overlaps(obstacle) {
            return None;
        }

        let side = if prev.bottom <= obstacle.top + SIDE_EPSILON {
            Side::Top
        } else if prev.top >= obstacle.bottom - SIDE_EPSILON {
            Side::Bottom
        } else if prev.right <= obstacle.left + SIDE_EPSILON {
            Side::Left
        } else if prev.left >= obstacle.right - SIDE_EPSILON {
            Side::Right
        } else {
            let overlap_top = cur.bottom - obstacle.top;
            let overlap_bottom = obstacle.bottom - cur.top;
            let overlap_left = cur.right - obstacle.left;
            let overlap_right = obstacle.right - cur.left;
            let min_overlap = overlap_top
                .min(overlap_bottom)
                .min(overlap_left)
                .min(overlap_right);
            if min_overlap == overlap_top {
                Side::Top
            } else if min_overlap == overlap_bottom {
                Side::Bottom
            } else if min_overlap == overlap_left {
                Side::Left
            } else {
                Side::Right
            }
        };

        match side {
            Side::Top => {
                // Landed on the obstacle
                self.y = obstacle.top - self.height / 2.0;
                if self.vy > 0.0 {
                    self.vy = 0.0;
                }
                self.touching.down = true;
            },
            Side::Bottom => {
                // Hit head
                self.y = obstacle.bottom + self.height / 2.0;
                if self.vy < 0.0 {
                    self.vy = 0.0;
                }
                self.touching.up = true;
            },
            Side::Left => {
                self.x = obstacle.left - self.width / 2.0;
                if self.vx > 0.0 {
                    self.vx = 0.0;
                }
                self.touching.right = true;
            },
            Side::Right => {
                self.x = obstacle.right + self.width / 2.0;
                if self.vx < 0.0 {
                    self.vx = 0.0;
                }
                self.touching.left = true;
            },
        }
        self.sync_bounds();
        Some(side)
    }
}

/// What a single body step ran into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Indices into the kinematic slice this body landed on top of.
    pub landed_on: Vec<usize>,
}

/// Arcade-style world: gravity, bounds and a pause switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcadeWorld {
    pub gravity_y: f32,
    pub width: f32,
    pub height: f32,
    pub paused: bool,
}

impl ArcadeWorld {
    pub fn new(gravity_y: f32, width: f32, height: f32) -> Self {
        Self {
            gravity_y,
            width,
            height,
            paused: false,
        }
    }

    /// Integrate one body for `dt` seconds and separate it from `statics`
    /// and `kinematics`. Contact flags are cleared first, so a frozen body or
    /// a paused world reports no contacts.
    pub fn step(
        &self,
        body: &mut Body,
        dt: f32,
        statics: &[Aabb],
        kinematics: &[Aabb],
    ) -> StepReport {
        body.touching = Touching::default();
        let mut report = StepReport::default();
        if self.paused || !body.moves || !dt.is_finite() || dt <= 0.0 {
            return report;
        }

        if body.allow_gravity {
            body.vy += self.gravity_y * dt;
        }
        body.apply_drag(dt);
        body.vx = body.vx.clamp(-body.max_vx, body.max_vx);
        body.vy = body.vy.clamp(-body.max_vy, body.max_vy);

        let prev = body.bounds;
        body.x += body.vx * dt;
        body.y += body.vy * dt;
        body.sync_bounds();

        for obstacle in statics {
            body.separate(&prev, obstacle);
        }
        for (i, obstacle) in kinematics.iter().enumerate() {
            if body.separate(&prev, obstacle) == Some(Side::Top) {
                report.landed_on.push(i);
            }
        }

        if body.collide_world_bounds {
            self.clamp_to_bounds(body);
        }
        report
    }

    fn clamp_to_bounds(&self, body: &mut Body) {
        let hw = body.width / 2.0;
        let hh = body.height / 2.0;
        if body.x - hw < 0.0 {
            body.x = hw;
            body.vx = body.vx.max(0.0);
            body.touching.left = true;
        } else if body.x + hw > self.width {
            body.x = self.width - hw;
            body.vx = body.vx.min(0.0);
            body.touching.right = true;
        }
        if body.y - hh < 0.0 {
            body.y = hh;
            body.vy = body.vy.max(0.0);
            body.touching.up = true;
        }
        body.sync_bounds();
    }
}
