use serde::{Deserialize, Serialize};

use crate::config::{FeelConfig, PhysicsConfig};
use crate::input::InputFrame;
use crate::physics::Body;

/// Timestamp meaning "never". Finite so snapshots survive JSON.
pub const FAR_PAST_MS: f64 = -1.0e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Advisory animation state for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    Run,
    Jump,
    Fall,
}

/// The player body plus the jump-timing bookkeeping that makes jumps
/// forgiving: coyote time after leaving a ledge and a buffer for early
/// presses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    pub body: Body,
    pub last_on_ground_at: f64,
    pub last_jump_pressed_at: f64,
    pub frozen: bool,
    pub facing: Facing,
}

impl PlayerController {
    pub fn spawn(x: f32, y: f32, physics: &PhysicsConfig) -> Self {
        let body = Body::new(x, y, physics.player_width, physics.player_height)
            .with_drag_x(physics.drag_x)
            .with_max_velocity(physics.max_velocity_x, physics.max_velocity_y)
            .with_world_bounds(true);
        Self {
            body,
            last_on_ground_at: FAR_PAST_MS,
            last_jump_pressed_at: FAR_PAST_MS,
            frozen: false,
            facing: Facing::Right,
        }
    }

    /// Apply one tick of input after the physics step. Returns true when a
    /// jump impulse fired.
    pub fn update(&mut self, input: &InputFrame, now_ms: f64, feel: &FeelConfig) -> bool {
        if self.frozen {
            return false;
        }

        let grounded = self.body.touching.down;
        if grounded {
            self.last_on_ground_at = now_ms;
        }

        // Right is applied second so it wins a tie.
        if input.left {
            self.body.vx = -feel.move_speed;
            self.facing = Facing::Left;
        }
        if input.right {
            self.body.vx = feel.move_speed;
            self.facing = Facing::Right;
        }

        if input.jump_pressed {
            self.last_jump_pressed_at = now_ms;
        }

        let buffered = now_ms - self.last_jump_pressed_at <= feel.jump_buffer_ms;
        let coyote = now_ms - self.last_on_ground_at <= feel.coyote_ms;
        if buffered && (grounded || coyote) {
            self.body.vy = -feel.jump_speed;
            self.last_jump_pressed_at = FAR_PAST_MS;
            self.last_on_ground_at = FAR_PAST_MS;
            return true;
        }
        false
    }

    pub fn anim_state(&self, run_threshold: f32) -> AnimState {
        if self.frozen {
            return AnimState::Idle;
        }
        if !self.body.touching.down {
            return if self.body.vy < 0.0 {
                AnimState::Jump
            } else {
                AnimState::Fall
            };
        }
        if self.body.vx.abs() > run_threshold {
            AnimState::Run
        } else {
            AnimState::Idle
        }
    }

    /// Move to (x, y) at rest with both jump timers cleared.
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.body.reset(x, y);
        self.last_on_ground_at = FAR_PAST_MS;
        self.last_jump_pressed_at = FAR_PAST_MS;
    }

    /// Freezing stops integration and zeroes velocity.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
        self.body.moves = !frozen;
        if frozen {
            self.body.set_velocity(0.0, 0.0);
        }
    }
}
