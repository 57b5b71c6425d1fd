//! Enemy patrol and flight behavior, plus stomp-vs-hurt classification.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::level::{EnemyKindSpec, EnemySpec};
use crate::physics::Body;
use crate::player::Facing;

pub const GROUND_SPEED: f32 = 90.0;
pub const FLYING_SPEED: f32 = 95.0;
pub const BOB_AMPLITUDE: f32 = 18.0;
/// Radians per second.
pub const BOB_SPEED: f32 = 2.0;

pub const GROUND_SIZE: (f32, f32) = (28.0, 28.0);
pub const FLYING_SIZE: (f32, f32) = (28.0, 18.0);

/// Bounded horizontal oscillation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub min_x: f32,
    pub max_x: f32,
    pub direction: f32,
    pub speed: f32,
}

impl Patrol {
    /// Re-check the bounds at `x` and return the horizontal velocity to use.
    /// Runs every tick, so an enemy pushed outside its range walks back in.
    pub fn steer(&mut self, x: f32) -> f32 {
        if x <= self.min_x {
            self.direction = 1.0;
        }
        if x >= self.max_x {
            self.direction = -1.0;
        }
        self.direction * self.speed
    }
}

/// Vertical sinusoid for flying enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    pub base_y: f32,
    pub amplitude: f32,
    pub angular_speed: f32,
    pub phase: f32,
}

impl Bob {
    pub fn y_at(&self, elapsed_secs: f64) -> f32 {
        let angle = elapsed_secs * f64::from(self.angular_speed) + f64::from(self.phase);
        self.base_y + angle.sin() as f32 * self.amplitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Ground,
    Flying(Bob),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub patrol: Patrol,
    pub body: Body,
    pub facing: Facing,
}

impl Enemy {
    pub fn from_spec(spec: &EnemySpec, rng: &mut StdRng) -> Self {
        match spec.kind {
            EnemyKindSpec::Ground => {
                let speed = spec.speed.unwrap_or(GROUND_SPEED);
                let (w, h) = GROUND_SIZE;
                let mut body = Body::new(spec.x, spec.y, w, h).with_world_bounds(true);
                body.vx = speed;
                Self {
                    kind: EnemyKind::Ground,
                    patrol: Patrol {
                        min_x: spec.min_x,
                        max_x: spec.max_x,
                        direction: 1.0,
                        speed,
                    },
                    body,
                    facing: Facing::Right,
                }
            },
            EnemyKindSpec::Flying => {
                let speed = spec.speed.unwrap_or(FLYING_SPEED);
                let (w, h) = FLYING_SIZE;
                let mut body = Body::new(spec.x, spec.y, w, h)
                    .with_gravity(false)
                    .with_world_bounds(true);
                body.vx = speed;
                let phase = spec.phase.unwrap_or_else(|| rng.random_range(0.0..TAU));
                Self {
                    kind: EnemyKind::Flying(Bob {
                        base_y: spec.y,
                        amplitude: spec.bob_amplitude.unwrap_or(BOB_AMPLITUDE),
                        angular_speed: spec.bob_speed.unwrap_or(BOB_SPEED),
                        phase,
                    }),
                    patrol: Patrol {
                        min_x: spec.min_x,
                        max_x: spec.max_x,
                        direction: 1.0,
                        speed,
                    },
                    body,
                    facing: Facing::Right,
                }
            },
        }
    }

    /// Per-tick AI: steer the patrol and, for flyers, overwrite y from the
    /// bob and resync bounds.
    pub fn update(&mut self, elapsed_secs: f64) {
        self.body.vx = self.patrol.steer(self.body.x);
        self.facing = if self.patrol.direction < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        };
        if let EnemyKind::Flying(bob) = &self.kind {
            self.body.y = bob.y_at(elapsed_secs);
            self.body.sync_bounds();
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.kind, EnemyKind::Flying(_))
    }
}

/// Build the live enemy set for a level. The same seed always yields the
/// same flying phases.
pub fn spawn_enemies(specs: &[EnemySpec], seed: u64) -> Vec<Enemy> {
    let mut rng = StdRng::seed_from_u64(seed);
    specs.iter().map(|s| Enemy::from_spec(s, &mut rng)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    Stomp,
    Hurt,
}

/// Stomp iff the player is falling and sits above the enemy by more than the
/// kind's padding. Flyers get the smaller padding.
pub fn classify_contact(
    player_y: f32,
    player_vy: f32,
    enemy_y: f32,
    kind: &EnemyKind,
    rules: &RulesConfig,
) -> ContactOutcome {
    let padding = match kind {
        EnemyKind::Ground => rules.stomp_padding_ground,
        EnemyKind::Flying(_) => rules.stomp_padding_flying,
    };
    if player_vy > 0.0 && player_y < enemy_y - padding {
        ContactOutcome::Stomp
    } else {
        ContactOutcome::Hurt
    }
}
