use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::player::FAR_PAST_MS;

/// Top-level game mode. Only `Play` runs the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Play,
    Win,
    Lose,
}

impl Mode {
    /// Play -> Win. `None` from any other mode.
    pub fn win(self) -> Option<Mode> {
        match self {
            Mode::Play => Some(Mode::Win),
            Mode::Win | Mode::Lose => None,
        }
    }

    /// Play -> Lose. `None` from any other mode.
    pub fn lose(self) -> Option<Mode> {
        match self {
            Mode::Play => Some(Mode::Lose),
            Mode::Win | Mode::Lose => None,
        }
    }

    pub fn is_play(self) -> bool {
        self == Mode::Play
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Play => "play",
            Mode::Win => "win",
            Mode::Lose => "lose",
        }
    }
}

/// Result of a life-loss trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLoss {
    /// Invulnerable or not playing; nothing changed.
    Ignored,
    /// A life was spent and the player should respawn.
    Respawned,
    /// The last life was spent; mode is now `Lose`.
    GameOver,
}

/// Mode, score, lives and the invulnerability window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeState {
    pub mode: Mode,
    pub score: u32,
    pub lives: u32,
    pub invulnerable_until: f64,
    /// Bumped on every full reset and level load. Scheduled events compare
    /// against it to detect that they outlived their attempt.
    pub attempt: u32,
}

impl ModeState {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            mode: Mode::Play,
            score: 0,
            lives: rules.lives_start,
            invulnerable_until: FAR_PAST_MS,
            attempt: 0,
        }
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until
    }

    pub fn add_score(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    pub fn lose_life(&mut self, now_ms: f64, rules: &RulesConfig) -> LifeLoss {
        if !self.mode.is_play() || self.is_invulnerable(now_ms) {
            return LifeLoss::Ignored;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            if let Some(next) = self.mode.lose() {
                self.mode = next;
            }
            return LifeLoss::GameOver;
        }
        self.invulnerable_until = now_ms + rules.invuln_ms;
        LifeLoss::Respawned
    }

    /// Returns true if the transition happened.
    pub fn try_win(&mut self) -> bool {
        match self.mode.win() {
            Some(next) => {
                self.mode = next;
                true
            },
            None => false,
        }
    }

    /// Back to Play with a fresh score and full lives.
    pub fn full_reset(&mut self, rules: &RulesConfig) {
        self.mode = Mode::Play;
        self.score = 0;
        self.lives = rules.lives_start;
        self.invulnerable_until = FAR_PAST_MS;
        self.attempt = self.attempt.wrapping_add(1);
    }

    /// Back to Play for a new level, keeping score and lives.
    pub fn begin_level(&mut self) {
        self.mode = Mode::Play;
        self.invulnerable_until = FAR_PAST_MS;
        self.attempt = self.attempt.wrapping_add(1);
    }
}
