use serde::{Deserialize, Serialize};

use circle_core::overlay::OverlayRequest;
use circle_core::overlay::toast::Toast;

use crate::mode::Mode;

/// What a tick produced, for the UI and any other observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    LivesChanged(u32),
    Toast(Toast),
    ShowOverlay(OverlayRequest),
    HideOverlay,
    /// Blink the player until this simulation time.
    Flicker {
        until_ms: f64,
    },
    CoinCollected {
        index: usize,
        remaining: usize,
    },
    CoinsRespawned,
    CheckpointActivated(usize),
    EnemyStomped {
        x: f32,
        y: f32,
    },
    LifeLost {
        lives: u32,
    },
    ModeChanged(Mode),
    LevelLoaded {
        index: usize,
        name: String,
    },
    Jumped,
}

impl GameEvent {
    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::ScoreChanged(_) => "score_changed",
            GameEvent::LivesChanged(_) => "lives_changed",
            GameEvent::Toast(_) => "toast",
            GameEvent::ShowOverlay(_) => "show_overlay",
            GameEvent::HideOverlay => "hide_overlay",
            GameEvent::Flicker { .. } => "flicker",
            GameEvent::CoinCollected { .. } => "coin_collected",
            GameEvent::CoinsRespawned => "coins_respawned",
            GameEvent::CheckpointActivated(_) => "checkpoint_activated",
            GameEvent::EnemyStomped { .. } => "enemy_stomped",
            GameEvent::LifeLost { .. } => "life_lost",
            GameEvent::ModeChanged(_) => "mode_changed",
            GameEvent::LevelLoaded { .. } => "level_loaded",
            GameEvent::Jumped => "jumped",
        }
    }
}
