use serde::{Deserialize, Serialize};

/// World gravity (px/s^2, positive is down).
pub const GRAVITY_Y: f32 = 850.0;
/// Horizontal drag (px/s^2) that decelerates a coasting body.
pub const DRAG_X: f32 = 900.0;
/// Horizontal run speed.
pub const MOVE_SPEED: f32 = 220.0;
/// Initial upward speed of a jump.
pub const JUMP_SPEED: f32 = 420.0;
/// Grace period after leaving the ground during which a jump still fires.
pub const COYOTE_MS: f64 = 120.0;
/// How long a jump press is remembered before landing.
pub const JUMP_BUFFER_MS: f64 = 140.0;
/// Lives at the start of a run.
pub const LIVES_START: u32 = 3;
/// Invulnerability window after losing a life.
pub const INVULN_MS: f64 = 700.0;

/// Solver parameters handed to the arcade world and the player body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    pub drag_x: f32,
    pub max_velocity_x: f32,
    pub max_velocity_y: f32,
    pub player_width: f32,
    pub player_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y,
            drag_x: DRAG_X,
            max_velocity_x: 400.0,
            max_velocity_y: 900.0,
            player_width: 32.0,
            player_height: 48.0,
        }
    }
}

/// Movement feel: speeds and the forgiving-jump windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeelConfig {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub coyote_ms: f64,
    pub jump_buffer_ms: f64,
    /// |vx| above which a grounded player counts as running.
    pub run_threshold: f32,
}

impl Default for FeelConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            coyote_ms: COYOTE_MS,
            jump_buffer_ms: JUMP_BUFFER_MS,
            run_threshold: 10.0,
        }
    }
}

/// Scoring, lives and timing rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub lives_start: u32,
    pub invuln_ms: f64,
    pub coin_points: u32,
    pub enemy_points: u32,
    pub stomp_bounce: f32,
    pub coin_respawn_delay_ms: f64,
    pub win_advance_delay_ms: f64,
    pub checkpoint_toast_ms: u32,
    /// How far above a checkpoint the player reappears.
    pub checkpoint_respawn_lift: f32,
    pub stomp_padding_ground: f32,
    pub stomp_padding_flying: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lives_start: LIVES_START,
            invuln_ms: INVULN_MS,
            coin_points: 10,
            enemy_points: 50,
            stomp_bounce: 320.0,
            coin_respawn_delay_ms: 450.0,
            win_advance_delay_ms: 1400.0,
            checkpoint_toast_ms: 900,
            checkpoint_respawn_lift: 40.0,
            stomp_padding_ground: 6.0,
            stomp_padding_flying: 2.0,
        }
    }
}

/// Top-level platformer configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PhysicsConfig,
    pub feel: FeelConfig,
    pub rules: RulesConfig,
    pub tick_rate_hz: f32,
    /// Seed for the flying-enemy phase offsets.
    pub seed: u64,
    /// Optional TOML file with the level list; built-in levels otherwise.
    pub levels_path: Option<String>,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            feel: FeelConfig::default(),
            rules: RulesConfig::default(),
            tick_rate_hz: 60.0,
            seed: 42,
            levels_path: None,
        }
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file, then apply env var overrides. Falls back
    /// to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("CIRCLE_PLATFORMER_CONFIG")
            .unwrap_or_else(|_| "config/platformer.toml".to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_or_default(&content, &path),
            Err(_) => {
                tracing::info!("No {path} found, using default platformer config");
                PlatformerConfig::default()
            },
        };

        if let Ok(seed) = std::env::var("CIRCLE_PLATFORMER_SEED") {
            match seed.parse::<u64>() {
                Ok(s) => config.seed = s,
                Err(e) => tracing::warn!("Ignoring CIRCLE_PLATFORMER_SEED={seed}: {e}"),
            }
        }
        if let Ok(levels) = std::env::var("CIRCLE_PLATFORMER_LEVELS")
            && !levels.is_empty()
        {
            config.levels_path = Some(levels);
        }

        for warning in config.validate() {
            tracing::warn!("{warning}");
        }
        config
    }

    /// Parse TOML content, logging and falling back to defaults on error.
    pub fn from_toml_or_default(content: &str, origin: &str) -> Self {
        match toml::from_str::<PlatformerConfig>(content) {
            Ok(cfg) => {
                tracing::info!("Loaded platformer config from {origin}");
                cfg
            },
            Err(e) => {
                tracing::warn!("Failed to parse {origin}: {e}, using defaults");
                PlatformerConfig::default()
            },
        }
    }

    /// Human-readable warnings for values the simulation will tolerate but
    /// that are almost certainly mistakes.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.tick_rate_hz.is_nan() || self.tick_rate_hz <= 0.0 {
            warnings.push(format!(
                "tick_rate_hz must be > 0 (got {}), the runner will use 60",
                self.tick_rate_hz
            ));
        }
        if self.rules.lives_start == 0 {
            warnings.push("rules.lives_start is 0, the first hit ends the run".to_string());
        }
        if self.feel.jump_buffer_ms < 0.0 || self.feel.coyote_ms < 0.0 {
            warnings.push("feel.jump_buffer_ms and feel.coyote_ms must be >= 0".to_string());
        }
        if self.physics.drag_x <= 0.0 {
            warnings.push("physics.drag_x <= 0, released players never stop".to_string());
        }
        warnings
    }

    /// Tick rate the runner should use, with a sane fallback.
    pub fn effective_tick_rate(&self) -> f32 {
        if self.tick_rate_hz > 0.0 && self.tick_rate_hz.is_finite() {
            self.tick_rate_hz
        } else {
            60.0
        }
    }
}
