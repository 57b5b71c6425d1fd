//! Static level descriptors, the built-in level list and the TOML loader.
//!
//! Rectangles are given by their center and size, matching how bodies are
//! positioned in [`crate::physics`].

use serde::{Deserialize, Serialize};

use crate::physics::Aabb;

/// Goal flag hitbox.
pub const GOAL_WIDTH: f32 = 18.0;
pub const GOAL_HEIGHT: f32 = 120.0;

/// Errors from loading or validating level data.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    Io(String),
    Parse(String),
    Empty,
    Invalid { level: String, reason: String },
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "level file error: {e}"),
            Self::Parse(e) => write!(f, "level parse error: {e}"),
            Self::Empty => write!(f, "level set contains no levels"),
            Self::Invalid { level, reason } => write!(f, "invalid level '{level}': {reason}"),
        }
    }
}

impl std::error::Error for LevelError {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Center-positioned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

fn default_platform_dx() -> f32 {
    160.0
}

fn default_platform_speed() -> f32 {
    70.0
}

/// A platform that ping-pongs from (x, y) to (x + dx, y + dy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingPlatformSpec {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default = "default_platform_dx")]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
    #[serde(default = "default_platform_speed")]
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKindSpec {
    #[default]
    Ground,
    #[serde(alias = "fly")]
    Flying,
}

/// One enemy spawn. Omitted tuning values fall back to the per-kind defaults
/// in [`crate::enemies`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    #[serde(default)]
    pub kind: EnemyKindSpec,
    pub x: f32,
    pub y: f32,
    pub min_x: f32,
    pub max_x: f32,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub bob_amplitude: Option<f32>,
    #[serde(default)]
    pub bob_speed: Option<f32>,
    /// Pins the bob phase (radians). Drawn from the seeded RNG when absent.
    #[serde(default)]
    pub phase: Option<f32>,
}

impl EnemySpec {
    pub fn ground(x: f32, y: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            kind: EnemyKindSpec::Ground,
            x,
            y,
            min_x,
            max_x,
            speed: None,
            bob_amplitude: None,
            bob_speed: None,
            phase: None,
        }
    }

    pub fn flying(x: f32, y: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            kind: EnemyKindSpec::Flying,
            ..Self::ground(x, y, min_x, max_x)
        }
    }
}

/// Everything the simulation needs to build one level. Read-only at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub world: WorldSize,
    /// Players whose center falls below this y lose a life.
    pub kill_y: f32,
    pub spawn: Point,
    #[serde(default)]
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub moving_platforms: Vec<MovingPlatformSpec>,
    #[serde(default)]
    pub coins: Vec<Point>,
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
    #[serde(default)]
    pub checkpoints: Vec<Point>,
    pub goal: Point,
    #[serde(default)]
    pub hazards: Vec<Rect>,
}

impl Level {
    pub fn goal_aabb(&self) -> Aabb {
        Aabb::from_center(self.goal.x, self.goal.y, GOAL_WIDTH, GOAL_HEIGHT)
    }

    pub fn static_aabbs(&self) -> Vec<Aabb> {
        self.platforms.iter().map(Rect::aabb).collect()
    }

    /// Reject data the simulation cannot run. Zero-displacement moving
    /// platforms are accepted; they simply never move.
    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |reason: String| LevelError::Invalid {
            level: self.name.clone(),
            reason,
        };

        if !(self.world.width.is_finite() && self.world.height.is_finite())
            || self.world.width <= 0.0
            || self.world.height <= 0.0
        {
            return Err(invalid(format!(
                "world size must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        let mut numbers = vec![
            ("kill_y", self.kill_y),
            ("spawn.x", self.spawn.x),
            ("spawn.y", self.spawn.y),
            ("goal.x", self.goal.x),
            ("goal.y", self.goal.y),
        ];
        for r in self.platforms.iter().chain(&self.hazards) {
            numbers.extend([("rect.x", r.x), ("rect.y", r.y), ("rect.w", r.w), ("rect.h", r.h)]);
        }
        for p in self.coins.iter().chain(&self.checkpoints) {
            numbers.extend([("point.x", p.x), ("point.y", p.y)]);
        }
        if let Some((field, value)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{field} is not finite ({value})")));
        }

        for (i, mp) in self.moving_platforms.iter().enumerate() {
            let fields = [mp.x, mp.y, mp.w, mp.h, mp.dx, mp.dy, mp.speed];
            if fields.iter().any(|v| !v.is_finite()) {
                return Err(invalid(format!("moving platform {i} has a non-finite field")));
            }
            if mp.speed < 0.0 {
                return Err(invalid(format!(
                    "moving platform {i} has negative speed {}",
                    mp.speed
                )));
            }
        }

        for (i, e) in self.enemies.iter().enumerate() {
            let optional = [e.speed, e.bob_amplitude, e.bob_speed, e.phase];
            if [e.x, e.y, e.min_x, e.max_x].iter().any(|v| !v.is_finite())
                || optional.iter().flatten().any(|v| !v.is_finite())
            {
                return Err(invalid(format!("enemy {i} has a non-finite field")));
            }
            if e.min_x > e.max_x {
                return Err(invalid(format!(
                    "enemy {i} patrol min_x {} > max_x {}",
                    e.min_x, e.max_x
                )));
            }
            if let Some(speed) = e.speed
                && speed < 0.0
            {
                return Err(invalid(format!("enemy {i} has negative speed {speed}")));
            }
        }

        Ok(())
    }
}

/// Ordered list of levels. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<Level>,
}

impl LevelSet {
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// The levels shipped with the game.
    pub fn builtin() -> Self {
        Self {
            levels: vec![level_one(), level_two()],
        }
    }

    /// Parse a `[[levels]]` TOML document and validate every level.
    pub fn from_toml_str(content: &str) -> Result<Self, LevelError> {
        let set: LevelSet =
            toml::from_str(content).map_err(|e| LevelError::Parse(e.to_string()))?;
        Self::new(set.levels)
    }

    pub fn load(path: &str) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path).map_err(|e| LevelError::Io(format!("{path}: {e}")))?;
        let set = Self::from_toml_str(&content)?;
        tracing::info!(path, levels = set.len(), "Loaded level set");
        Ok(set)
    }

    /// Load from `path` when given, falling back to the built-in levels if
    /// the file cannot be used.
    pub fn load_or_builtin(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!("Rejected level set {path}: {e}, using built-in levels");
                Self::builtin()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Index of the level after `index`, looping back to the first.
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 < self.levels.len() { index + 1 } else { 0 }
    }
}

fn level_one() -> Level {
    Level {
        name: "Meadow".to_string(),
        world: WorldSize {
            width: 2400.0,
            height: 540.0,
        },
        kill_y: 650.0,
        spawn: Point::new(120.0, 420.0),
        platforms: vec![
            Rect::new(500.0, 520.0, 1000.0, 40.0),
            Rect::new(1900.0, 520.0, 1000.0, 40.0),
            Rect::new(260.0, 420.0, 240.0, 24.0),
            Rect::new(520.0, 340.0, 240.0, 24.0),
            Rect::new(760.0, 260.0, 220.0, 24.0),
            Rect::new(1500.0, 380.0, 200.0, 24.0),
        ],
        moving_platforms: vec![MovingPlatformSpec {
            x: 1080.0,
            y: 440.0,
            w: 140.0,
            h: 20.0,
            dx: 200.0,
            dy: 0.0,
            speed: 70.0,
        }],
        coins: vec![
            Point::new(260.0, 380.0),
            Point::new(520.0, 300.0),
            Point::new(760.0, 220.0),
            Point::new(1200.0, 400.0),
            Point::new(1500.0, 340.0),
        ],
        enemies: vec![
            EnemySpec::ground(700.0, 480.0, 600.0, 900.0),
            EnemySpec::ground(1700.0, 480.0, 1550.0, 1850.0),
        ],
        checkpoints: vec![Point::new(1450.0, 468.0)],
        goal: Point::new(2300.0, 440.0),
        hazards: Vec::new(),
    }
}

fn level_two() -> Level {
    Level {
        name: "Sky Bridge".to_string(),
        world: WorldSize {
            width: 3000.0,
            height: 600.0,
        },
        kill_y: 720.0,
        spawn: Point::new(100.0, 480.0),
        platforms: vec![
            Rect::new(300.0, 580.0, 600.0, 40.0),
            Rect::new(1500.0, 580.0, 600.0, 40.0),
            Rect::new(2700.0, 580.0, 600.0, 40.0),
            Rect::new(1500.0, 420.0, 180.0, 24.0),
        ],
        moving_platforms: vec![
            MovingPlatformSpec {
                x: 700.0,
                y: 520.0,
                w: 140.0,
                h: 20.0,
                dx: 400.0,
                dy: 0.0,
                speed: 90.0,
            },
            MovingPlatformSpec {
                x: 1950.0,
                y: 540.0,
                w: 120.0,
                h: 20.0,
                dx: 0.0,
                dy: -160.0,
                speed: 60.0,
            },
            MovingPlatformSpec {
                x: 2100.0,
                y: 380.0,
                w: 120.0,
                h: 20.0,
                dx: 200.0,
                dy: 0.0,
                speed: 80.0,
            },
        ],
        coins: vec![
            Point::new(400.0, 520.0),
            Point::new(900.0, 470.0),
            Point::new(1500.0, 380.0),
            Point::new(2200.0, 340.0),
            Point::new(2600.0, 520.0),
        ],
        enemies: vec![
            EnemySpec::ground(1400.0, 540.0, 1250.0, 1750.0),
            EnemySpec::flying(1000.0, 400.0, 850.0, 1150.0),
            EnemySpec::flying(2600.0, 440.0, 2450.0, 2850.0),
        ],
        checkpoints: vec![Point::new(1300.0, 528.0)],
        goal: Point::new(2900.0, 500.0),
        hazards: vec![Rect::new(1650.0, 556.0, 64.0, 8.0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[levels]]
        name = "Tiny"
        kill_y = 650.0
        world = { width = 960.0, height = 540.0 }
        spawn = { x = 120.0, y = 420.0 }
        goal = { x = 900.0, y = 440.0 }
        platforms = [{ x = 480.0, y = 520.0, w = 960.0, h = 40.0 }]
        coins = [{ x = 300.0, y = 470.0 }]

        [[levels.moving_platforms]]
        x = 500.0
        y = 400.0
        w = 120.0
        h = 20.0

        [[levels.enemies]]
        kind = "fly"
        x = 600.0
        y = 300.0
        min_x = 500.0
        max_x = 700.0
        phase = 1.5
    "#;

    #[test]
    fn builtin_levels_validate() {
        let set = LevelSet::builtin();
        assert_eq!(set.len(), 2);
        for level in &set.levels {
            assert!(level.validate().is_ok(), "{} should validate", level.name);
        }
    }

    #[test]
    fn toml_defaults_fill_optional_fields() {
        let set = LevelSet::from_toml_str(SAMPLE).unwrap();
        let level = &set.levels[0];
        assert_eq!(level.name, "Tiny");
        assert_eq!(level.moving_platforms[0].dx, 160.0);
        assert_eq!(level.moving_platforms[0].dy, 0.0);
        assert_eq!(level.moving_platforms[0].speed, 70.0);
        assert_eq!(level.enemies[0].kind, EnemyKindSpec::Flying);
        assert_eq!(level.enemies[0].phase, Some(1.5));
        assert!(level.checkpoints.is_empty());
        assert!(level.hazards.is_empty());
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(LevelSet::from_toml_str("levels = []"), Err(LevelError::Empty));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            LevelSet::from_toml_str("[[levels]]\nname = 3"),
            Err(LevelError::Parse(_))
        ));
    }

    #[test]
    fn inverted_patrol_is_rejected() {
        let mut level = level_one();
        level.enemies[0].min_x = 1000.0;
        level.enemies[0].max_x = 10.0;
        let err = level.validate().unwrap_err();
        assert!(err.to_string().contains("min_x"), "{err}");
    }

    #[test]
    fn non_positive_world_is_rejected() {
        let mut level = level_one();
        level.world.width = 0.0;
        assert!(matches!(level.validate(), Err(LevelError::Invalid { .. })));
    }

    #[test]
    fn nan_and_negative_speed_are_rejected() {
        let mut level = level_one();
        level.kill_y = f32::NAN;
        assert!(level.validate().is_err());

        let mut level = level_one();
        level.moving_platforms[0].speed = -1.0;
        assert!(level.validate().is_err());

        let mut level = level_one();
        level.enemies[0].speed = Some(-5.0);
        assert!(level.validate().is_err());
    }

    #[test]
    fn zero_displacement_platform_is_accepted() {
        let mut level = level_one();
        level.moving_platforms[0].dx = 0.0;
        level.moving_platforms[0].dy = 0.0;
        assert!(level.validate().is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            LevelSet::load("/nonexistent/levels.toml"),
            Err(LevelError::Io(_))
        ));
        assert_eq!(LevelSet::load_or_builtin(Some("/nonexistent/levels.toml")).len(), 2);
    }

    #[test]
    fn next_index_loops() {
        let set = LevelSet::builtin();
        assert_eq!(set.next_index(0), 1);
        assert_eq!(set.next_index(1), 0);
    }
}
