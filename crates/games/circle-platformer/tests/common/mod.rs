use circle_core::game_trait::Simulation;
use circle_platformer::PlatformerGame;
use circle_platformer::config::PlatformerConfig;
use circle_platformer::events::GameEvent;
use circle_platformer::input::InputFrame;
use circle_platformer::level::{EnemySpec, Level, LevelSet, Point, Rect, WorldSize};

pub const DT: f32 = 1.0 / 60.0;
/// Top surface of the fixture ground.
pub const GROUND_TOP: f32 = 500.0;
/// Center y of a 48px player standing on the ground.
pub const STANDING_Y: f32 = GROUND_TOP - 24.0;
/// Center y of a 28px ground enemy standing on the ground.
pub const ENEMY_Y: f32 = GROUND_TOP - 14.0;

/// Flat 2000px floor, spawn at x=100 standing, goal far to the right.
pub fn flat_level() -> Level {
    Level {
        name: "Fixture".to_string(),
        world: WorldSize {
            width: 2000.0,
            height: 540.0,
        },
        kill_y: 650.0,
        spawn: Point::new(100.0, STANDING_Y),
        platforms: vec![Rect::new(1000.0, GROUND_TOP + 20.0, 2000.0, 40.0)],
        moving_platforms: Vec::new(),
        coins: Vec::new(),
        enemies: Vec::new(),
        checkpoints: Vec::new(),
        goal: Point::new(1950.0, 440.0),
        hazards: Vec::new(),
    }
}

/// A ground enemy that stands still at `x`.
pub fn parked_enemy(x: f32) -> EnemySpec {
    EnemySpec {
        speed: Some(0.0),
        ..EnemySpec::ground(x, ENEMY_Y, x - 50.0, x + 50.0)
    }
}

pub fn game_with(levels: Vec<Level>) -> PlatformerGame {
    let set = LevelSet::new(levels).expect("fixture levels are valid");
    PlatformerGame::with_levels(PlatformerConfig::default(), set)
}

pub fn tick(game: &mut PlatformerGame, input: InputFrame, n: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(game.update(DT, &input));
    }
    events
}

/// Tick until `done` holds for the events of one tick. Returns every event
/// seen, or panics after `max` ticks.
pub fn tick_until(
    game: &mut PlatformerGame,
    input: InputFrame,
    max: usize,
    done: impl Fn(&PlatformerGame, &[GameEvent]) -> bool,
) -> Vec<GameEvent> {
    let mut all = Vec::new();
    for _ in 0..max {
        let events = game.update(DT, &input);
        let stop = done(game, &events);
        all.extend(events);
        if stop {
            return all;
        }
    }
    panic!("condition not reached within {max} ticks");
}

/// Teleport the player and give it a vertical velocity.
pub fn place_player(game: &mut PlatformerGame, x: f32, y: f32, vy: f32) {
    let body = &mut game.state_mut().player.body;
    body.x = x;
    body.y = y;
    body.vx = 0.0;
    body.vy = vy;
    body.sync_bounds();
}

pub fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
