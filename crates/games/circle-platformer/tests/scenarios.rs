#[allow(dead_code)]
mod common;

use circle_core::audio::SoundCue;
use circle_core::game_trait::Simulation;
use circle_core::overlay::OverlayAction;
use circle_core::overlay::toast::Toast;
use circle_core::test_helpers::RecordingAudio;
use circle_platformer::events::GameEvent;
use circle_platformer::input::InputFrame;
use circle_platformer::level::{EnemySpec, MovingPlatformSpec, Point, Rect};
use circle_platformer::mode::Mode;

use common::{
    DT, ENEMY_Y, GROUND_TOP, STANDING_Y, count, flat_level, game_with, parked_enemy, place_player,
    tick, tick_until,
};

fn is_life_lost(e: &GameEvent) -> bool {
    matches!(e, GameEvent::LifeLost { .. })
}

fn is_stomp(e: &GameEvent) -> bool {
    matches!(e, GameEvent::EnemyStomped { .. })
}

fn reset_input() -> InputFrame {
    InputFrame {
        reset_pressed: true,
        ..Default::default()
    }
}

#[test]
fn three_side_contacts_end_the_run_and_keep_score() {
    let mut level = flat_level();
    level.enemies = vec![parked_enemy(400.0)];
    level.coins = vec![Point::new(250.0, STANDING_Y)];
    let mut game = game_with(vec![level]);

    let mut hits = Vec::new();
    let mut coins = 0;
    for _ in 0..1200 {
        let events = game.update(DT, &InputFrame::right());
        coins += count(&events, |e| matches!(e, GameEvent::CoinCollected { .. }));
        if events.iter().any(is_life_lost) {
            hits.push(game.now_ms());
        }
        if game.mode() != Mode::Play {
            break;
        }
    }

    assert_eq!(hits.len(), 3, "Three hurts spend three lives");
    assert!(
        hits.windows(2).all(|w| w[1] - w[0] > 700.0),
        "Each contact lands outside the invulnerability window: {hits:?}"
    );
    assert_eq!(game.mode(), Mode::Lose);
    assert_eq!(game.lives(), 0);
    assert!(coins >= 1);
    assert_eq!(game.score(), coins as u32 * 10, "Score survives the loss");

    // Everything is frozen until a reset
    let x = game.player().body.x;
    let events = tick(&mut game, InputFrame::right(), 30);
    assert!(events.is_empty());
    assert_eq!(game.player().body.x, x);
    assert_eq!(game.score(), coins as u32 * 10);
}

#[test]
fn full_reset_after_lose_restores_enemies_and_lives() {
    let mut level = flat_level();
    level.enemies = vec![parked_enemy(400.0), parked_enemy(700.0)];
    let mut game = game_with(vec![level]);
    tick(&mut game, InputFrame::idle(), 10);

    for x in [400.0, 700.0] {
        place_player(&mut game, x, 420.0, 100.0);
        tick_until(&mut game, InputFrame::idle(), 60, |_, ev| ev.iter().any(is_stomp));
    }
    assert!(game.state().enemies.is_empty());
    assert_eq!(game.score(), 100);

    game.state_mut().mode.lives = 1;
    place_player(&mut game, 100.0, 700.0, 0.0);
    let events = tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(game.mode(), Mode::Lose);
    let overlay = events.iter().find_map(|e| match e {
        GameEvent::ShowOverlay(req) => Some(req.clone()),
        _ => None,
    });
    let overlay = overlay.expect("lose overlay");
    assert_eq!(overlay.title, "YOU LOSE");
    assert_eq!(overlay.actions, vec![OverlayAction::Retry]);

    let events = game.handle_overlay_action(OverlayAction::Retry);
    assert!(events.contains(&GameEvent::HideOverlay));
    assert!(events.contains(&GameEvent::ModeChanged(Mode::Play)));
    assert_eq!(game.mode(), Mode::Play);
    assert_eq!(game.lives(), 3);
    assert_eq!(game.score(), 0);

    let positions: Vec<(f32, f32)> = game
        .state()
        .enemies
        .iter()
        .map(|e| (e.body.x, e.body.y))
        .collect();
    assert_eq!(positions, vec![(400.0, ENEMY_Y), (700.0, ENEMY_Y)]);
    assert_eq!(game.player().body.x, 100.0);
    assert!(!game.player().frozen);
    assert!(!game.state().world.paused);

    // The run continues normally
    tick(&mut game, InputFrame::right(), 10);
    assert!(game.player().body.x > 100.0);
}

#[test]
fn coins_respawn_after_delay_at_original_positions() {
    let mut level = flat_level();
    level.coins = vec![
        Point::new(300.0, STANDING_Y),
        Point::new(360.0, STANDING_Y),
        Point::new(420.0, STANDING_Y),
    ];
    let mut game = game_with(vec![level]);

    tick_until(&mut game, InputFrame::right(), 200, |g, _| {
        g.state().coins.active_count() == 0
    });
    assert_eq!(game.score(), 30);
    place_player(&mut game, 1500.0, STANDING_Y, 0.0);

    tick(&mut game, InputFrame::idle(), 20);
    assert_eq!(game.state().coins.active_count(), 0, "Still inside the delay");

    let events = tick(&mut game, InputFrame::idle(), 10);
    assert!(events.contains(&GameEvent::CoinsRespawned));
    let coins = game.state().coins.coins();
    assert_eq!(coins.len(), 3);
    assert!(coins.iter().all(|c| c.active));
    let xs: Vec<f32> = coins.iter().map(|c| c.x).collect();
    assert_eq!(xs, vec![300.0, 360.0, 420.0]);
    assert!(coins.iter().all(|c| c.y == STANDING_Y));
}

#[test]
fn coins_stay_collected_if_the_run_ends_first() {
    let mut level = flat_level();
    level.coins = vec![Point::new(300.0, STANDING_Y)];
    let mut game = game_with(vec![level]);

    tick_until(&mut game, InputFrame::right(), 200, |g, _| {
        g.state().coins.active_count() == 0
    });
    game.state_mut().mode.lives = 1;
    place_player(&mut game, 100.0, 700.0, 0.0);
    tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(game.mode(), Mode::Lose);

    let events = tick(&mut game, InputFrame::idle(), 60);
    assert!(!events.contains(&GameEvent::CoinsRespawned));
    assert_eq!(game.state().coins.active_count(), 0);
}

#[test]
fn invulnerability_blocks_repeat_hazard_hits() {
    let mut level = flat_level();
    level.hazards = vec![Rect::new(600.0, GROUND_TOP - 4.0, 64.0, 8.0)];
    let mut game = game_with(vec![level]);
    tick(&mut game, InputFrame::idle(), 5);

    place_player(&mut game, 600.0, STANDING_Y, 0.0);
    let events = tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(game.lives(), 2);
    let until = events
        .iter()
        .find_map(|e| match e {
            GameEvent::Flicker { until_ms } => Some(*until_ms),
            _ => None,
        })
        .expect("flicker event");
    assert!((until - game.now_ms() - 700.0).abs() < 1e-6);
    assert_eq!(game.player().body.x, 100.0, "Respawned at the level spawn");

    let mut second_hit_at = None;
    for _ in 0..60 {
        place_player(&mut game, 600.0, STANDING_Y, 0.0);
        tick(&mut game, InputFrame::idle(), 1);
        if game.now_ms() < until {
            assert_eq!(game.lives(), 2, "No life lost inside the window");
        } else if game.lives() == 1 {
            second_hit_at = Some(game.now_ms());
            break;
        }
    }
    let at = second_hit_at.expect("hazard hurts again once the window closes");
    assert!(at >= until);
}

#[test]
fn world_keeps_running_below_kill_plane_while_invulnerable() {
    let mut level = flat_level();
    level.hazards = vec![Rect::new(600.0, GROUND_TOP - 4.0, 64.0, 8.0)];
    level.moving_platforms = vec![MovingPlatformSpec {
        x: 1500.0,
        y: 300.0,
        w: 120.0,
        h: 20.0,
        dx: 200.0,
        dy: 0.0,
        speed: 60.0,
    }];
    let mut game = game_with(vec![level]);
    tick(&mut game, InputFrame::idle(), 5);

    place_player(&mut game, 600.0, STANDING_Y, 0.0);
    tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(game.lives(), 2);

    // Below kill Y with 500ms of the 700ms window left
    place_player(&mut game, 900.0, 700.0, 0.0);
    let platform_x = game.state().platforms[0].x;
    let events = tick(&mut game, InputFrame::right(), 30);
    assert_eq!(game.mode(), Mode::Play);
    assert_eq!(game.lives(), 2);
    assert_eq!(count(&events, is_life_lost), 0);
    assert!(game.state().platforms[0].x > platform_x + 20.0, "platforms keep moving");
    let body = &game.player().body;
    assert!(body.x > 950.0, "input still steers the player, x = {}", body.x);
    assert!(body.y > 700.0, "the player keeps falling, y = {}", body.y);

    tick_until(&mut game, InputFrame::idle(), 60, |_, events| {
        events.iter().any(is_life_lost)
    });
    assert_eq!(game.lives(), 1);
}

#[test]
fn falling_out_beats_enemy_contact() {
    let mut level = flat_level();
    level.enemies = vec![EnemySpec {
        bob_amplitude: Some(0.0),
        phase: Some(0.0),
        ..EnemySpec::flying(300.0, 700.0, 250.0, 350.0)
    }];
    let mut game = game_with(vec![level]);
    tick(&mut game, InputFrame::idle(), 2);

    place_player(&mut game, 300.0, 700.0, 50.0);
    let events = tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(count(&events, is_life_lost), 1);
    assert_eq!(game.lives(), 2);
    assert_eq!(count(&events, is_stomp), 0);
    assert_eq!(game.state().enemies.len(), 1);
}

#[test]
fn win_auto_advances_and_carries_score() {
    let mut second = flat_level();
    second.name = "Second".to_string();
    let mut game = game_with(vec![flat_level(), second]);
    let audio = RecordingAudio::new();
    game.set_audio(Box::new(audio.clone()));
    tick(&mut game, InputFrame::idle(), 5);
    game.state_mut().mode.score = 40;
    game.state_mut().mode.lives = 2;

    place_player(&mut game, 1950.0, STANDING_Y, 0.0);
    let events = tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(game.mode(), Mode::Win);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::ShowOverlay(req) if req.title == "YOU WIN!" && !req.has_buttons()
    )));
    assert_eq!(audio.count(SoundCue::Win), 1);
    assert!(game.player().frozen);

    // A second goal touch while in Win is a no-op
    tick(&mut game, InputFrame::idle(), 10);
    assert_eq!(audio.count(SoundCue::Win), 1);

    let events = tick(&mut game, InputFrame::idle(), 80);
    assert!(events.iter().any(|e| matches!(e, GameEvent::LevelLoaded { index: 1, .. })));
    assert_eq!(game.state().level_index, 1);
    assert_eq!(game.level().name, "Second");
    assert_eq!(game.mode(), Mode::Play);
    assert_eq!(game.score(), 40);
    assert_eq!(game.lives(), 2);
    assert!(!game.player().frozen);

    // Finishing the last level loops back to the first
    place_player(&mut game, 1950.0, STANDING_Y, 0.0);
    tick(&mut game, InputFrame::idle(), 90);
    assert_eq!(game.state().level_index, 0);
}

#[test]
fn stale_advance_after_reset_is_dropped() {
    let mut second = flat_level();
    second.name = "Second".to_string();
    let mut game = game_with(vec![flat_level(), second]);
    tick(&mut game, InputFrame::idle(), 5);

    place_player(&mut game, 1950.0, STANDING_Y, 0.0);
    tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(game.mode(), Mode::Win);

    let events = tick(&mut game, reset_input(), 1);
    assert!(events.contains(&GameEvent::HideOverlay));
    assert_eq!(game.mode(), Mode::Play);

    let events = tick(&mut game, InputFrame::idle(), 120);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelLoaded { .. })));
    assert_eq!(game.state().level_index, 0);
    assert_eq!(game.mode(), Mode::Play);
}

#[test]
fn early_press_fires_on_landing() {
    let mut game = game_with(vec![flat_level()]);
    place_player(&mut game, 100.0, 400.0, 0.0);
    tick_until(&mut game, InputFrame::idle(), 120, |g, _| {
        let body = &g.player().body;
        body.bounds().bottom > GROUND_TOP - 12.0 && !body.touching.down
    });

    let mut events = tick(&mut game, InputFrame::jump(), 1);
    events.extend(tick(&mut game, InputFrame::idle(), 10));
    assert_eq!(count(&events, |e| *e == GameEvent::Jumped), 1);
}

#[test]
fn coyote_jump_after_walking_off_a_ledge() {
    let mut level = flat_level();
    level.platforms = vec![Rect::new(150.0, GROUND_TOP + 20.0, 300.0, 40.0)];
    let mut game = game_with(vec![level.clone()]);
    tick(&mut game, InputFrame::idle(), 5);

    tick_until(&mut game, InputFrame::right(), 200, |g, _| {
        !g.player().body.touching.down
    });
    let events = tick(&mut game, InputFrame::right().with_jump(), 1);
    assert!(events.contains(&GameEvent::Jumped));

    // Waiting past the grace period loses the jump
    let mut game = game_with(vec![level]);
    tick(&mut game, InputFrame::idle(), 5);
    tick_until(&mut game, InputFrame::right(), 200, |g, _| {
        !g.player().body.touching.down
    });
    tick(&mut game, InputFrame::idle(), 10);
    let events = tick(&mut game, InputFrame::jump(), 1);
    assert!(!events.contains(&GameEvent::Jumped));
}

#[test]
fn moving_platform_carries_standing_player() {
    let mut level = flat_level();
    level.spawn = Point::new(300.0, 366.0);
    level.moving_platforms = vec![MovingPlatformSpec {
        x: 300.0,
        y: 400.0,
        w: 140.0,
        h: 20.0,
        dx: 200.0,
        dy: 0.0,
        speed: 60.0,
    }];
    let mut game = game_with(vec![level]);

    tick(&mut game, InputFrame::idle(), 60);
    let platform = &game.state().platforms[0];
    assert!((platform.x - 360.0).abs() < 0.5, "platform at {}", platform.x);
    let body = &game.player().body;
    assert!(body.touching.down);
    assert!((body.x - platform.x).abs() < 1.0, "player {} vs platform {}", body.x, platform.x);
}

#[test]
fn rising_platform_lifts_player() {
    let mut level = flat_level();
    level.spawn = Point::new(300.0, 366.0);
    level.moving_platforms = vec![MovingPlatformSpec {
        x: 300.0,
        y: 400.0,
        w: 140.0,
        h: 20.0,
        dx: 0.0,
        dy: -100.0,
        speed: 50.0,
    }];
    let mut game = game_with(vec![level]);

    tick(&mut game, InputFrame::idle(), 60);
    let top = game.state().platforms[0].aabb().top;
    assert!(top < 345.0);
    let bottom = game.player().body.bounds().bottom;
    assert!((bottom - top).abs() < 2.0, "player bottom {bottom} vs platform top {top}");
}

#[test]
fn rider_stays_grounded_through_a_full_lift_cycle() {
    let mut level = flat_level();
    level.platforms = Vec::new();
    level.spawn = Point::new(300.0, 366.0);
    level.moving_platforms = vec![MovingPlatformSpec {
        x: 300.0,
        y: 400.0,
        w: 120.0,
        h: 20.0,
        dx: 0.0,
        dy: -160.0,
        speed: 60.0,
    }];
    let mut game = game_with(vec![level]);
    tick(&mut game, InputFrame::idle(), 1);

    let (mut highest, mut lowest) = (f32::MAX, f32::MIN);
    // 160px at 60px/s: 160 ticks up, 160 back down, then a little extra
    for i in 0..340 {
        tick(&mut game, InputFrame::idle(), 1);
        let top = game.state().platforms[0].aabb().top;
        let body = &game.player().body;
        assert!(body.touching.down, "rider left the lift on tick {i}");
        let gap = body.bounds().bottom - top;
        assert!(gap.abs() < 0.5, "rider {gap}px off the lift on tick {i}");
        highest = highest.min(top);
        lowest = lowest.max(top);
    }
    assert!(highest < 231.0, "lift reached {highest}");
    assert!(lowest > 389.0, "lift came back to {lowest}");
}

#[test]
fn checkpoints_move_the_respawn_point_until_reset() {
    let mut level = flat_level();
    level.checkpoints = vec![
        Point::new(400.0, GROUND_TOP - 32.0),
        Point::new(800.0, GROUND_TOP - 32.0),
    ];
    let mut game = game_with(vec![level]);
    let audio = RecordingAudio::new();
    game.set_audio(Box::new(audio.clone()));

    let events = tick_until(&mut game, InputFrame::right(), 200, |_, ev| {
        ev.contains(&GameEvent::CheckpointActivated(0))
    });
    assert!(events.contains(&GameEvent::Toast(Toast::new("Checkpoint saved!", 900))));
    assert_eq!(audio.count(SoundCue::Checkpoint), 1);

    place_player(&mut game, 500.0, 700.0, 0.0);
    tick(&mut game, InputFrame::idle(), 1);
    assert_eq!(
        (game.player().body.x, game.player().body.y),
        (400.0, GROUND_TOP - 72.0),
        "Respawn above the active checkpoint"
    );

    tick_until(&mut game, InputFrame::right(), 300, |_, ev| {
        ev.contains(&GameEvent::CheckpointActivated(1))
    });
    let registry = &game.state().checkpoints;
    assert!(!registry.is_active(0));
    assert!(registry.is_active(1));
    assert_eq!(audio.count(SoundCue::Checkpoint), 2);

    game.reset();
    assert_eq!(game.state().checkpoints.active(), None);
    assert_eq!(
        (game.player().body.x, game.player().body.y),
        (100.0, STANDING_Y)
    );
}

#[test]
fn audio_cues_follow_gameplay() {
    let mut level = flat_level();
    level.enemies = vec![parked_enemy(400.0), parked_enemy(900.0)];
    level.coins = vec![Point::new(250.0, STANDING_Y)];
    let mut game = game_with(vec![level]);
    let audio = RecordingAudio::new();
    game.set_audio(Box::new(audio.clone()));

    tick_until(&mut game, InputFrame::right(), 100, |_, ev| {
        ev.iter().any(|e| matches!(e, GameEvent::CoinCollected { .. }))
    });
    place_player(&mut game, 400.0, 420.0, 100.0);
    tick_until(&mut game, InputFrame::idle(), 60, |_, ev| ev.iter().any(is_stomp));
    game.state_mut().mode.lives = 1;
    place_player(&mut game, 900.0, STANDING_Y, 0.0);
    tick(&mut game, InputFrame::idle(), 1);

    assert_eq!(audio.count(SoundCue::Coin), 1);
    assert_eq!(audio.count(SoundCue::Stomp), 1);
    assert_eq!(audio.count(SoundCue::Hurt), 1);
    assert_eq!(audio.count(SoundCue::Lose), 1);
    assert_eq!(game.mode(), Mode::Lose);
}

#[test]
fn levels_load_from_toml() {
    let set = circle_platformer::level::LevelSet::from_toml_str(
        r#"
        [[levels]]
        name = "From TOML"
        kill_y = 650.0
        world = { width = 960.0, height = 540.0 }
        spawn = { x = 100.0, y = 476.0 }
        goal = { x = 900.0, y = 440.0 }
        platforms = [{ x = 480.0, y = 520.0, w = 960.0, h = 40.0 }]
        "#,
    )
    .unwrap();
    let mut game = circle_platformer::PlatformerGame::with_levels(Default::default(), set);
    tick_until(&mut game, InputFrame::right(), 400, |g, _| g.mode() == Mode::Win);
    assert_eq!(game.level().name, "From TOML");
}
