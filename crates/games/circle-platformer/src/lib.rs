pub mod checkpoints;
pub mod coins;
pub mod config;
pub mod enemies;
pub mod events;
pub mod input;
pub mod level;
pub mod mode;
pub mod physics;
pub mod platforms;
pub mod player;
pub mod schedule;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use circle_core::audio::{AudioSink, NullAudio, SoundCue};
use circle_core::clock::SimClock;
use circle_core::game_trait::{SimMetadata, Simulation};
use circle_core::overlay::toast::Toast;
use circle_core::overlay::{OverlayAction, OverlayRequest};
use circle_core::simulation_boilerplate;

use checkpoints::CheckpointRegistry;
use coins::CoinField;
use config::PlatformerConfig;
use enemies::{ContactOutcome, Enemy, classify_contact, spawn_enemies};
use events::GameEvent;
use input::InputFrame;
use level::{Level, LevelError, LevelSet};
use mode::{LifeLoss, Mode, ModeState};
use physics::{Aabb, ArcadeWorld};
use platforms::{MovingPlatform, carry};
use player::{AnimState, PlayerController};
use schedule::{EventQueue, ScheduledAction, ScheduledEvent};

const CHECKPOINT_TOAST: &str = "Checkpoint saved!";
const LOSE_TITLE: &str = "YOU LOSE";
const WIN_TITLE: &str = "YOU WIN!";

/// Every piece of mutable simulation state. Snapshots serialize exactly this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformerState {
    pub level_index: usize,
    /// The descriptor the entities were built from; resets rebuild from it.
    pub level: Level,
    pub clock: SimClock,
    pub world: ArcadeWorld,
    pub mode: ModeState,
    pub player: PlayerController,
    pub platforms: Vec<MovingPlatform>,
    pub enemies: Vec<Enemy>,
    pub coins: CoinField,
    pub checkpoints: CheckpointRegistry,
    pub queue: EventQueue,
}

impl PlatformerState {
    fn build(
        level_index: usize,
        level: Level,
        config: &PlatformerConfig,
        mode: ModeState,
        clock: SimClock,
    ) -> Self {
        Self {
            level_index,
            clock,
            world: ArcadeWorld::new(config.physics.gravity_y, level.world.width, level.world.height),
            mode,
            player: PlayerController::spawn(level.spawn.x, level.spawn.y, &config.physics),
            platforms: level
                .moving_platforms
                .iter()
                .map(MovingPlatform::from_spec)
                .collect(),
            enemies: spawn_enemies(&level.enemies, enemy_seed(config.seed, level_index)),
            coins: CoinField::from_level(&level.coins),
            checkpoints: CheckpointRegistry::from_level(
                &level.checkpoints,
                config.rules.checkpoint_respawn_lift,
            ),
            queue: EventQueue::new(),
            level,
        }
    }
}

fn enemy_seed(seed: u64, level_index: usize) -> u64 {
    seed.wrapping_add(level_index as u64)
}

/// The platformer game: owns the level list, the simulation state and the
/// audio sink, and runs one tick per [`Simulation::update`].
pub struct PlatformerGame {
    levels: LevelSet,
    state: PlatformerState,
    paused: bool,
    audio: Box<dyn AudioSink + Send>,
    config: PlatformerConfig,
}

impl PlatformerGame {
    /// Built-in levels with default tuning.
    pub fn new() -> Self {
        Self::with_levels(PlatformerConfig::default(), LevelSet::builtin())
    }

    /// Levels from `config.levels_path` when set, built-ins otherwise.
    pub fn from_config(config: PlatformerConfig) -> Self {
        let levels = LevelSet::load_or_builtin(config.levels_path.as_deref());
        Self::with_levels(config, levels)
    }

    pub fn with_levels(config: PlatformerConfig, levels: LevelSet) -> Self {
        let levels = if levels.is_empty() {
            tracing::warn!("Empty level set, using built-in levels");
            LevelSet::builtin()
        } else {
            levels
        };
        let level = levels.levels[0].clone();
        tracing::info!(level = %level.name, count = levels.len(), "Starting platformer");
        let state = PlatformerState::build(
            0,
            level,
            &config,
            ModeState::new(&config.rules),
            SimClock::new(),
        );
        Self {
            levels,
            state,
            paused: false,
            audio: Box::new(NullAudio),
            config,
        }
    }

    pub fn set_audio(&mut self, audio: Box<dyn AudioSink + Send>) {
        self.audio = audio;
    }

    pub fn state(&self) -> &PlatformerState {
        &self.state
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn level(&self) -> &Level {
        &self.state.level
    }

    pub fn mode(&self) -> Mode {
        self.state.mode.mode
    }

    pub fn score(&self) -> u32 {
        self.state.mode.score
    }

    pub fn lives(&self) -> u32 {
        self.state.mode.lives
    }

    pub fn now_ms(&self) -> f64 {
        self.state.clock.now_ms()
    }

    pub fn player(&self) -> &PlayerController {
        &self.state.player
    }

    pub fn anim_state(&self) -> AnimState {
        self.state.player.anim_state(self.config.feel.run_threshold)
    }

    /// Mutable access for hosts and tests that place entities directly.
    pub fn state_mut(&mut self) -> &mut PlatformerState {
        &mut self.state
    }

    /// The state as pretty JSON, for debugging dumps.
    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state)
    }

    /// Invoke an overlay button.
    pub fn handle_overlay_action(&mut self, action: OverlayAction) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match action {
            OverlayAction::Retry => self.full_reset(&mut events),
        }
        events
    }

    /// Reset the current level: full lives, zero score, everything respawned
    /// from the descriptor and the player back at the level spawn.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.full_reset(&mut events);
        events
    }

    /// Switch to level `index`, carrying score and lives over.
    pub fn load_level(&mut self, index: usize) -> Result<Vec<GameEvent>, LevelError> {
        if index >= self.levels.len() {
            return Err(LevelError::Invalid {
                level: index.to_string(),
                reason: format!("only {} levels are loaded", self.levels.len()),
            });
        }
        let mut events = Vec::new();
        self.enter_level(index, &mut events);
        Ok(events)
    }

    fn play(&mut self, cue: SoundCue) {
        self.audio.play(cue);
    }

    fn enter_level(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        let Some(level) = self.levels.get(index).cloned() else {
            return;
        };
        let mut mode = self.state.mode.clone();
        mode.begin_level();
        tracing::info!(
            index,
            level = %level.name,
            dropped_events = self.state.queue.len(),
            "Loading level"
        );
        events.push(GameEvent::LevelLoaded {
            index,
            name: level.name.clone(),
        });
        self.state = PlatformerState::build(index, level, &self.config, mode, self.state.clock);
        events.push(GameEvent::HideOverlay);
        events.push(GameEvent::ModeChanged(Mode::Play));
        events.push(GameEvent::ScoreChanged(self.state.mode.score));
        events.push(GameEvent::LivesChanged(self.state.mode.lives));
    }

    fn full_reset(&mut self, events: &mut Vec<GameEvent>) {
        let was = self.state.mode.mode;
        let seed = enemy_seed(self.config.seed, self.state.level_index);
        let s = &mut self.state;

        s.mode.full_reset(&self.config.rules);
        s.coins.reset();
        s.enemies = spawn_enemies(&s.level.enemies, seed);
        s.checkpoints.reset();
        s.world.paused = false;
        s.player.set_frozen(false);
        s.player.respawn(s.level.spawn.x, s.level.spawn.y);

        tracing::info!(level = %s.level.name, from = was.name(), "Full reset");
        events.push(GameEvent::HideOverlay);
        if was != Mode::Play {
            events.push(GameEvent::ModeChanged(Mode::Play));
        }
        events.push(GameEvent::ScoreChanged(s.mode.score));
        events.push(GameEvent::LivesChanged(s.mode.lives));
    }

    fn freeze_bodies(&mut self) {
        let s = &mut self.state;
        s.world.paused = true;
        s.player.set_frozen(true);
        for enemy in &mut s.enemies {
            enemy.body.moves = false;
            enemy.body.set_velocity(0.0, 0.0);
        }
    }

    fn enter_lose(&mut self, events: &mut Vec<GameEvent>) {
        self.freeze_bodies();
        tracing::info!(score = self.state.mode.score, "Game over");
        events.push(GameEvent::ModeChanged(Mode::Lose));
        events.push(GameEvent::ShowOverlay(
            OverlayRequest::new(LOSE_TITLE).with_action(OverlayAction::Retry),
        ));
        self.play(SoundCue::Lose);
    }

    fn win(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        if !self.state.mode.try_win() {
            return;
        }
        self.freeze_bodies();
        tracing::info!(
            level = %self.state.level.name,
            score = self.state.mode.score,
            "Level complete"
        );
        events.push(GameEvent::ModeChanged(Mode::Win));
        events.push(GameEvent::ShowOverlay(OverlayRequest::new(WIN_TITLE)));
        self.play(SoundCue::Win);
        self.state.queue.schedule(ScheduledEvent {
            due_ms: now_ms + self.config.rules.win_advance_delay_ms,
            attempt: self.state.mode.attempt,
            action: ScheduledAction::AdvanceLevel,
        });
    }

    /// Spend a life unless invulnerable. Respawns the player or ends the run.
    fn lose_life(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) -> LifeLoss {
        let outcome = self.state.mode.lose_life(now_ms, &self.config.rules);
        match outcome {
            LifeLoss::Ignored => {},
            LifeLoss::Respawned => {
                let lives = self.state.mode.lives;
                tracing::debug!(lives, "Life lost");
                events.push(GameEvent::LivesChanged(lives));
                events.push(GameEvent::LifeLost { lives });
                events.push(GameEvent::Flicker {
                    until_ms: self.state.mode.invulnerable_until,
                });
                self.play(SoundCue::Hurt);
                let s = &mut self.state;
                let (x, y) = s
                    .checkpoints
                    .respawn_point()
                    .unwrap_or((s.level.spawn.x, s.level.spawn.y));
                s.player.respawn(x, y);
            },
            LifeLoss::GameOver => {
                tracing::debug!("Last life lost");
                events.push(GameEvent::LivesChanged(0));
                events.push(GameEvent::LifeLost { lives: 0 });
                self.play(SoundCue::Hurt);
                self.enter_lose(events);
            },
        }
        outcome
    }

    fn run_scheduled(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.state.queue.is_empty() {
            return;
        }
        for due in self.state.queue.drain_due(now_ms) {
            let (attempt, mode) = (self.state.mode.attempt, self.state.mode.mode);
            if due.attempt != attempt {
                tracing::debug!(action = ?due.action, "Dropped scheduled event from an earlier attempt");
                continue;
            }
            match due.action {
                ScheduledAction::RespawnCoins if mode == Mode::Play => {
                    self.state.coins.reset();
                    tracing::debug!(count = self.state.coins.len(), "Coins respawned");
                    events.push(GameEvent::CoinsRespawned);
                },
                ScheduledAction::AdvanceLevel if mode == Mode::Win => {
                    let next = self.levels.next_index(self.state.level_index);
                    self.enter_level(next, events);
                },
                action => {
                    tracing::debug!(?action, mode = mode.name(), "Dropped scheduled event, guard failed");
                },
            }
        }
    }

    fn step_bodies(&mut self, dt: f32) {
        let PlatformerState {
            level,
            world,
            player,
            platforms,
            enemies,
            ..
        } = &mut self.state;

        for platform in platforms.iter_mut() {
            platform.advance(dt);
        }
        let statics = level.static_aabbs();
        let kinematics: Vec<Aabb> = platforms.iter().map(MovingPlatform::previous_aabb).collect();

        let report = world.step(&mut player.body, dt, &statics, &kinematics);
        for i in report.landed_on {
            if let Some(platform) = platforms.get_mut(i) {
                platform.touched_up = true;
            }
        }

        for enemy in enemies.iter_mut() {
            let obstacles: &[Aabb] = if enemy.is_flying() { &[] } else { &statics };
            world.step(&mut enemy.body, dt, obstacles, &[]);
        }
    }

    /// Stomps first, then at most one hurt. All contacts are classified
    /// against the player's pre-contact y and vy.
    fn resolve_enemy_contacts(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) -> LifeLoss {
        let rules = &self.config.rules;
        let player = &self.state.player.body;
        let (py, pvy) = (player.y, player.vy);
        let bounds = player.bounds();

        let mut stomped = Vec::new();
        let mut hurt = false;
        for (i, enemy) in self.state.enemies.iter().enumerate() {
            if !bounds.overlaps(&enemy.body.bounds()) {
                continue;
            }
            match classify_contact(py, pvy, enemy.body.y, &enemy.kind, rules) {
                ContactOutcome::Stomp => stomped.push(i),
                ContactOutcome::Hurt => hurt = true,
            }
        }

        for &i in stomped.iter().rev() {
            let enemy: Enemy = self.state.enemies.remove(i);
            self.state.player.body.vy = -self.config.rules.stomp_bounce;
            let score = self.state.mode.add_score(self.config.rules.enemy_points);
            tracing::debug!(x = enemy.body.x, y = enemy.body.y, score, "Enemy stomped");
            events.push(GameEvent::EnemyStomped {
                x: enemy.body.x,
                y: enemy.body.y,
            });
            events.push(GameEvent::ScoreChanged(score));
            self.play(SoundCue::Stomp);
        }

        if hurt {
            self.lose_life(now_ms, events)
        } else {
            LifeLoss::Ignored
        }
    }

    fn collect_coins(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.state.coins.is_empty() {
            return;
        }
        let bounds = self.state.player.body.bounds();
        for index in self.state.coins.overlapping(&bounds) {
            let Some(remaining) = self.state.coins.collect(index) else {
                continue;
            };
            let score = self.state.mode.add_score(self.config.rules.coin_points);
            events.push(GameEvent::CoinCollected { index, remaining });
            events.push(GameEvent::ScoreChanged(score));
            self.play(SoundCue::Coin);
            if remaining == 0 {
                self.state.queue.schedule(ScheduledEvent {
                    due_ms: now_ms + self.config.rules.coin_respawn_delay_ms,
                    attempt: self.state.mode.attempt,
                    action: ScheduledAction::RespawnCoins,
                });
            }
        }
    }

    fn touch_checkpoints(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.checkpoints.is_empty() {
            return;
        }
        let bounds = self.state.player.body.bounds();
        let Some(i) = self.state.checkpoints.inactive_overlapping(&bounds) else {
            return;
        };
        if self.state.checkpoints.activate(i) {
            tracing::debug!(
                checkpoint = i,
                of = self.state.checkpoints.len(),
                "Checkpoint activated"
            );
            events.push(GameEvent::CheckpointActivated(i));
            events.push(GameEvent::Toast(Toast::new(
                CHECKPOINT_TOAST,
                self.config.rules.checkpoint_toast_ms,
            )));
            self.play(SoundCue::Checkpoint);
        }
    }
}

impl Default for PlatformerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for PlatformerGame {
    type Input = InputFrame;
    type Event = GameEvent;

    fn metadata(&self) -> SimMetadata {
        SimMetadata {
            name: "Circle Platformer".to_string(),
            description: "Run, jump and stomp your way to the flag.".to_string(),
            level_count: self.levels.len(),
            estimated_level_duration: Duration::from_secs(90),
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.effective_tick_rate()
    }

    fn update(&mut self, dt: f32, input: &InputFrame) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let mut events = Vec::new();

        let now = self.state.clock.advance(dt);
        self.run_scheduled(now, &mut events);

        if input.reset_pressed {
            self.full_reset(&mut events);
        }
        if !self.state.mode.mode.is_play() {
            return events;
        }

        // Falling out of the world wins over every other trigger this tick
        if self.state.player.body.y > self.state.level.kill_y
            && self.lose_life(now, &mut events) != LifeLoss::Ignored
        {
            return events;
        }

        self.step_bodies(dt);

        if self.state.player.update(input, now, &self.config.feel) {
            events.push(GameEvent::Jumped);
            self.play(SoundCue::Jump);
        }

        carry(&mut self.state.player.body, &self.state.platforms);

        let elapsed = self.state.clock.now_secs();
        for enemy in &mut self.state.enemies {
            enemy.update(elapsed);
        }
        if self.resolve_enemy_contacts(now, &mut events) != LifeLoss::Ignored {
            return events;
        }

        let bounds = self.state.player.body.bounds();
        let on_hazard = self
            .state
            .level
            .hazards
            .iter()
            .any(|h| h.aabb().overlaps(&bounds));
        if on_hazard && self.lose_life(now, &mut events) != LifeLoss::Ignored {
            return events;
        }

        self.collect_coins(now, &mut events);
        self.touch_checkpoints(&mut events);

        let bounds = self.state.player.body.bounds();
        if bounds.overlaps(&self.state.level.goal_aabb()) {
            self.win(now, &mut events);
        }

        events
    }

    simulation_boilerplate!(state_type: PlatformerState);
}
