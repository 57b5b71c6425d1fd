mod script;

use std::time::Duration;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use circle_core::audio::{AudioSink, MutableAudio, SoundCue};
use circle_core::game_trait::Simulation;
use circle_core::overlay::toast::ToastQueue;
use circle_platformer::PlatformerGame;
use circle_platformer::config::PlatformerConfig;
use circle_platformer::events::GameEvent;

use script::{Script, ScriptedKeyboard};

/// Sink that writes cues to the log instead of a speaker.
struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        tracing::debug!(cue = cue.name(), "Sound");
    }
}

struct Args {
    ticks: u64,
    script: Script,
    realtime: bool,
    mute: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        ticks: 600,
        script: Script::Walk,
        realtime: false,
        mute: false,
    };
    for arg in std::env::args().skip(1) {
        if let Some(n) = arg.strip_prefix("--ticks=") {
            match n.parse::<u64>() {
                Ok(n) => args.ticks = n,
                Err(e) => tracing::warn!("Ignoring --ticks={n}: {e}"),
            }
        } else if let Some(name) = arg.strip_prefix("--script=") {
            match Script::parse(name) {
                Some(s) => args.script = s,
                None => tracing::warn!("Unknown script '{name}', expected walk, idle or hop"),
            }
        } else if arg == "--realtime" {
            args.realtime = true;
        } else if arg == "--mute" {
            args.mute = true;
        } else {
            tracing::warn!("Ignoring unknown argument {arg}");
        }
    }
    args
}

#[derive(Serialize)]
struct PlayerReport {
    x: f32,
    y: f32,
}

#[derive(Serialize)]
struct Report {
    ticks: u64,
    level: String,
    mode: &'static str,
    score: u32,
    lives: u32,
    player: PlayerReport,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args();
    let config = PlatformerConfig::load();
    let tick_rate = config.effective_tick_rate();
    let mut game = PlatformerGame::from_config(config);

    let mut audio = MutableAudio::new(LogAudio);
    audio.set_muted(args.mute);
    game.set_audio(Box::new(audio));

    let meta = game.metadata();
    tracing::info!(
        "{} ({} levels), script {} for {} ticks at {tick_rate} Hz",
        meta.name,
        meta.level_count,
        args.script.name(),
        args.ticks
    );

    let dt = 1.0 / tick_rate;
    let frame_ms = f64::from(dt) * 1000.0;
    let mut keyboard = ScriptedKeyboard::new(args.script);
    let mut toasts = ToastQueue::new();

    for tick in 0..args.ticks {
        let input = keyboard.frame(tick);
        for event in game.update(dt, &input) {
            tracing::info!(tick, kind = event.kind(), "{event:?}");
            if let GameEvent::Toast(toast) = event {
                toasts.push(toast);
            }
        }
        toasts.tick(frame_ms);
        if args.realtime {
            std::thread::sleep(Duration::from_secs_f32(dt));
        }
    }
    if !toasts.is_empty() {
        for toast in toasts.visible() {
            tracing::debug!(text = %toast.text, "Toast still on screen");
        }
        tracing::debug!(pending = toasts.pending_len(), "Toasts still queued");
    }

    let player = &game.player().body;
    let report = Report {
        ticks: args.ticks,
        level: game.level().name.clone(),
        mode: game.mode().name(),
        score: game.score(),
        lives: game.lives(),
        player: PlayerReport {
            x: player.x,
            y: player.y,
        },
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode report: {e}"),
    }
}
