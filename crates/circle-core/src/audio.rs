use serde::{Deserialize, Serialize};

/// Discrete sound cues fired as side effects of gameplay events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Coin,
    Checkpoint,
    Stomp,
    Hurt,
    Win,
    Lose,
}

impl SoundCue {
    pub const ALL: [SoundCue; 7] = [
        SoundCue::Jump,
        SoundCue::Coin,
        SoundCue::Checkpoint,
        SoundCue::Stomp,
        SoundCue::Hurt,
        SoundCue::Win,
        SoundCue::Lose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Coin => "coin",
            SoundCue::Checkpoint => "checkpoint",
            SoundCue::Stomp => "stomp",
            SoundCue::Hurt => "hurt",
            SoundCue::Win => "win",
            SoundCue::Lose => "lose",
        }
    }
}

/// Receiver for sound cues. Playback is fire-and-forget: a sink can never
/// fail the caller, and nothing in the simulation waits on it.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Whether the sink is currently producing sound.
    fn is_muted(&self) -> bool {
        false
    }
}

/// Sink used when no audio device is available. Swallows every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}

    fn is_muted(&self) -> bool {
        true
    }
}

/// Wraps another sink with a mute switch.
pub struct MutableAudio<S> {
    inner: S,
    muted: bool,
}

impl<S: AudioSink> MutableAudio<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip the mute switch, returning the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AudioSink> AudioSink for MutableAudio<S> {
    fn play(&mut self, cue: SoundCue) {
        if !self.muted {
            self.inner.play(cue);
        }
    }

    fn is_muted(&self) -> bool {
        self.muted || self.inner.is_muted()
    }
}
