pub mod audio;
pub mod clock;
pub mod game_trait;
pub mod overlay;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use crate::audio::{AudioSink, SoundCue};
    use crate::game_trait::Simulation;

    /// Audio sink that records every cue it receives. Clones share one log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAudio {
        cues: Arc<Mutex<Vec<SoundCue>>>,
    }

    impl RecordingAudio {
        pub fn new() -> Self {
            Self::default()
        }

        /// Cues played so far, oldest first.
        pub fn cues(&self) -> Vec<SoundCue> {
            self.cues.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn count(&self, cue: SoundCue) -> usize {
            self.cues().iter().filter(|&&c| c == cue).count()
        }
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: SoundCue) {
            if let Ok(mut cues) = self.cues.lock() {
                cues.push(cue);
            }
        }
    }

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_ticks<S: Simulation>(sim: &mut S, input: &S::Input, n: usize, dt: f32) -> Vec<S::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(sim.update(dt, input));
        }
        all_events
    }

    /// Assert that the simulation's serialized state differs from `before`.
    pub fn assert_state_changed<S: Simulation>(sim: &S, before: &[u8]) {
        let after = sim.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Simulation state should have changed after operation"
        );
    }

    // ================================================================
    // Simulation Trait Contract Tests
    // ================================================================
    // Every Simulation implementation should pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance and
    // an input value that does not trigger a reset.

    /// serialize_state() must return non-empty bytes.
    pub fn contract_state_is_nonempty<S: Simulation>(sim: &S) {
        let state = sim.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// update() with dt>0 must advance the simulation (at least its clock).
    pub fn contract_update_advances_time<S: Simulation>(sim: &mut S, input: &S::Input) {
        let before = sim.serialize_state();
        sim.update(1.0 / 60.0, input);
        let after = sim.serialize_state();
        assert_ne!(before, after, "update(dt>0) must advance simulation state");
    }

    /// serialize → apply → serialize must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves<S: Simulation>(sim: &mut S) {
        let state_a = sim.serialize_state();
        sim.apply_state(&state_a);
        let state_b = sim.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage bytes passed to apply_state() must leave state untouched.
    pub fn contract_apply_garbage_is_ignored<S: Simulation>(sim: &mut S) {
        let before = sim.serialize_state();
        sim.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        assert_eq!(
            before,
            sim.serialize_state(),
            "Malformed state bytes must be ignored"
        );
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates<S: Simulation>(sim: &mut S, input: &S::Input) {
        sim.pause();
        assert!(sim.is_paused());
        let before = sim.serialize_state();
        let events = sim.update(1.0, input);
        assert!(events.is_empty(), "No events may be emitted while paused");
        assert_eq!(
            before,
            sim.serialize_state(),
            "State must not change while paused"
        );

        sim.resume();
        sim.update(1.0 / 60.0, input);
        assert_ne!(
            before,
            sim.serialize_state(),
            "State must change after resume"
        );
    }
}
