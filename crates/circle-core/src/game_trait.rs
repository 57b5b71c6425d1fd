use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Core trait for a frame-driven simulation.
///
/// The host owns the window, renderer and audio device; the simulation only
/// advances game state and reports what happened as events.
pub trait Simulation {
    /// Per-tick input sampled by the host.
    type Input;
    /// Events emitted for the UI/audio collaborators.
    type Event;

    /// Metadata for title screens and logs.
    fn metadata(&self) -> SimMetadata;

    /// Advance one tick of `dt` seconds. Returns the events the tick produced.
    fn update(&mut self, dt: f32, input: &Self::Input) -> Vec<Self::Event>;

    /// Serialize the full mutable simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with a previously serialized snapshot.
    /// Malformed bytes are ignored.
    fn apply_state(&mut self, state: &[u8]);

    /// Preferred tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Host-level pause (focus lost, debugger attached). Not a game mode.
    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}

/// Descriptive metadata for a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimMetadata {
    pub name: String,
    pub description: String,
    pub level_count: usize,
    pub estimated_level_duration: Duration,
}

/// Generates the `Simulation` methods that only shuffle state around:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_paused`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields.
#[macro_export]
macro_rules! simulation_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("simulation state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Dropped malformed state snapshot"),
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    };
}
