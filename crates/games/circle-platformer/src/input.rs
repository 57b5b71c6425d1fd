use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Input for one tick. `jump_pressed` and `reset_pressed` are rising edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
    pub reset_pressed: bool,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }
}

/// Physical keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    A,
    D,
    W,
    Space,
    R,
}

/// Tracks held keys and turns them into [`InputFrame`]s with edge detection
/// for jump and reset.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    held: HashSet<Key>,
    jump_was_held: bool,
    reset_was_held: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Sample the current frame. Call once per tick.
    pub fn frame(&mut self) -> InputFrame {
        let any = |keys: &[Key]| keys.iter().any(|&k| self.is_held(k));
        let jump_held = any(&[Key::ArrowUp, Key::W, Key::Space]);
        let reset_held = any(&[Key::R]);
        let frame = InputFrame {
            left: any(&[Key::ArrowLeft, Key::A]),
            right: any(&[Key::ArrowRight, Key::D]),
            jump_pressed: jump_held && !self.jump_was_held,
            reset_pressed: reset_held && !self.reset_was_held,
        };
        self.jump_was_held = jump_held;
        self.reset_was_held = reset_held;
        frame
    }
}
