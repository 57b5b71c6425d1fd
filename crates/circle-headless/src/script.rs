use circle_platformer::input::{InputFrame, Key, Keyboard};

/// Ticks between hops in the `hop` script.
const HOP_PERIOD: u64 = 45;

/// Canned input tracks for unattended runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Idle,
    Walk,
    Hop,
}

impl Script {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "idle" => Some(Script::Idle),
            "walk" => Some(Script::Walk),
            "hop" => Some(Script::Hop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Script::Idle => "idle",
            Script::Walk => "walk",
            Script::Hop => "hop",
        }
    }
}

/// Replays a script through a [`Keyboard`] so edges behave like real keys.
pub struct ScriptedKeyboard {
    script: Script,
    keyboard: Keyboard,
}

impl ScriptedKeyboard {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            keyboard: Keyboard::new(),
        }
    }

    pub fn frame(&mut self, tick: u64) -> InputFrame {
        match self.script {
            Script::Idle => {},
            Script::Walk => self.keyboard.press(Key::ArrowRight),
            Script::Hop => {
                self.keyboard.press(Key::D);
                if tick % HOP_PERIOD == 0 {
                    self.keyboard.press(Key::Space);
                } else {
                    self.keyboard.release(Key::Space);
                }
            },
        }
        self.keyboard.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        for script in [Script::Idle, Script::Walk, Script::Hop] {
            assert_eq!(Script::parse(script.name()), Some(script));
        }
        assert_eq!(Script::parse("dance"), None);
    }

    #[test]
    fn hop_presses_jump_periodically() {
        let mut kb = ScriptedKeyboard::new(Script::Hop);
        let jumps: Vec<u64> = (0..100).filter(|&t| kb.frame(t).jump_pressed).collect();
        assert_eq!(jumps, vec![0, 45, 90]);
    }

    #[test]
    fn walk_holds_right() {
        let mut kb = ScriptedKeyboard::new(Script::Walk);
        assert!((0..5).all(|t| {
            let f = kb.frame(t);
            f.right && !f.left && !f.jump_pressed
        }));
    }
}
