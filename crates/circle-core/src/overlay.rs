pub mod toast;

use serde::{Deserialize, Serialize};

/// Action a button on an overlay invokes when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayAction {
    /// Full reset of the current level.
    Retry,
}

impl OverlayAction {
    pub fn label(self) -> &'static str {
        match self {
            OverlayAction::Retry => "Try again",
        }
    }
}

/// Request for the UI to show a modal overlay (win/lose screens).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRequest {
    pub title: String,
    /// Buttons to show, in order. Empty means no buttons.
    pub actions: Vec<OverlayAction>,
}

impl OverlayRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: OverlayAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn has_buttons(&self) -> bool {
        !self.actions.is_empty()
    }
}
