use serde::{Deserialize, Serialize};

/// Maximum number of simultaneously visible toast notifications.
pub const MAX_VISIBLE_TOASTS: usize = 3;

/// A transient message shown for a fixed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub text: String,
    pub duration_ms: u32,
}

impl Toast {
    pub fn new(text: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            text: text.into(),
            duration_ms,
        }
    }
}

#[derive(Debug, Clone)]
struct LiveToast {
    toast: Toast,
    remaining_ms: f64,
}

/// Queue managing toast display on the UI side.
pub struct ToastQueue {
    visible: Vec<LiveToast>,
    pending: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Add a new toast to the queue.
    pub fn push(&mut self, toast: Toast) {
        if self.visible.len() < MAX_VISIBLE_TOASTS {
            self.visible.push(LiveToast {
                remaining_ms: f64::from(toast.duration_ms),
                toast,
            });
        } else {
            self.pending.push(toast);
        }
    }

    /// Age visible toasts by `delta_ms`, drop expired ones and promote
    /// pending ones into the freed slots.
    pub fn tick(&mut self, delta_ms: f64) {
        for live in &mut self.visible {
            live.remaining_ms -= delta_ms;
        }
        self.visible.retain(|t| t.remaining_ms > 0.0);
        while self.visible.len() < MAX_VISIBLE_TOASTS && !self.pending.is_empty() {
            let toast = self.pending.remove(0);
            self.visible.push(LiveToast {
                remaining_ms: f64::from(toast.duration_ms),
                toast,
            });
        }
    }

    /// Texts of the currently visible toasts, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.visible.iter().map(|t| &t.toast)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.pending.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_expires_after_duration() {
        let mut q = ToastQueue::new();
        q.push(Toast::new("Checkpoint saved!", 900));
        q.tick(500.0);
        assert_eq!(q.visible().count(), 1);
        q.tick(400.0);
        assert!(q.is_empty());
    }

    #[test]
    fn overflow_waits_for_a_free_slot() {
        let mut q = ToastQueue::new();
        for i in 0..MAX_VISIBLE_TOASTS {
            q.push(Toast::new(format!("t{i}"), 100));
        }
        q.push(Toast::new("late", 1000));
        assert_eq!(q.visible().count(), MAX_VISIBLE_TOASTS);
        assert_eq!(q.pending_len(), 1);

        q.tick(150.0);
        let texts: Vec<_> = q.visible().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["late"]);
        assert_eq!(q.pending_len(), 0);
    }
}
