use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    RespawnCoins,
    AdvanceLevel,
}

/// A deferred action bound to the attempt it was scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub due_ms: f64,
    pub attempt: u32,
    pub action: ScheduledAction,
}

/// Deadline-ordered queue. There is no cancel: events that stop making sense
/// are dropped by their guard when drained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<ScheduledEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every event due at or before `event.due_ms`, so equal
    /// deadlines drain in scheduling order.
    pub fn schedule(&mut self, event: ScheduledEvent) {
        let at = self.events.partition_point(|e| e.due_ms <= event.due_ms);
        self.events.insert(at, event);
    }

    /// Remove and return every event due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<ScheduledEvent> {
        let split = self.events.partition_point(|e| e.due_ms <= now_ms);
        self.events.drain(..split).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
