//! Debounced auto-save decision.
//!
//! The editor does not own timers. The caller reports each change and polls
//! [`AutoSaveTracker::due`]; a save is due once no change happened for the
//! whole debounce window.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct AutoSaveTracker {
    debounce: Duration,
    last_change: Option<Instant>,
}

impl AutoSaveTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_change: None,
        }
    }

    pub fn from_millis(debounce_ms: u64) -> Self {
        Self::new(Duration::from_millis(debounce_ms))
    }

    /// Mark unsaved changes and restart the debounce window
    pub fn record_change(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn due(&self, now: Instant) -> bool {
        match self.last_change {
            Some(changed_at) => now.saturating_duration_since(changed_at) >= self.debounce,
            None => false,
        }
    }

    pub fn mark_saved(&mut self) {
        self.last_change = None;
    }
}

impl Default for AutoSaveTracker {
    fn default() -> Self {
        Self::from_millis(1500)
    }
}
