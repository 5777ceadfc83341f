//! Per-badge cooldown for the foreground scan path.
//!
//! A reader held against the antenna produces a burst of identical reads;
//! only the first one inside the window is accepted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_accepted: HashMap<String, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Remaining cooldown for `badge_id` at `now`, if any. Does not change state.
    pub fn cooldown_at(&self, badge_id: &str, now: Instant) -> Option<Duration> {
        let prev = self.last_accepted.get(badge_id)?;
        let elapsed = now.saturating_duration_since(*prev);
        (elapsed < self.window).then(|| self.window - elapsed)
    }

    /// Start a new window for `badge_id`. Call once the scan is stored.
    pub fn accept_at(&mut self, badge_id: &str, now: Instant) {
        self.last_accepted.insert(badge_id.to_string(), now);
    }

    /// Accept the scan (and restart the window) or return the remaining cooldown.
    /// Rejected scans do not extend the window.
    pub fn check_at(&mut self, badge_id: &str, now: Instant) -> Result<(), Duration> {
        if let Some(remaining) = self.cooldown_at(badge_id, now) {
            return Err(remaining);
        }
        self.accept_at(badge_id, now);
        Ok(())
    }

    pub fn check(&mut self, badge_id: &str) -> Result<(), Duration> {
        self.check_at(badge_id, Instant::now())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
