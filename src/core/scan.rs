//! Foreground scan handling: validation, debounce, name lookup, record.

use crate::core::debounce::Debouncer;
use crate::core::event_log::EventLog;
use crate::errors::{AppError, AppResult};
use crate::models::scan::ScanRecord;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

pub const UNKNOWN_EMPLOYEE: &str = "Unknown Employee";

/// Read-only badge → display name lookup, injected by the caller.
pub trait NameLookup {
    fn display_name(&self, badge_id: &str) -> Option<String>;
}

impl NameLookup for BTreeMap<String, String> {
    fn display_name(&self, badge_id: &str) -> Option<String> {
        self.get(badge_id).cloned()
    }
}

impl NameLookup for HashMap<String, String> {
    fn display_name(&self, badge_id: &str) -> Option<String> {
        self.get(badge_id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Recorded(ScanRecord),
    /// Same badge seen again inside the debounce window; nothing was written.
    Cooldown { badge_id: String, remaining: Duration },
}

pub struct ScanHandler<L: NameLookup> {
    log: Arc<EventLog>,
    names: L,
    debouncer: Debouncer,
}

impl<L: NameLookup> ScanHandler<L> {
    pub fn new(log: Arc<EventLog>, names: L, debouncer: Debouncer) -> Self {
        Self {
            log,
            names,
            debouncer,
        }
    }

    pub fn handle(&mut self, raw_badge: &str) -> AppResult<ScanOutcome> {
        self.handle_at(raw_badge, Instant::now())
    }

    /// Process one scan as if it happened at `now` (monotonic clock).
    pub fn handle_at(&mut self, raw_badge: &str, now: Instant) -> AppResult<ScanOutcome> {
        let badge_id = raw_badge.trim();
        if badge_id.is_empty() {
            return Err(AppError::InvalidBadge(raw_badge.to_string()));
        }

        if let Some(remaining) = self.debouncer.cooldown_at(badge_id, now) {
            return Ok(ScanOutcome::Cooldown {
                badge_id: badge_id.to_string(),
                remaining,
            });
        }

        let name = self
            .names
            .display_name(badge_id)
            .unwrap_or_else(|| UNKNOWN_EMPLOYEE.to_string());

        // the window starts only once the scan is stored
        let record = self.log.record_scan(badge_id, &name)?;
        self.debouncer.accept_at(badge_id, now);
        info!(id = record.id, badge_id, direction = %record.direction, "scan accepted");
        Ok(ScanOutcome::Recorded(record))
    }
}
