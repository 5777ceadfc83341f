//! Entry/exit alternation per badge.

use crate::core::event_log::EventLog;
use crate::errors::AppResult;
use crate::models::direction::Direction;
use crate::models::scan::ScanRecord;

/// OUT after an IN, IN in every other case (no history, or last was OUT).
pub fn next_direction(last: Option<&ScanRecord>) -> Direction {
    last.map_or(Direction::In, |rec| rec.direction.toggled())
}

/// Reads the log to decide the next direction for a badge. It never writes:
/// pairing it with `EventLog::append` is not atomic, use
/// `EventLog::record_scan` when scans may arrive concurrently.
pub struct DirectionResolver<'a> {
    log: &'a EventLog,
}

impl<'a> DirectionResolver<'a> {
    pub fn new(log: &'a EventLog) -> Self {
        Self { log }
    }

    pub fn next_direction(&self, badge_id: &str) -> AppResult<Direction> {
        let last = self.log.last_record_for(badge_id)?;
        Ok(next_direction(last.as_ref()))
    }
}
