use super::direction::Direction;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Per-badge projection of one calendar day. Derived on read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub display_name: String,
    /// Earliest IN of the day.
    pub first_in: Option<DateTime<Local>>,
    /// Latest OUT of the day.
    pub last_out: Option<DateTime<Local>>,
    /// Direction of the last scan of the day.
    pub last_action: Direction,
    pub scans: usize,
}
