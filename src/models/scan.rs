use super::direction::Direction;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

/// One badge scan as persisted in the `scans` table.
///
/// Everything except `synced` is fixed at append time; `synced` only ever
/// goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRecord {
    pub id: i64,                    // ⇔ scans.id (AUTOINCREMENT, never reused)
    pub badge_id: String,           // ⇔ scans.badge_id
    pub display_name: String,       // ⇔ scans.display_name (resolved at scan time)
    pub timestamp: DateTime<Local>, // ⇔ scans.timestamp (RFC 3339 TEXT)
    pub direction: Direction,       // ⇔ scans.direction ('IN' | 'OUT')
    pub synced: bool,               // ⇔ scans.synced (0/1)
}

impl ScanRecord {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn date_str(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
