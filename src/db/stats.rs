//! Aggregate figures about the scan log (`db --info`).

use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStats {
    pub total: i64,
    pub unsynced: i64,
    pub badges: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn collect_stats(conn: &Connection) -> AppResult<LogStats> {
    let (total, unsynced, badges): (i64, i64, i64) = conn.query_row(
        "SELECT COUNT(*), IFNULL(SUM(synced = 0), 0), COUNT(DISTINCT badge_id) FROM scans",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let first_date: Option<String> = conn
        .query_row(
            "SELECT scan_date FROM scans ORDER BY id ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = conn
        .query_row(
            "SELECT scan_date FROM scans ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(LogStats {
        total,
        unsynced,
        badges,
        first_date,
        last_date,
    })
}
