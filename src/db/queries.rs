use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use crate::models::scan::ScanRecord;
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SCAN_COLUMNS: &str = "id, badge_id, display_name, timestamp, direction, synced";

pub fn map_row(row: &Row) -> Result<ScanRecord> {
    let id: i64 = row.get("id")?;

    let ts_str: String = row.get("timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(AppError::CorruptRecord {
                    id,
                    detail: format!("timestamp {ts_str:?}: {e}"),
                }),
            )
        })?;

    let dir_str: String = row.get("direction")?;
    let direction = Direction::from_db_str(&dir_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::new(AppError::CorruptRecord {
                id,
                detail: format!("direction {dir_str:?}"),
            }),
        )
    })?;

    Ok(ScanRecord {
        id,
        badge_id: row.get("badge_id")?,
        display_name: row.get("display_name")?,
        timestamp,
        direction,
        synced: row.get::<_, i64>("synced")? != 0,
    })
}

fn collect(rows: impl Iterator<Item = Result<ScanRecord>>) -> AppResult<Vec<ScanRecord>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a new unsynced scan and return it with its assigned id.
pub fn insert_scan(
    conn: &Connection,
    badge_id: &str,
    display_name: &str,
    timestamp: DateTime<Local>,
    direction: Direction,
) -> AppResult<ScanRecord> {
    conn.execute(
        "INSERT INTO scans (badge_id, display_name, timestamp, scan_date, direction, synced)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        params![
            badge_id,
            display_name,
            timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
            timestamp.format("%Y-%m-%d").to_string(),
            direction.to_db_str(),
        ],
    )?;

    Ok(ScanRecord {
        id: conn.last_insert_rowid(),
        badge_id: badge_id.to_string(),
        display_name: display_name.to_string(),
        timestamp,
        direction,
        synced: false,
    })
}

/// Record with the greatest id for `badge_id`, if any.
pub fn last_scan_for(conn: &Connection, badge_id: &str) -> AppResult<Option<ScanRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SCAN_COLUMNS} FROM scans
         WHERE badge_id = ?1
         ORDER BY id DESC
         LIMIT 1"
    ))?;
    Ok(stmt.query_row([badge_id], map_row).optional()?)
}

/// All records with `synced = 0`, in id order.
pub fn load_unsynced(conn: &Connection) -> AppResult<Vec<ScanRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SCAN_COLUMNS} FROM scans
         WHERE synced = 0
         ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([], map_row)?;
    collect(rows)
}

/// All records whose local date is `date`, in id order.
pub fn load_scans_by_date(conn: &Connection, date: &NaiveDate) -> AppResult<Vec<ScanRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SCAN_COLUMNS} FROM scans
         WHERE scan_date = ?1
         ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([date.format("%Y-%m-%d").to_string()], map_row)?;
    collect(rows)
}

/// Flip `synced` to 1 for the given ids that exist and are still unsynced.
/// Returns how many rows actually changed; unknown or already-synced ids
/// are ignored.
pub fn mark_synced(conn: &mut Connection, ids: &[i64]) -> AppResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    let mut changed = 0;
    {
        let mut stmt = tx.prepare_cached("UPDATE scans SET synced = 1 WHERE id = ?1 AND synced = 0")?;
        for id in ids {
            changed += stmt.execute([id])?;
        }
    }
    tx.commit()?;
    Ok(changed)
}
