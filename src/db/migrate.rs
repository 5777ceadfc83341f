//! Schema management for the scan log.
//!
//! Every step is idempotent and runs on each open, so a fresh file, a file
//! written by an older build and a file left behind by the legacy kiosk
//! (`attendance` table) all end up with the same schema.

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, SubsecRound};
use std::collections::HashMap;
use rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::{info, warn};

const LEGACY_IMPORT: &str = "20250301_0001_import_legacy_attendance";

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Create the `scans` table and its indexes.
fn create_scans_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS scans (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            badge_id      TEXT NOT NULL,
            display_name  TEXT NOT NULL,
            timestamp     TEXT NOT NULL,
            scan_date     TEXT NOT NULL,
            direction     TEXT NOT NULL CHECK(direction IN ('IN','OUT')),
            synced        INTEGER NOT NULL DEFAULT 0 CHECK(synced IN (0,1))
        );

        CREATE INDEX IF NOT EXISTS idx_scans_badge_id ON scans(badge_id, id);
        CREATE INDEX IF NOT EXISTS idx_scans_synced ON scans(synced, id);
        CREATE INDEX IF NOT EXISTS idx_scans_date ON scans(scan_date, id);
        "#,
    )?;
    Ok(())
}

/// Legacy timestamps are naive local ISO strings ("2025-03-01T08:59:12.123456").
fn legacy_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()?
        .and_local_timezone(Local)
        .earliest()
}

/// Copy rows of the legacy `attendance` table into `scans`, keeping ids and
/// synced flags. The import runs once, so no row is dropped: an unreadable
/// timestamp takes the previous row's (or now), an unreadable direction the
/// toggle of the badge's previous one. Each such row gets a
/// `legacy_recovered` audit entry.
fn import_legacy_attendance(conn: &Connection) -> AppResult<()> {
    if !table_exists(conn, "attendance")? || migration_applied(conn, LEGACY_IMPORT)? {
        return Ok(());
    }

    warn!("legacy attendance table detected, importing into scans");

    // 1) Load everything first, the statement must be dropped before the tx
    let rows: Vec<(i64, String, Option<String>, String, String, bool)> = {
        let mut stmt = conn.prepare(
            "SELECT id, rfid_uid, employee_name, timestamp, direction, synced
             FROM attendance ORDER BY id ASC",
        )?;
        let mapped = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get::<_, i64>(5)? != 0,
            ))
        })?;
        mapped.collect::<Result<_>>()?
    };

    // 2) Insert with explicit ids so AUTOINCREMENT continues after them
    conn.execute_batch("BEGIN IMMEDIATE;")?;
    let outcome = (|| -> AppResult<(usize, usize)> {
        let mut imported = 0;
        let mut recovered = 0;
        let mut prev_ts: Option<DateTime<Local>> = None;
        let mut prev_dir: HashMap<String, Direction> = HashMap::new();
        let mut insert = conn.prepare(
            "INSERT OR IGNORE INTO scans (id, badge_id, display_name, timestamp, scan_date, direction, synced)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (id, badge, name, raw_ts, raw_dir, synced) in rows {
            let parsed_ts = legacy_timestamp(&raw_ts);
            let parsed_dir = raw_dir.parse::<Direction>().ok();

            let ts = parsed_ts
                .or(prev_ts)
                .unwrap_or_else(|| Local::now().trunc_subsecs(6));
            let dir = parsed_dir.unwrap_or_else(|| {
                prev_dir
                    .get(&badge)
                    .map_or(Direction::In, |d| d.toggled())
            });

            if parsed_ts.is_none() || parsed_dir.is_none() {
                warn!(id, timestamp = %raw_ts, direction = %raw_dir, "legacy row imported with fallback values");
                ttlog(
                    conn,
                    "legacy_recovered",
                    &id.to_string(),
                    &format!("timestamp {raw_ts:?} direction {raw_dir:?} stored as {} {dir}", ts.to_rfc3339()),
                )?;
                recovered += 1;
            }
            prev_ts = Some(ts);
            prev_dir.insert(badge.clone(), dir);
            imported += insert.execute(params![
                id,
                badge,
                name.unwrap_or_default(),
                ts.to_rfc3339_opts(SecondsFormat::Micros, false),
                ts.format("%Y-%m-%d").to_string(),
                dir.to_db_str(),
                synced as i64,
            ])?;
        }
        ttlog(
            conn,
            "migration_applied",
            LEGACY_IMPORT,
            &format!("Imported {imported} legacy attendance rows ({recovered} with fallback values)"),
        )?;
        Ok((imported, recovered))
    })();

    match outcome {
        Ok((imported, recovered)) => {
            conn.execute_batch("COMMIT;")?;
            info!(imported, recovered, "legacy attendance import completed");
            Ok(())
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK;")?;
            Err(AppError::Migration(format!("legacy attendance import failed: {e}")))
        }
    }
}

/// Public entry point: run all pending migrations.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Ensure scans table + indexes
    let fresh = !table_exists(conn, "scans")?;
    create_scans_table(conn)?;
    if fresh {
        ttlog(conn, "migration_applied", "create_scans", "Created scans table")?;
        info!("created scans table");
    }

    // 3) Bring over data from the legacy kiosk schema, once
    import_legacy_attendance(conn)?;

    Ok(())
}
