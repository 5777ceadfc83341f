//! Durable append-only scan log shared by the scan path and the sync engine.
//!
//! Every public operation takes the same mutex for its whole duration, so an
//! operation observes either all or none of a concurrent `append`.
//! `unsynced_records` and `mark_synced` are separate critical sections;
//! `mark_synced` only ever moves `synced` forward, so interleaving them is
//! harmless.

use crate::core::direction::next_direction;
use crate::core::summary::fold_daily_summaries;
use crate::db::log::{LogEntry, load_log, ttlog};
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::db::stats::{LogStats, collect_stats};
use crate::errors::AppResult;
use crate::models::day_summary::DailySummary;
use crate::models::direction::Direction;
use crate::models::scan::ScanRecord;
use chrono::{DateTime, Local, NaiveDate, SubsecRound};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

struct LogState {
    pool: DbPool,
    /// Timestamp of the newest record, used to keep timestamps non-decreasing in id order.
    last_stamp: Option<DateTime<Local>>,
}

impl LogState {
    /// Wall-clock now at stored (microsecond) precision, clamped so it never
    /// precedes the previous record.
    fn stamp(&mut self) -> DateTime<Local> {
        let now = Local::now().trunc_subsecs(6);
        let stamp = match self.last_stamp {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

pub struct EventLog {
    state: Mutex<LogState>,
    path: Option<PathBuf>,
}

impl EventLog {
    /// Open (or create) the log at `path`, running pending migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let pool = DbPool::new(path)?;
        Self::from_pool(pool, Some(path.to_path_buf()))
    }

    /// Non-persistent log, mostly for tests.
    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?, None)
    }

    fn from_pool(pool: DbPool, path: Option<PathBuf>) -> AppResult<Self> {
        run_pending_migrations(&pool.conn)?;

        let last_stamp: Option<String> = pool.conn.query_row(
            "SELECT MAX(timestamp) FROM scans WHERE id = (SELECT MAX(id) FROM scans)",
            [],
            |row| row.get(0),
        )?;
        let last_stamp = last_stamp
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Local));

        Ok(Self {
            state: Mutex::new(LogState { pool, last_stamp }),
            path,
        })
    }

    /// Database file backing this log (`None` for in-memory logs).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock()
    }

    /// Append a new unsynced record stamped with the current time.
    pub fn append(
        &self,
        badge_id: &str,
        display_name: &str,
        direction: Direction,
    ) -> AppResult<ScanRecord> {
        let mut state = self.lock();
        let stamp = state.stamp();
        let record = queries::insert_scan(&state.pool.conn, badge_id, display_name, stamp, direction)?;
        debug!(id = record.id, badge_id, %direction, "scan appended");
        Ok(record)
    }

    /// Resolve the next direction for `badge_id` and append it as one
    /// critical section and one transaction, so concurrent scans of the same
    /// badge cannot both read the same previous record.
    pub fn record_scan(&self, badge_id: &str, display_name: &str) -> AppResult<ScanRecord> {
        let mut state = self.lock();
        let stamp = state.stamp();

        let tx = state.pool.conn.transaction()?;
        let last = queries::last_scan_for(&tx, badge_id)?;
        let direction = next_direction(last.as_ref());
        let record = queries::insert_scan(&tx, badge_id, display_name, stamp, direction)?;
        tx.commit()?;

        debug!(id = record.id, badge_id, %direction, "scan recorded");
        Ok(record)
    }

    /// Record with the greatest id for `badge_id`.
    pub fn last_record_for(&self, badge_id: &str) -> AppResult<Option<ScanRecord>> {
        let state = self.lock();
        queries::last_scan_for(&state.pool.conn, badge_id)
    }

    /// Snapshot of all unsynced records, in id order.
    pub fn unsynced_records(&self) -> AppResult<Vec<ScanRecord>> {
        let state = self.lock();
        queries::load_unsynced(&state.pool.conn)
    }

    /// Mark the given ids as synced. Ids that do not exist or are already
    /// synced are ignored, so repeating a call is harmless. Returns the
    /// number of records that changed.
    pub fn mark_synced(&self, ids: &[i64]) -> AppResult<usize> {
        let mut state = self.lock();
        let changed = queries::mark_synced(&mut state.pool.conn, ids)?;
        debug!(requested = ids.len(), changed, "records marked synced");
        Ok(changed)
    }

    /// Records whose local date is `date`, in id order.
    pub fn records_for_date(&self, date: &NaiveDate) -> AppResult<Vec<ScanRecord>> {
        let state = self.lock();
        queries::load_scans_by_date(&state.pool.conn, date)
    }

    /// Per-badge first IN / last OUT / last action for `date`.
    pub fn summary_for_date(&self, date: &NaiveDate) -> AppResult<BTreeMap<String, DailySummary>> {
        let records = self.records_for_date(date)?;
        Ok(fold_daily_summaries(&records))
    }

    pub fn stats(&self) -> AppResult<LogStats> {
        let state = self.lock();
        collect_stats(&state.pool.conn)
    }

    /// Write a line to the internal audit table.
    pub fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        let state = self.lock();
        ttlog(&state.pool.conn, operation, target, message)
    }

    pub fn audit_entries(&self) -> AppResult<Vec<LogEntry>> {
        let state = self.lock();
        load_log(&state.pool.conn)
    }

    /// Result of `PRAGMA integrity_check` ("ok" when healthy).
    pub fn integrity_check(&self) -> AppResult<String> {
        let state = self.lock();
        let result: String = state
            .pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
        Ok(result)
    }

    pub fn vacuum(&self) -> AppResult<()> {
        let state = self.lock();
        state.pool.conn.execute_batch("VACUUM;")?;
        Ok(())
    }
}
