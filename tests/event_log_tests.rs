use rattendance::core::direction::{DirectionResolver, next_direction};
use rattendance::core::event_log::EventLog;
use rattendance::core::summary::fold_daily_summaries;
use rattendance::errors::AppError;
use rattendance::models::direction::Direction;
use rattendance::models::scan::ScanRecord;
use chrono::{Local, TimeZone};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn test_append_then_last_record_for_returns_it() {
    let log = EventLog::open_in_memory().expect("open log");

    let rec = log.append("A1", "Alice", Direction::In).expect("append");
    let last = log.last_record_for("A1").expect("query").expect("record present");

    assert_eq!(last, rec);
    assert!(!last.synced);
    assert!(log.last_record_for("B2").expect("query").is_none());
}

#[test]
fn test_ids_are_strictly_increasing_and_timestamps_non_decreasing() {
    let log = EventLog::open_in_memory().expect("open log");

    let recs: Vec<ScanRecord> = (0..20)
        .map(|i| log.append(&format!("B{}", i % 3), "x", Direction::In).expect("append"))
        .collect();

    for pair in recs.windows(2) {
        assert!(pair[1].id > pair[0].id);
        assert!(pair[1].timestamp >= pair[0].timestamp);
    }
}

#[test]
fn test_n_appends_give_n_unsynced() {
    let log = EventLog::open_in_memory().expect("open log");
    for i in 0..7 {
        log.record_scan(&format!("B{i}"), "Someone").expect("scan");
    }

    let unsynced = log.unsynced_records().expect("unsynced");
    assert_eq!(unsynced.len(), 7);
    let ids: Vec<i64> = unsynced.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted, "unsynced records come back in id order");
}

#[test]
fn test_mark_synced_is_idempotent() {
    let log = EventLog::open_in_memory().expect("open log");
    let a = log.record_scan("A", "Alice").expect("scan");
    let b = log.record_scan("B", "Bob").expect("scan");
    let c = log.record_scan("C", "Carol").expect("scan");

    assert_eq!(log.mark_synced(&[a.id, b.id]).expect("mark"), 2);
    let after_first: Vec<i64> = log.unsynced_records().unwrap().iter().map(|r| r.id).collect();

    assert_eq!(log.mark_synced(&[a.id, b.id]).expect("mark again"), 0);
    let after_second: Vec<i64> = log.unsynced_records().unwrap().iter().map(|r| r.id).collect();

    assert_eq!(after_first, vec![c.id]);
    assert_eq!(after_first, after_second);
}

#[test]
fn test_mark_synced_ignores_unknown_ids() {
    let log = EventLog::open_in_memory().expect("open log");
    let a = log.record_scan("A", "Alice").expect("scan");

    assert_eq!(log.mark_synced(&[a.id, 9_999]).expect("mark"), 1);
    assert_eq!(log.mark_synced(&[]).expect("empty mark"), 0);
    assert!(log.unsynced_records().unwrap().is_empty());
}

#[test]
fn test_direction_alternates_per_badge() {
    let log = EventLog::open_in_memory().expect("open log");

    for _ in 0..3 {
        log.record_scan("A", "Alice").expect("scan");
        log.record_scan("B", "Bob").expect("scan");
    }
    log.record_scan("A", "Alice").expect("scan");

    let mut by_badge: HashMap<String, Vec<Direction>> = HashMap::new();
    for rec in log.unsynced_records().unwrap() {
        by_badge.entry(rec.badge_id).or_default().push(rec.direction);
    }

    for (badge, dirs) in by_badge {
        assert_eq!(dirs[0], Direction::In, "first scan of {badge} is IN");
        for pair in dirs.windows(2) {
            assert_ne!(pair[0], pair[1], "consecutive scans of {badge} must alternate");
        }
    }
}

#[test]
fn test_concurrent_scans_of_same_badge_still_alternate() {
    let log = Arc::new(EventLog::open_in_memory().expect("open log"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for _ in 0..10 {
                    log.record_scan("SHARED", "Shared").expect("scan");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("join");
    }

    let dirs: Vec<Direction> = log
        .unsynced_records()
        .unwrap()
        .into_iter()
        .map(|r| r.direction)
        .collect();
    assert_eq!(dirs.len(), 40);
    for (i, dir) in dirs.iter().enumerate() {
        let expected = if i % 2 == 0 { Direction::In } else { Direction::Out };
        assert_eq!(*dir, expected, "record {i}");
    }
}

#[test]
fn test_resolver_follows_last_record() {
    let log = EventLog::open_in_memory().expect("open log");
    let resolver = DirectionResolver::new(&log);

    assert_eq!(resolver.next_direction("Z").unwrap(), Direction::In);
    log.append("Z", "Zed", Direction::In).unwrap();
    assert_eq!(resolver.next_direction("Z").unwrap(), Direction::Out);
    log.append("Z", "Zed", Direction::Out).unwrap();
    assert_eq!(resolver.next_direction("Z").unwrap(), Direction::In);

    assert_eq!(next_direction(None), Direction::In);
}

#[test]
fn test_badge_x_scenario_summary() {
    let log = EventLog::open_in_memory().expect("open log");

    let s1 = log.record_scan("X", "Xavier").expect("scan 1");
    let s2 = log.record_scan("X", "Xavier").expect("scan 2");
    let s3 = log.record_scan("X", "Xavier").expect("scan 3");

    assert_eq!(s1.direction, Direction::In);
    assert_eq!(s2.direction, Direction::Out);
    assert_eq!(s3.direction, Direction::In);

    let summary = log.summary_for_date(&s1.date()).expect("summary");
    let x = summary.get("X").expect("X in summary");

    assert_eq!(x.first_in, Some(s1.timestamp));
    assert_eq!(x.last_out, Some(s2.timestamp));
    assert_eq!(x.last_action, Direction::In);
    assert_eq!(x.scans, 3);
    assert_eq!(x.display_name, "Xavier");
}

#[test]
fn test_summary_picks_earliest_in_and_latest_out() {
    let at = |h: u32, m: u32| Local.with_ymd_and_hms(2025, 3, 3, h, m, 0).unwrap();
    let rec = |id: i64, h: u32, dir: Direction| ScanRecord {
        id,
        badge_id: "E1".into(),
        display_name: "Eve".into(),
        timestamp: at(h, 0),
        direction: dir,
        synced: false,
    };

    let records = vec![
        rec(1, 8, Direction::In),
        rec(2, 12, Direction::Out),
        rec(3, 13, Direction::In),
        rec(4, 17, Direction::Out),
    ];
    let summary = fold_daily_summaries(&records);
    let eve = &summary["E1"];

    assert_eq!(eve.first_in, Some(at(8, 0)));
    assert_eq!(eve.last_out, Some(at(17, 0)));
    assert_eq!(eve.last_action, Direction::Out);
}

#[test]
fn test_summary_without_out_has_no_last_out() {
    let log = EventLog::open_in_memory().expect("open log");
    let s1 = log.record_scan("Y", "Yara").expect("scan");

    let summary = log.summary_for_date(&s1.date()).expect("summary");
    assert_eq!(summary["Y"].last_out, None);
    assert_eq!(summary["Y"].last_action, Direction::In);
}

#[test]
fn test_log_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("scans.sqlite");

    let (first, marked) = {
        let log = EventLog::open(&path).expect("open");
        let first = log.record_scan("P", "Pat").expect("scan");
        let marked = log.record_scan("Q", "Quinn").expect("scan");
        log.mark_synced(&[marked.id]).expect("mark");
        (first, marked)
    };

    let log = EventLog::open(&path).expect("reopen");
    assert_eq!(log.path(), Some(path.as_path()));

    let unsynced = log.unsynced_records().expect("unsynced");
    assert_eq!(unsynced, vec![first.clone()]);

    // direction keeps alternating across restarts
    let next = log.record_scan("P", "Pat").expect("scan after reopen");
    assert_eq!(next.direction, Direction::Out);
    assert!(next.id > marked.id);
    assert!(next.timestamp >= marked.timestamp);
}

#[test]
fn test_legacy_attendance_rows_are_imported_once() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("legacy.sqlite");

    {
        let conn = rusqlite::Connection::open(&path).expect("open raw");
        conn.execute_batch(
            r#"
            CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rfid_uid TEXT NOT NULL,
                employee_name TEXT,
                timestamp TEXT NOT NULL,
                direction TEXT NOT NULL,
                synced INTEGER DEFAULT 0
            );
            INSERT INTO attendance VALUES (1, '11', 'Ann', '2025-03-01T08:59:12.123456', 'IN', 1);
            INSERT INTO attendance VALUES (2, '11', 'Ann', '2025-03-01T17:02:00.000000', 'OUT', 0);
            INSERT INTO attendance VALUES (3, '22', NULL, 'not a time', 'IN', 0);
            INSERT INTO attendance VALUES (4, '11', 'Ann', '2025-03-01T18:30:00.000000', 'sideways', 0);
            "#,
        )
        .expect("seed legacy table");
    }

    let log = EventLog::open(&path).expect("open with import");
    let unsynced = log.unsynced_records().expect("unsynced");
    assert_eq!(unsynced.len(), 3);
    assert_eq!(unsynced[0].id, 2);
    assert_eq!(unsynced[0].direction, Direction::Out);

    // the unreadable row is kept, stamped like its predecessor and flagged
    assert_eq!(unsynced[1].id, 3);
    assert_eq!(unsynced[1].badge_id, "22");
    assert_eq!(unsynced[1].direction, Direction::In);
    assert_eq!(unsynced[1].timestamp, unsynced[0].timestamp);
    let entries = log.audit_entries().expect("audit");
    assert!(entries.iter().any(|e| e.operation == "legacy_recovered" && e.target == "3"));

    // an unreadable direction continues the badge's alternation
    assert_eq!(unsynced[2].id, 4);
    assert_eq!(unsynced[2].direction, Direction::In);
    assert!(entries.iter().any(|e| e.operation == "legacy_recovered" && e.target == "4"));

    let next = log.record_scan("11", "Ann").expect("scan");
    assert_eq!(next.direction, Direction::Out);
    assert!(next.id > 4);
    drop(log);

    // reopening must not import again
    let log = EventLog::open(&path).expect("reopen");
    assert_eq!(log.stats().expect("stats").total, 5);
}

#[test]
fn test_stats_and_audit() {
    let log = EventLog::open_in_memory().expect("open log");
    let a = log.record_scan("A", "Alice").expect("scan");
    log.record_scan("B", "Bob").expect("scan");
    log.mark_synced(&[a.id]).expect("mark");

    let stats = log.stats().expect("stats");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.unsynced, 1);
    assert_eq!(stats.badges, 2);
    assert_eq!(stats.first_date.as_deref(), Some(a.date_str().as_str()));

    log.audit("init", "test", "hello").expect("audit");
    let entries = log.audit_entries().expect("entries");
    assert!(entries.iter().any(|e| e.operation == "init" && e.message == "hello"));

    assert_eq!(log.integrity_check().expect("check"), "ok");
}

/// Take the `scans` table away behind the log's back, run `f`, put it back.
fn with_scans_table_hidden<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let other = rusqlite::Connection::open(path).expect("second connection");
    other
        .execute_batch("ALTER TABLE scans RENAME TO scans_hidden;")
        .expect("hide scans");
    let out = f();
    other
        .execute_batch("ALTER TABLE scans_hidden RENAME TO scans;")
        .expect("restore scans");
    out
}

#[test]
fn test_storage_failure_reaches_the_caller() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.sqlite");
    let log = EventLog::open(&path).expect("open");
    log.record_scan("S", "Sam").expect("healthy scan");

    let (append, record, unsynced) = with_scans_table_hidden(&path, || {
        (
            log.append("S", "Sam", Direction::Out),
            log.record_scan("S", "Sam"),
            log.unsynced_records(),
        )
    });

    assert!(matches!(append, Err(AppError::Storage(_))), "append: {append:?}");
    assert!(matches!(record, Err(AppError::Storage(_))), "record_scan: {record:?}");
    assert!(matches!(unsynced, Err(AppError::Storage(_))), "unsynced: {unsynced:?}");

    // nothing half-written; the log works again once storage is back
    let next = log.record_scan("S", "Sam").expect("scan after recovery");
    assert_eq!(next.direction, Direction::Out);
    assert_eq!(log.stats().expect("stats").total, 2);
}
