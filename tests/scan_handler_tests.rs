use rattendance::core::debounce::{DEFAULT_DEBOUNCE, Debouncer};
use rattendance::core::event_log::EventLog;
use rattendance::core::scan::{ScanHandler, ScanOutcome, UNKNOWN_EMPLOYEE};
use rattendance::errors::AppError;
use rattendance::models::direction::Direction;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn handler(window: Duration) -> (Arc<EventLog>, ScanHandler<BTreeMap<String, String>>) {
    let log = Arc::new(EventLog::open_in_memory().expect("open log"));
    let mut names = BTreeMap::new();
    names.insert("1001".to_string(), "Mario Rossi".to_string());
    let handler = ScanHandler::new(Arc::clone(&log), names, Debouncer::new(window));
    (log, handler)
}

#[test]
fn test_known_badge_gets_its_name() {
    let (_log, mut h) = handler(Duration::ZERO);

    match h.handle("1001").expect("scan") {
        ScanOutcome::Recorded(rec) => {
            assert_eq!(rec.display_name, "Mario Rossi");
            assert_eq!(rec.direction, Direction::In);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unknown_badge_is_still_recorded() {
    let (log, mut h) = handler(Duration::ZERO);

    let ScanOutcome::Recorded(rec) = h.handle("  4242 \n").expect("scan") else {
        panic!("scan should be recorded");
    };
    assert_eq!(rec.badge_id, "4242");
    assert_eq!(rec.display_name, UNKNOWN_EMPLOYEE);
    assert_eq!(log.unsynced_records().unwrap().len(), 1);
}

#[test]
fn test_empty_badge_is_rejected() {
    let (log, mut h) = handler(Duration::ZERO);

    assert!(matches!(h.handle("   "), Err(AppError::InvalidBadge(_))));
    assert!(log.unsynced_records().unwrap().is_empty());
}

#[test]
fn test_repeated_scan_inside_window_is_ignored() {
    let (log, mut h) = handler(Duration::from_secs(5));
    let t0 = Instant::now();

    assert!(matches!(h.handle_at("1001", t0).unwrap(), ScanOutcome::Recorded(_)));

    match h.handle_at("1001", t0 + Duration::from_secs(2)).unwrap() {
        ScanOutcome::Cooldown { badge_id, remaining } => {
            assert_eq!(badge_id, "1001");
            assert_eq!(remaining, Duration::from_secs(3));
        }
        other => panic!("unexpected {other:?}"),
    }

    // other badges are not affected
    assert!(matches!(h.handle_at("2002", t0 + Duration::from_secs(2)).unwrap(), ScanOutcome::Recorded(_)));

    // window counts from the accepted scan, not the rejected one
    let ScanOutcome::Recorded(rec) = h.handle_at("1001", t0 + Duration::from_secs(5)).unwrap() else {
        panic!("scan after the window should be recorded");
    };
    assert_eq!(rec.direction, Direction::Out);
    assert_eq!(log.unsynced_records().unwrap().len(), 3);
}

#[test]
fn test_debouncer_defaults() {
    let mut d = Debouncer::default();
    assert_eq!(d.window(), DEFAULT_DEBOUNCE);

    let t0 = Instant::now();
    assert!(d.check_at("a", t0).is_ok());
    assert!(d.check_at("a", t0 + Duration::from_secs(1)).is_err());
    assert!(d.check_at("a", t0 + DEFAULT_DEBOUNCE).is_ok());
}

#[test]
fn test_failed_write_does_not_start_cooldown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scans.sqlite");
    let log = Arc::new(EventLog::open(&path).expect("open"));
    let mut h = ScanHandler::new(
        Arc::clone(&log),
        BTreeMap::new(),
        Debouncer::new(Duration::from_secs(5)),
    );
    let t0 = Instant::now();

    let other = rusqlite::Connection::open(&path).expect("second connection");
    other
        .execute_batch("ALTER TABLE scans RENAME TO scans_hidden;")
        .expect("hide scans");
    assert!(matches!(h.handle_at("1001", t0), Err(AppError::Storage(_))));
    other
        .execute_batch("ALTER TABLE scans_hidden RENAME TO scans;")
        .expect("restore scans");

    // retry inside the window is recorded, not treated as a repeat
    let retry = h.handle_at("1001", t0 + Duration::from_secs(1)).expect("retry");
    assert!(matches!(retry, ScanOutcome::Recorded(_)), "got {retry:?}");

    // and that accepted scan now starts the window
    assert!(matches!(
        h.handle_at("1001", t0 + Duration::from_secs(2)).unwrap(),
        ScanOutcome::Cooldown { .. }
    ));
}

#[test]
fn test_cooldown_query_does_not_change_state() {
    let mut d = Debouncer::new(Duration::from_secs(5));
    let t0 = Instant::now();

    assert_eq!(d.cooldown_at("a", t0), None);
    assert_eq!(d.cooldown_at("a", t0), None);

    d.accept_at("a", t0);
    assert_eq!(d.cooldown_at("a", t0 + Duration::from_secs(4)), Some(Duration::from_secs(1)));
    assert_eq!(d.cooldown_at("a", t0 + Duration::from_secs(5)), None);
}
