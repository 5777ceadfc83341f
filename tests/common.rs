#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use parking_lot::{Condvar, Mutex};
use rattendance::sync::{RemoteDocument, RemoteStore, SyncError, SyncResult};
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub fn rat() -> Command {
    let mut cmd = cargo_bin_cmd!("rattendance");
    // keep the developer's environment out of the tests
    cmd.env_remove("RATTENDANCE_REMOTE_URI")
        .env_remove("MONGODB_URI")
        .env_remove("RATTENDANCE_REMOTE_DB")
        .env_remove("RATTENDANCE_REMOTE_COLLECTION")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", env::temp_dir().join("rattendance_test_config"));
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}-wal")).ok();
    fs::remove_file(format!("{db_path}-shm")).ok();
    db_path
}

/// What the next remote call should do.
#[derive(Debug, Clone)]
pub enum Script {
    Accept,
    Unreachable,
    Reject,
}

/// In-memory remote store with scripted failures. Unscripted calls succeed.
#[derive(Default)]
pub struct MockRemote {
    connect_script: Mutex<VecDeque<Script>>,
    insert_script: Mutex<VecDeque<Script>>,
    pub stored: Mutex<Vec<RemoteDocument>>,
    pub connects: AtomicUsize,
    pub inserts: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_connect(&self, steps: &[Script]) {
        self.connect_script.lock().extend(steps.iter().cloned());
    }

    pub fn script_insert(&self, steps: &[Script]) {
        self.insert_script.lock().extend(steps.iter().cloned());
    }

    pub fn stored_ids(&self) -> Vec<i64> {
        self.stored.lock().iter().map(|d| d.local_id).collect()
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

impl RemoteStore for MockRemote {
    fn connect(&self) -> SyncResult<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match self.connect_script.lock().pop_front() {
            Some(Script::Unreachable) => Err(SyncError::Connectivity("mock offline".into())),
            Some(Script::Reject) => Err(SyncError::RemoteWrite("mock rejected".into())),
            Some(Script::Accept) | None => Ok(()),
        }
    }

    fn insert_many(&self, documents: &[RemoteDocument]) -> SyncResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        match self.insert_script.lock().pop_front() {
            Some(Script::Unreachable) => Err(SyncError::Connectivity("mock offline".into())),
            Some(Script::Reject) => Err(SyncError::RemoteWrite("mock rejected".into())),
            Some(Script::Accept) | None => {
                self.stored.lock().extend_from_slice(documents);
                Ok(())
            }
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Remote whose `insert_many` blocks until `release` is called.
#[derive(Default)]
pub struct GatedRemote {
    entered: Mutex<bool>,
    entered_cv: Condvar,
    open: Mutex<bool>,
    open_cv: Condvar,
    pub inserts: AtomicUsize,
}

impl GatedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until an insert is in flight. False on timeout.
    pub fn wait_entered(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut entered = self.entered.lock();
        while !*entered {
            if self.entered_cv.wait_until(&mut entered, deadline).timed_out() {
                break;
            }
        }
        *entered
    }

    pub fn release(&self) {
        *self.open.lock() = true;
        self.open_cv.notify_all();
    }
}

impl RemoteStore for GatedRemote {
    fn connect(&self) -> SyncResult<()> {
        Ok(())
    }

    fn insert_many(&self, _documents: &[RemoteDocument]) -> SyncResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        {
            *self.entered.lock() = true;
            self.entered_cv.notify_all();
        }
        let mut open = self.open.lock();
        while !*open {
            self.open_cv.wait(&mut open);
        }
        Ok(())
    }
}
