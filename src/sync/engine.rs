//! Periodic sync worker.
//!
//! One background thread runs [`SyncEngine::tick`] at a fixed interval.
//! A tick never overlaps another one: if a tick is still running when the
//! next one is due (e.g. a manual `tick()` racing the worker), the late one
//! is skipped, not queued.

use crate::core::event_log::EventLog;
use crate::sync::error::SyncError;
use crate::sync::remote::{RemoteDocument, RemoteStore};
use crate::sync::state::SyncState;
use crate::sync::status::StatusReporter;
use chrono::Local;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
/// Longest accepted interval; longer configured values are clamped to it.
pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another tick was in flight.
    Skipped,
    /// Not configured or the connection attempt failed.
    Offline,
    /// Connected, nothing to send.
    Idle,
    /// This many records were delivered and marked synced.
    Pushed(usize),
    /// The push (or local bookkeeping) failed; nothing was marked.
    Failed,
}

/// State owned by whoever holds the tick lock.
#[derive(Debug, Default)]
struct TickState {
    connected: bool,
}

struct Shared<R: RemoteStore> {
    log: Arc<EventLog>,
    remote: Option<R>,
    interval: Duration,
    tick_state: Mutex<TickState>,
    status: StatusReporter,
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

pub struct SyncEngine<R: RemoteStore + 'static> {
    shared: Arc<Shared<R>>,
    worker: Mutex<Option<Worker>>,
}

impl<R: RemoteStore + 'static> SyncEngine<R> {
    /// `remote = None` means no usable configuration: the engine runs but
    /// stays `Disconnected`.
    pub fn new(log: Arc<EventLog>, remote: Option<R>, interval: Duration) -> Self {
        let status = StatusReporter::new();
        if remote.is_none() {
            status.update(|s| s.last_error = Some(SyncError::NotConfigured.to_string()));
        }

        Self {
            shared: Arc::new(Shared {
                log,
                remote,
                interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
                tick_state: Mutex::new(TickState::default()),
                status,
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Spawn the background loop. Calling it while already running does nothing.
    pub fn start(&self) -> std::io::Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            debug!("sync engine already running");
            return Ok(());
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("sync-engine".to_string())
            .spawn(move || run_loop(&shared, &stop_rx))?;

        *worker = Some(Worker { stop_tx, handle });
        Ok(())
    }

    /// Signal the loop to exit and wait for it. An in-flight tick runs to
    /// completion before this returns; no tick starts afterwards.
    pub fn stop(&self) {
        let worker = self.worker.lock().take();
        let Some(worker) = worker else {
            return;
        };

        // a closed channel is a stop signal too
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            error!("sync worker panicked");
        }
        info!("sync engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Run one sync cycle on the calling thread.
    pub fn tick(&self) -> TickOutcome {
        self.shared.tick()
    }

    /// Current state, readable while a tick is running.
    pub fn status(&self) -> SyncState {
        self.shared.status.status()
    }

    /// Handle for callers that only need to display the status.
    pub fn reporter(&self) -> StatusReporter {
        self.shared.status.clone()
    }
}

impl<R: RemoteStore + 'static> Drop for SyncEngine<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop<R: RemoteStore>(shared: &Shared<R>, stop_rx: &Receiver<()>) {
    info!(interval_ms = shared.interval.as_millis() as u64, "sync loop started");

    loop {
        let started = Instant::now();
        shared.tick();

        // stay on the fixed grid: intervals missed by a slow tick are dropped
        let overrun_ns = started.elapsed().as_nanos() % shared.interval.as_nanos();
        let overrun = Duration::from_nanos(u64::try_from(overrun_ns).unwrap_or(0));
        let wait = shared.interval.saturating_sub(overrun);

        match stop_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

impl<R: RemoteStore> Shared<R> {
    fn set_state(&self, state: SyncState) {
        debug!(%state, "sync state");
        self.status.update(|s| s.state = state);
    }

    fn finish_cycle(&self) {
        self.status.update(|s| s.cycles += 1);
    }

    fn record_failure(&self, err: &SyncError) {
        let state = if err.is_connectivity() {
            SyncState::Disconnected
        } else {
            SyncState::Error(err.to_string())
        };
        debug!(%state, "sync state");
        self.status.update(|s| {
            s.state = state;
            s.last_error = Some(err.to_string());
            s.cycles += 1;
        });
    }

    fn tick(&self) -> TickOutcome {
        let Some(mut tick) = self.tick_state.try_lock() else {
            debug!("previous sync tick still running, skipping");
            return TickOutcome::Skipped;
        };

        let Some(remote) = &self.remote else {
            self.record_failure(&SyncError::NotConfigured);
            return TickOutcome::Offline;
        };

        // 1. Connect if needed (once per tick, never retried inside it)
        if !tick.connected {
            if let Err(e) = remote.connect() {
                debug!(error = %e, "remote store unreachable");
                self.record_failure(&e);
                return TickOutcome::Offline;
            }
            tick.connected = true;
            info!(remote = %remote.describe(), "connected to remote store");
            self.set_state(SyncState::Connected);
        }

        // 2. Snapshot the unsynced records
        let batch = match self.log.unsynced_records() {
            Ok(batch) => batch,
            Err(e) => {
                error!(error = %e, "cannot read unsynced records");
                self.record_failure(&SyncError::Storage(e));
                return TickOutcome::Failed;
            }
        };

        if batch.is_empty() {
            self.set_state(SyncState::Idle);
            self.finish_cycle();
            return TickOutcome::Idle;
        }

        // 3. Push the whole batch in one write
        let count = batch.len();
        self.set_state(SyncState::Syncing { pending: count });
        let documents: Vec<RemoteDocument> = batch.iter().map(RemoteDocument::from).collect();

        if let Err(e) = remote.insert_many(&documents) {
            // nothing is marked: the same records go out again next tick
            tick.connected = false;
            warn!(error = %e, records = count, "sync batch failed");
            if !e.is_connectivity()
                && let Err(audit_err) = self.log.audit("sync_failed", &format!("{count} records"), &e.to_string())
            {
                warn!(error = %audit_err, "cannot write audit entry");
            }
            self.record_failure(&e);
            return TickOutcome::Failed;
        }

        // 4. Mark exactly the pushed ids
        let ids: Vec<i64> = batch.iter().map(|r| r.id).collect();
        match self.log.mark_synced(&ids) {
            Ok(changed) => {
                info!(records = count, changed, "sync batch delivered");
                let first = ids.first().copied().unwrap_or_default();
                let last = ids.last().copied().unwrap_or_default();
                if let Err(e) = self.log.audit(
                    "sync",
                    &format!("{count} records"),
                    &format!("Delivered ids {first}..={last}"),
                ) {
                    warn!(error = %e, "cannot write audit entry");
                }

                self.status.update(|s| {
                    s.state = SyncState::Connected;
                    s.cycles += 1;
                    s.total_pushed += count as u64;
                    s.last_batch = Some(count);
                    s.last_success = Some(Local::now());
                    s.last_error = None;
                });
                TickOutcome::Pushed(count)
            }
            Err(e) => {
                // delivered but not marked: they will be delivered again
                error!(error = %e, records = count, "cannot mark delivered records as synced");
                self.record_failure(&SyncError::Storage(e));
                TickOutcome::Failed
            }
        }
    }
}
