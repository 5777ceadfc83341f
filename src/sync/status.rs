//! Read-only view of the sync engine for dashboards and commands.

use crate::sync::state::SyncState;
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::sync::Arc;

/// Snapshot of the engine's state and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub state: SyncState,
    /// Completed ticks (skipped ticks are not counted).
    pub cycles: u64,
    /// Records delivered since the engine was created.
    pub total_pushed: u64,
    pub last_batch: Option<usize>,
    pub last_success: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            state: SyncState::Disconnected,
            cycles: 0,
            total_pushed: 0,
            last_batch: None,
            last_success: None,
            last_error: None,
        }
    }
}

/// Cheap, cloneable handle onto the engine's status.
#[derive(Debug, Clone, Default)]
pub struct StatusReporter {
    inner: Arc<RwLock<SyncStatus>>,
}

impl StatusReporter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn status(&self) -> SyncState {
        self.inner.read().state.clone()
    }

    pub fn snapshot(&self) -> SyncStatus {
        self.inner.read().clone()
    }

    /// One-line description for a status bar.
    pub fn line(&self) -> String {
        let s = self.inner.read();
        match (&s.state, s.last_batch, &s.last_error) {
            (SyncState::Disconnected, _, Some(err)) => format!("Disconnected ({err})"),
            (SyncState::Connected, Some(n), _) => format!("Connected (last batch: {n} records)"),
            (state, _, _) => state.to_string(),
        }
    }

    pub(crate) fn update<F: FnOnce(&mut SyncStatus)>(&self, f: F) {
        f(&mut self.inner.write());
    }
}
