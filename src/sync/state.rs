//! Sync engine states.

use std::fmt;

/// Current state of the sync engine.
///
/// `Disconnected` is the initial state. Any failure to reach the remote
/// store goes back to it and the next tick tries to connect again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Never connected, no configuration, or the last remote call failed to connect.
    Disconnected,
    /// Connected; the last batch (if any) was accepted.
    Connected,
    /// Pushing a batch of this many records.
    Syncing { pending: usize },
    /// Connected and nothing left to send.
    Idle,
    /// The last cycle failed for a reason other than connectivity.
    Error(String),
}

impl SyncState {
    /// Returns true when the engine believes it holds a live connection.
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            SyncState::Connected | SyncState::Syncing { .. } | SyncState::Idle
        )
    }

    /// Short label without details.
    pub fn label(&self) -> &'static str {
        match self {
            SyncState::Disconnected => "Disconnected",
            SyncState::Connected => "Connected",
            SyncState::Syncing { .. } => "Syncing",
            SyncState::Idle => "Idle",
            SyncState::Error(_) => "Error",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Syncing { pending } => write!(f, "Syncing ({pending} records)"),
            SyncState::Error(detail) => write!(f, "Error: {detail}"),
            other => f.write_str(other.label()),
        }
    }
}
