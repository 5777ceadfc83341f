//! Error types for the sync engine.

use crate::errors::AppError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failures seen by the sync engine. None of them reach the scan path.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No usable remote configuration; the engine stays disconnected.
    #[error("remote store not configured")]
    NotConfigured,

    /// The remote store could not be reached or refused the connection.
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// The remote store was reached but rejected the write.
    #[error("remote write failed: {0}")]
    RemoteWrite(String),

    /// The local log failed while a sync cycle was running.
    #[error("local storage: {0}")]
    Storage(#[from] AppError),
}

impl SyncError {
    /// True when the failure means "not connected" rather than "connected but broken".
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SyncError::NotConfigured | SyncError::Connectivity(_))
    }
}
