//! Remote store abstraction.

use crate::models::direction::Direction;
use crate::models::scan::ScanRecord;
use crate::sync::error::SyncResult;
use chrono::SecondsFormat;
use serde::Serialize;
use std::sync::Arc;

/// Document sent to the remote store for one scan. The local id travels as
/// `localID`; the synced flag is local bookkeeping and is not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteDocument {
    #[serde(rename = "localID")]
    pub local_id: i64,
    #[serde(rename = "badgeID")]
    pub badge_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub timestamp: String,
    pub direction: Direction,
}

impl From<&ScanRecord> for RemoteDocument {
    fn from(rec: &ScanRecord) -> Self {
        Self {
            local_id: rec.id,
            badge_id: rec.badge_id.clone(),
            display_name: rec.display_name.clone(),
            timestamp: rec.timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
            direction: rec.direction,
        }
    }
}

/// A remote document store that accepts bulk inserts.
///
/// Implementations must use finite connection timeouts: the sync engine's
/// `stop()` waits for the in-flight call.
pub trait RemoteStore: Send + Sync {
    /// Establish (or verify) the connection.
    fn connect(&self) -> SyncResult<()>;

    /// Insert the whole batch. `Ok` means every document was accepted;
    /// any error means the batch is considered not delivered.
    fn insert_many(&self, documents: &[RemoteDocument]) -> SyncResult<()>;

    /// Human-readable target, for logs.
    fn describe(&self) -> String {
        "remote store".to_string()
    }
}

impl<R: RemoteStore + ?Sized> RemoteStore for Arc<R> {
    fn connect(&self) -> SyncResult<()> {
        (**self).connect()
    }

    fn insert_many(&self, documents: &[RemoteDocument]) -> SyncResult<()> {
        (**self).insert_many(documents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<R: RemoteStore + ?Sized> RemoteStore for Box<R> {
    fn connect(&self) -> SyncResult<()> {
        (**self).connect()
    }

    fn insert_many(&self, documents: &[RemoteDocument]) -> SyncResult<()> {
        (**self).insert_many(documents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
