//! Background reconciliation of the local scan log with a remote store.
//!
//! - [`engine`] - periodic worker and its tick state machine
//! - [`remote`] - remote store abstraction and the document shape sent to it
//! - [`mongo`] - MongoDB implementation of the remote store
//! - [`status`] - read-only view of the engine state for dashboards
//! - [`state`] - sync states
//! - [`error`] - remote-side error taxonomy

pub mod engine;
pub mod error;
pub mod mongo;
pub mod remote;
pub mod state;
pub mod status;

pub use engine::{SyncEngine, TickOutcome};
pub use error::{SyncError, SyncResult};
pub use mongo::MongoRemoteStore;
pub use remote::{RemoteDocument, RemoteStore};
pub use state::SyncState;
pub use status::{StatusReporter, SyncStatus};
