//! MongoDB remote store.
//!
//! The client is built on the first `connect`, not in the constructor:
//! resolving a `mongodb+srv://` string needs DNS, and an instance that starts
//! offline must still be able to connect later.

use crate::config::RemoteConfig;
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::remote::{RemoteDocument, RemoteStore};
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::sync::{Client, Collection, Database};
use parking_lot::Mutex;
use std::time::Duration;
use tracing::debug;

const APP_NAME: &str = "rattendance";

#[derive(Clone)]
struct Handles {
    db: Database,
    coll: Collection<RemoteDocument>,
}

pub struct MongoRemoteStore {
    config: RemoteConfig,
    handles: Mutex<Option<Handles>>,
}

impl MongoRemoteStore {
    /// Wrap a validated remote configuration. No network access happens here.
    pub fn new(cfg: &RemoteConfig) -> SyncResult<Self> {
        cfg.validate().map_err(|_| SyncError::NotConfigured)?;
        Ok(Self {
            config: cfg.clone(),
            handles: Mutex::new(None),
        })
    }

    /// `Some(store)` when the configuration is present and usable.
    pub fn from_config(cfg: Option<&RemoteConfig>) -> Option<Self> {
        cfg.and_then(|c| Self::new(c).ok())
    }

    fn build(&self) -> SyncResult<Handles> {
        let mut options = ClientOptions::parse(self.config.uri.trim())
            .run()
            .map_err(|e| classify("parse uri", &e))?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout =
            Some(Duration::from_secs(self.config.server_selection_timeout_secs.max(1)));
        options.connect_timeout = Some(Duration::from_secs(self.config.connect_timeout_secs.max(1)));

        let client = Client::with_options(options).map_err(|e| classify("client", &e))?;
        let db = client.database(&self.config.database);
        let coll = db.collection(&self.config.collection);
        Ok(Handles { db, coll })
    }

    /// Cached handles, building the client if needed.
    fn handles(&self) -> SyncResult<Handles> {
        let mut slot = self.handles.lock();
        if let Some(handles) = slot.as_ref() {
            return Ok(handles.clone());
        }
        let handles = self.build()?;
        *slot = Some(handles.clone());
        Ok(handles)
    }
}

/// Unreachable / unauthenticated is connectivity; anything the server
/// rejected after a round trip is a write failure.
fn classify(action: &str, err: &MongoError) -> SyncError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::Authentication { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::InvalidArgument { .. } => SyncError::Connectivity(format!("{action}: {err}")),
        _ => SyncError::RemoteWrite(format!("{action}: {err}")),
    }
}

impl RemoteStore for MongoRemoteStore {
    fn connect(&self) -> SyncResult<()> {
        let handles = self.handles()?;
        debug!(namespace = %self.config.target(), "pinging remote store");
        handles
            .db
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| classify("ping", &e))?;
        Ok(())
    }

    fn insert_many(&self, documents: &[RemoteDocument]) -> SyncResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let result = self
            .handles()?
            .coll
            .insert_many(documents)
            .run()
            .map_err(|e| classify("insert_many", &e))?;

        // all-or-nothing: a short acknowledgement counts as a failed batch
        if result.inserted_ids.len() != documents.len() {
            return Err(SyncError::RemoteWrite(format!(
                "insert_many: acknowledged {} of {} documents",
                result.inserted_ids.len(),
                documents.len()
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("mongodb {}", self.config.target())
    }
}
