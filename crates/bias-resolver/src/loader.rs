//! Loads the bias database with a freshness window.
//!
//! Lookup order is the in-process table, then the persisted snapshot, then the
//! [`DatabaseSource`]. A freshly fetched table is written back as a snapshot so
//! the next process can skip the fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bias_common::bundle::decode_database;
use bias_common::hashing::database_revision;
use bias_common::types::BiasDatabase;
use tracing::{debug, info, warn};

use crate::clock::{is_expired, Clock};
use crate::error::Result;
use crate::source::DatabaseSource;
use crate::store::{cbor_decode, cbor_encode, KeyValueStore};

pub const DATABASE_KEY: &str = "biasDatabase";
pub const LAST_UPDATED_KEY: &str = "lastUpdated";

struct Loaded {
    db: Arc<BiasDatabase>,
    loaded_at: u64,
    revision: String,
    /// Stand-in empty table after a failed fetch.
    degraded: bool,
}

pub struct DatabaseLoader {
    source: Arc<dyn DatabaseSource>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    current: Option<Loaded>,
}

impl DatabaseLoader {
    pub fn new(
        source: Arc<dyn DatabaseSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            ttl,
            current: None,
        }
    }

    /// The database, loading it if the in-process copy is missing or stale.
    /// Never fails: an unavailable source yields an empty table.
    pub async fn load(&mut self) -> Arc<BiasDatabase> {
        let now = self.clock.now_ms();
        if let Some(loaded) = &self.current {
            if !is_expired(now, loaded.loaded_at, self.ttl) {
                return loaded.db.clone();
            }
        }

        if let Some((db, saved_at)) = self.read_snapshot().await {
            if !is_expired(now, saved_at, self.ttl) {
                debug!(records = db.len(), "using persisted bias database");
                return self.install(db, saved_at, false);
            }
        }

        self.fetch(now).await
    }

    /// Re-fetch from the source regardless of age.
    pub async fn refresh(&mut self) -> Arc<BiasDatabase> {
        let now = self.clock.now_ms();
        self.fetch(now).await
    }

    /// Forget the in-process table. The persisted snapshot is kept.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// The in-process table, if one is loaded, without checking freshness.
    pub fn current(&self) -> Option<Arc<BiasDatabase>> {
        self.current.as_ref().map(|loaded| loaded.db.clone())
    }

    /// Content digest of the in-process table, empty when none is loaded.
    pub fn revision(&self) -> &str {
        self.current.as_ref().map_or("", |loaded| loaded.revision.as_str())
    }

    /// Whether the in-process table is the empty stand-in for an unavailable
    /// source.
    pub fn is_degraded(&self) -> bool {
        self.current.as_ref().is_some_and(|loaded| loaded.degraded)
    }

    async fn fetch(&mut self, now: u64) -> Arc<BiasDatabase> {
        match self.fetch_and_decode().await {
            Ok(db) => {
                info!(records = db.len(), "bias database loaded");
                self.write_snapshot(&db, now).await;
                self.install(db, now, false)
            }
            Err(e) => {
                // Held for the whole window so a broken source is not retried
                // on every lookup.
                warn!(error = %e, "bias database unavailable, using an empty table");
                self.install(BiasDatabase::empty(), now, true)
            }
        }
    }

    async fn fetch_and_decode(&self) -> Result<BiasDatabase> {
        let bytes = self.source.fetch().await?;
        Ok(decode_database(&bytes)?)
    }

    fn install(&mut self, db: BiasDatabase, loaded_at: u64, degraded: bool) -> Arc<BiasDatabase> {
        let revision = database_revision(&db);
        let db = Arc::new(db);
        self.current = Some(Loaded {
            db: db.clone(),
            loaded_at,
            revision,
            degraded,
        });
        db
    }

    async fn read_snapshot(&self) -> Option<(BiasDatabase, u64)> {
        let mut found = match self.store.get(&[DATABASE_KEY, LAST_UPDATED_KEY]).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "could not read persisted bias database");
                return None;
            }
        };
        let db_bytes = found.remove(DATABASE_KEY)?;
        let ts_bytes = found.remove(LAST_UPDATED_KEY)?;

        let decoded = cbor_decode::<BiasDatabase>(&db_bytes)
            .and_then(|db| cbor_decode::<u64>(&ts_bytes).map(|ts| (db, ts)));
        match decoded {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!(error = %e, "ignoring undecodable bias database snapshot");
                None
            }
        }
    }

    async fn write_snapshot(&self, db: &BiasDatabase, now: u64) {
        let encoded = cbor_encode(db).and_then(|db| cbor_encode(&now).map(|ts| (db, ts)));
        let (db_bytes, ts_bytes) = match encoded {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "could not encode bias database snapshot");
                return;
            }
        };
        let mut entries = HashMap::new();
        entries.insert(DATABASE_KEY.to_string(), db_bytes);
        entries.insert(LAST_UPDATED_KEY.to_string(), ts_bytes);
        if let Err(e) = self.store.set(entries).await {
            warn!(error = %e, "could not persist bias database snapshot");
        }
    }
}
