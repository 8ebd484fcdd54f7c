//! Two-tier memo of resolutions.
//!
//! The in-memory tier is keyed by lower-cased URL (or `source:<folded text>`
//! for citation lookups) and lives as long as the cache. The persistent tier
//! is keyed `resolution:<canonical domain>` in the [`KeyValueStore`] and
//! expires lazily: stale entries are only noticed, and evicted, on read.
//! Entries carry the revision of the database they were resolved against and
//! only count as hits while that revision is current.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use bias_common::normalization::fold_text;
use bias_common::types::{CacheEntry, ResolutionResult};
use tracing::{debug, warn};

use crate::clock::{is_expired, Clock};
use crate::store::{cbor_decode, cbor_encode, KeyValueStore};

/// Persisted entries written with another version are treated as misses.
pub const CACHE_VERSION: u32 = 2;

const RESOLUTION_PREFIX: &str = "resolution:";
const TEXT_PREFIX: &str = "source:";

pub fn resolution_key(domain: &str) -> String {
    format!("{}{}", RESOLUTION_PREFIX, domain)
}

pub fn text_key(text: &str) -> String {
    format!("{}{}", TEXT_PREFIX, fold_text(text))
}

fn url_key(url: &str) -> String {
    url.trim().to_lowercase()
}

pub struct ResolutionCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    memory: HashMap<String, ResolutionResult>,
    /// Domains this cache wrote to the persistent tier, for `clear`.
    persisted: HashSet<String>,
    revision: String,
}

impl ResolutionCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            memory: HashMap::new(),
            persisted: HashSet::new(),
            revision: String::new(),
        }
    }

    /// Set the database revision entries are read and written against. A
    /// change drops the in-memory tier.
    pub fn set_revision(&mut self, revision: &str) {
        if self.revision != revision {
            debug!(revision, "database revision changed, dropping memory tier");
            self.memory.clear();
            self.revision = revision.to_string();
        }
    }

    /// Look up a URL. `domain` is the canonical domain to consult in the
    /// persistent tier; pass `None` to skip it.
    pub async fn get(&mut self, url: &str, domain: Option<&str>) -> Option<ResolutionResult> {
        let key = url_key(url);
        if let Some(hit) = self.memory.get(&key) {
            debug!(url = %key, "memory cache hit");
            return Some(hit.clone());
        }

        let domain = domain?;
        let result = self.get_persisted(domain).await?;
        self.memory.insert(key, result.clone());
        Some(result)
    }

    async fn get_persisted(&mut self, domain: &str) -> Option<ResolutionResult> {
        let key = resolution_key(domain);
        let mut found = match self.store.get(&[key.as_str()]).await {
            Ok(found) => found,
            Err(e) => {
                debug!(error = %e, domain, "persistent cache read skipped");
                return None;
            }
        };
        let bytes = found.remove(&key)?;

        let entry = match cbor_decode::<CacheEntry>(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, domain, "evicting undecodable cache entry");
                self.evict(&key).await;
                return None;
            }
        };
        if entry.version != CACHE_VERSION {
            debug!(domain, version = entry.version, "evicting cache entry from another version");
            self.evict(&key).await;
            return None;
        }
        if is_expired(self.clock.now_ms(), entry.timestamp, self.ttl) {
            debug!(domain, "evicting expired cache entry");
            self.evict(&key).await;
            return None;
        }
        // Another process may still be on the other revision; leave it be.
        if entry.revision != self.revision {
            debug!(domain, "cache entry from another database revision");
            return None;
        }

        debug!(domain, "persistent cache hit");
        Some(entry.result)
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.store.remove(&[key]).await {
            debug!(error = %e, key, "cache eviction skipped");
        }
    }

    /// Remember a URL resolution. With a `domain` the result is also
    /// persisted against it with the current time.
    pub async fn put(&mut self, url: &str, domain: Option<&str>, result: &ResolutionResult) {
        self.memory.insert(url_key(url), result.clone());

        let Some(domain) = domain else {
            return;
        };
        let entry = CacheEntry {
            result: result.clone(),
            timestamp: self.clock.now_ms(),
            version: CACHE_VERSION,
            revision: self.revision.clone(),
        };
        let bytes = match cbor_encode(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, domain, "could not encode cache entry");
                return;
            }
        };
        let mut entries = HashMap::new();
        entries.insert(resolution_key(domain), bytes);
        match self.store.set(entries).await {
            Ok(()) => {
                self.persisted.insert(domain.to_string());
            }
            Err(e) => warn!(error = %e, domain, "persistent cache write skipped"),
        }
    }

    pub fn get_text(&self, text: &str) -> Option<ResolutionResult> {
        self.memory.get(&text_key(text)).cloned()
    }

    pub fn put_text(&mut self, text: &str, result: &ResolutionResult) {
        self.memory.insert(text_key(text), result.clone());
    }

    /// Drop the in-memory tier and every persisted entry this cache wrote.
    pub async fn clear(&mut self) {
        self.memory.clear();
        if self.persisted.is_empty() {
            return;
        }
        let keys: Vec<String> = self.persisted.drain().map(|d| resolution_key(&d)).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        if let Err(e) = self.store.remove(&refs).await {
            warn!(error = %e, entries = refs.len(), "persistent cache clear skipped");
        }
    }

    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }
}
