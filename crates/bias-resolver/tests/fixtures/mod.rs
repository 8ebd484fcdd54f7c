use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bias_common::bundle::decode_database;
use bias_resolver::clock::ManualClock;
use bias_resolver::error::{ResolveError, Result};
use bias_resolver::source::DatabaseSource;
use bias_resolver::store::{KeyValueStore, MemoryStore};
use bias_resolver::{BiasDatabase, BiasResolver, ResolverConfig};

/// Arbitrary fixed start time (epoch ms).
#[allow(dead_code)]
pub const T0: u64 = 1_700_000_000_000;

#[allow(dead_code)]
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Test database. `foxnews.com` deliberately disagrees with the built-in
/// special case so tier precedence is observable.
#[allow(dead_code)]
pub const SAMPLE_JSON: &str = r#"{
  "mediaBiasData": {
    "bbc.co.uk": { "name": "BBC", "bias": "center", "reliability": "high" },
    "breitbart.com": { "name": "Breitbart", "bias": "right", "reliability": "low" },
    "dailywire.com": { "name": "Daily Wire", "bias": "right", "reliability": "medium" },
    "example.org": { "name": "Example", "bias": "unrated", "reliability": "unrated" },
    "foxnews.com": { "name": "Fox News Channel", "bias": "right", "reliability": "low" },
    "huffpost.com": { "name": "HuffPost", "bias": "left", "reliability": "medium" },
    "motherjones.com": { "name": "Mother Jones", "bias": "left", "reliability": "high" },
    "nationalreview.com": { "name": "National Review", "bias": "lean-right", "reliability": "medium" },
    "npr.org": { "name": "NPR", "bias": "center", "reliability": "medium" },
    "nytimes.com": { "name": "New York Times", "bias": "lean-left", "reliability": "high" },
    "reuters.com": { "name": "Reuters", "bias": "center", "reliability": "high" },
    "theguardian.com": { "name": "The Guardian", "bias": "lean-left", "reliability": "medium" },
    "wsj.com": { "name": "Wall Street Journal", "bias": "lean-right", "reliability": "high" }
  }
}"#;

#[allow(dead_code)]
pub const SAMPLE_LEN: usize = 13;

#[allow(dead_code)]
pub fn sample_db() -> BiasDatabase {
    decode_database(SAMPLE_JSON.as_bytes()).unwrap()
}

/// Serves fixed bytes and counts how often it was asked.
#[derive(Debug, Default)]
pub struct CountingSource {
    bytes: Vec<u8>,
    fetches: AtomicUsize,
}

#[allow(dead_code)]
impl CountingSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            bytes: bytes.into(),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn sample() -> Arc<Self> {
        Self::new(SAMPLE_JSON.as_bytes())
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseSource for CountingSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// Always fails, counting attempts.
#[derive(Debug, Default)]
pub struct FailingSource {
    fetches: AtomicUsize,
}

#[allow(dead_code)]
impl FailingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseSource for FailingSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Err(ResolveError::DatabaseUnavailable("source offline".to_string()))
    }
}

/// A store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _keys: &[&str]) -> Result<HashMap<String, Vec<u8>>> {
        Err(ResolveError::CacheUnavailable("store offline".to_string()))
    }

    async fn set(&self, _entries: HashMap<String, Vec<u8>>) -> Result<()> {
        Err(ResolveError::CacheUnavailable("store offline".to_string()))
    }

    async fn remove(&self, _keys: &[&str]) -> Result<()> {
        Err(ResolveError::CacheUnavailable("store offline".to_string()))
    }
}

#[allow(dead_code)]
pub fn resolver_with(
    store: Arc<dyn KeyValueStore>,
    source: Arc<dyn DatabaseSource>,
    clock: &ManualClock,
) -> BiasResolver {
    BiasResolver::new(ResolverConfig::default(), source, store, Arc::new(clock.clone()))
}

/// Resolver over the sample database, a fresh memory store and a manual clock.
#[allow(dead_code)]
pub struct Harness {
    pub resolver: BiasResolver,
    pub store: Arc<MemoryStore>,
    pub source: Arc<CountingSource>,
    pub clock: ManualClock,
}

#[allow(dead_code)]
pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let source = CountingSource::sample();
    let clock = ManualClock::new(T0);
    let resolver = resolver_with(store.clone(), source.clone(), &clock);
    Harness {
        resolver,
        store,
        source,
        clock,
    }
}

/// Read one raw value from a store.
#[allow(dead_code)]
pub async fn stored(store: &MemoryStore, key: &str) -> Option<Vec<u8>> {
    store.get(&[key]).await.unwrap().remove(key)
}
