use std::sync::Arc;

use bias_common::aggregator::is_aggregator;
use bias_common::normalization::normalize;
use bias_common::types::{BiasCategory, BiasDatabase, BiasRecord, ResolutionResult};
use tracing::debug;

use crate::alternatives::find_alternatives;
use crate::cache::ResolutionCache;
use crate::clock::Clock;
use crate::config::ResolverConfig;
use crate::loader::DatabaseLoader;
use crate::matcher::{match_text, match_url, MatchTier, Resolution};
use crate::source::DatabaseSource;
use crate::store::KeyValueStore;

/// Owns the database loader and the resolution cache. All lookups are total.
pub struct BiasResolver {
    config: ResolverConfig,
    loader: DatabaseLoader,
    cache: ResolutionCache,
}

impl BiasResolver {
    pub fn new(
        config: ResolverConfig,
        source: Arc<dyn DatabaseSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let loader = DatabaseLoader::new(source, store.clone(), clock.clone(), config.database_ttl());
        let cache = ResolutionCache::new(store, clock, config.cache_ttl());
        Self {
            config,
            loader,
            cache,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub async fn database(&mut self) -> Arc<BiasDatabase> {
        self.load().await
    }

    pub async fn resolve_by_url(&mut self, url: &str) -> ResolutionResult {
        self.resolve_url_detailed(url).await.result
    }

    /// Like [`resolve_by_url`](Self::resolve_by_url), also reporting which
    /// tier answered. Cache hits report [`MatchTier::Cached`].
    pub async fn resolve_url_detailed(&mut self, url: &str) -> Resolution {
        let domain = normalize(url).ok();
        // Aggregator hosts carry many publishers; never pin one to the host.
        let cache_domain = domain
            .as_deref()
            .filter(|d| !is_aggregator(d, &self.config.aggregator_hosts));

        let db = self.load().await;
        if let Some(result) = self.cache.get(url, cache_domain).await {
            return Resolution {
                result,
                tier: MatchTier::Cached,
                domain,
            };
        }

        let resolution = match_url(&db, &self.config, url);
        debug!(url, tier = ?resolution.tier, name = %resolution.result.name, "resolved url");

        // Nothing resolved against the empty stand-in table is persisted.
        let persist_domain = if resolution.tier == MatchTier::Aggregator || self.loader.is_degraded() {
            None
        } else {
            cache_domain
        };
        self.cache.put(url, persist_domain, &resolution.result).await;
        resolution
    }

    pub async fn resolve_by_text(&mut self, text: &str) -> ResolutionResult {
        self.resolve_text_detailed(text).await.result
    }

    pub async fn resolve_text_detailed(&mut self, text: &str) -> Resolution {
        let db = self.load().await;
        if let Some(result) = self.cache.get_text(text) {
            return Resolution {
                result,
                tier: MatchTier::Cached,
                domain: None,
            };
        }

        let resolution = match_text(&db, &self.config, text);
        debug!(tier = ?resolution.tier, name = %resolution.result.name, "resolved source text");
        self.cache.put_text(text, &resolution.result);
        resolution
    }

    /// Load the database and point the cache at its revision.
    async fn load(&mut self) -> Arc<BiasDatabase> {
        let db = self.loader.load().await;
        self.cache.set_revision(self.loader.revision());
        db
    }

    /// Comparator sources from every other spectrum category.
    pub async fn alternatives(&mut self, exclude: BiasCategory) -> Vec<BiasRecord> {
        let db = self.load().await;
        find_alternatives(&db, exclude)
    }

    /// Re-fetch the database and drop in-memory resolutions made against the
    /// old one. Returns the new record count.
    pub async fn refresh(&mut self) -> usize {
        let db = self.loader.refresh().await;
        self.cache.clear_memory();
        self.cache.set_revision(self.loader.revision());
        db.len()
    }

    /// Forget the loaded database and the in-memory cache tier.
    pub fn reset(&mut self) {
        self.loader.reset();
        self.cache.clear_memory();
    }

    /// Clear both cache tiers for entries this resolver wrote.
    pub async fn clear_cache(&mut self) {
        self.cache.clear().await;
    }
}
