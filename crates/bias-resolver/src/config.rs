use std::time::Duration;

use bias_common::aggregator::{DEFAULT_AGGREGATOR_HOSTS, DEFAULT_PATH_MARKERS};
use bias_common::normalization::{DEFAULT_COMPOUND_SUFFIXES, DEFAULT_TLD_EQUIVALENTS};
use serde::{Deserialize, Serialize};

/// Tunables for loading, caching and matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How long a loaded bias database stays fresh.
    pub database_ttl_secs: u64,
    /// How long a persisted per-domain resolution stays valid.
    pub cache_ttl_secs: u64,
    /// Shortest database key the containment heuristic will consider.
    pub min_containment_len: usize,
    /// Two-label suffixes that make `main_part` keep three labels.
    pub compound_suffixes: Vec<String>,
    /// `(primary, alternate)` TLD pairs tried as variants.
    pub tld_equivalents: Vec<(String, String)>,
    /// Hosts whose links carry the real publisher in a parameter or path.
    pub aggregator_hosts: Vec<String>,
    /// Path segments that precede a publisher token on aggregator links.
    pub aggregator_markers: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            database_ttl_secs: 24 * 60 * 60,
            cache_ttl_secs: 7 * 24 * 60 * 60,
            min_containment_len: 5,
            compound_suffixes: DEFAULT_COMPOUND_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            tld_equivalents: DEFAULT_TLD_EQUIVALENTS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            aggregator_hosts: DEFAULT_AGGREGATOR_HOSTS.iter().map(|s| s.to_string()).collect(),
            aggregator_markers: DEFAULT_PATH_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolverConfig {
    pub fn database_ttl(&self) -> Duration {
        Duration::from_secs(self.database_ttl_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Collect every problem at once instead of failing on the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.database_ttl_secs == 0 {
            errors.push("database_ttl_secs must be positive".to_string());
        }
        if self.cache_ttl_secs == 0 {
            errors.push("cache_ttl_secs must be positive".to_string());
        }
        if self.min_containment_len == 0 {
            errors.push("min_containment_len must be positive".to_string());
        }
        for suffix in &self.compound_suffixes {
            if suffix.split('.').count() != 2 {
                errors.push(format!("compound suffix {:?} must have exactly two labels", suffix));
            }
        }
        for (primary, alternate) in &self.tld_equivalents {
            if !primary.starts_with('.') || !alternate.starts_with('.') {
                errors.push(format!(
                    "tld equivalent ({:?}, {:?}) must start with '.'",
                    primary, alternate
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
