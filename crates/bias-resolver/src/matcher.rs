//! Layered matching of URLs and citation text against a [`BiasDatabase`].
//!
//! Pure functions: no I/O, no caching. Each entry point walks its tiers in a
//! fixed order and stops at the first hit; when every tier misses the result
//! is an `unknown` record named after the best fragment available.

use bias_common::aggregator;
use bias_common::normalization::{
    canonical_key, domain_stem, fold_text, main_part, normalize, strip_www, variants,
};
use bias_common::types::{BiasDatabase, BiasRecord, ResolutionResult};

use crate::config::ResolverConfig;
use crate::special_cases;

/// Which tier produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// Served by the resolution cache.
    Cached,
    Exact,
    WwwStripped,
    Aggregator,
    Containment,
    Subdomain,
    Variant,
    SpecialCase,
    TextName,
    TextStem,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub result: ResolutionResult,
    pub tier: MatchTier,
    /// Canonical domain of the input, when it parsed.
    pub domain: Option<String>,
}

impl Resolution {
    fn hit(record: &BiasRecord, tier: MatchTier, domain: Option<String>) -> Self {
        Self {
            result: record.clone(),
            tier,
            domain,
        }
    }
}

/// Resolve a link URL.
pub fn match_url(db: &BiasDatabase, config: &ResolverConfig, url: &str) -> Resolution {
    if let Some(hint) =
        aggregator::extract_hint(url, &config.aggregator_hosts, &config.aggregator_markers)
    {
        if let Some(record) = match_token(db, config, &hint.token) {
            return Resolution::hit(record, MatchTier::Aggregator, Some(hint.host));
        }
    }

    let domain = match normalize(url) {
        Ok(d) => d,
        Err(_) => {
            return Resolution {
                result: BiasRecord::unknown(url.trim()),
                tier: MatchTier::Fallback,
                domain: None,
            }
        }
    };

    if let Some(record) = db.get(&domain) {
        return Resolution::hit(record, MatchTier::Exact, Some(domain));
    }

    let stripped = strip_www(&domain);
    if stripped != domain {
        if let Some(record) = db.get(stripped) {
            return Resolution::hit(record, MatchTier::WwwStripped, Some(domain));
        }
    }

    if let Some(record) = containment(db, config.min_containment_len, &domain) {
        return Resolution::hit(record, MatchTier::Containment, Some(domain));
    }

    let root = main_part(&domain, &config.compound_suffixes);
    if let Some(record) = db.get(&root) {
        return Resolution::hit(record, MatchTier::Subdomain, Some(domain));
    }

    for variant in variants(&domain, &config.tld_equivalents) {
        if let Some(record) = db.get(&variant) {
            return Resolution::hit(record, MatchTier::Variant, Some(domain));
        }
    }

    if let Some(record) = special_cases::match_domain(&domain) {
        return Resolution {
            result: record,
            tier: MatchTier::SpecialCase,
            domain: Some(domain),
        };
    }

    Resolution {
        result: BiasRecord::unknown(stripped),
        tier: MatchTier::Fallback,
        domain: Some(domain),
    }
}

/// Longest key (at least `min_len` bytes) that the candidate contains.
/// Ties go to the first key in sorted order.
fn containment<'a>(db: &'a BiasDatabase, min_len: usize, domain: &str) -> Option<&'a BiasRecord> {
    let mut best: Option<(&str, &BiasRecord)> = None;
    for (key, record) in db.iter() {
        if key.len() < min_len || !domain.contains(key) {
            continue;
        }
        if best.map_or(true, |(b, _)| key.len() > b.len()) {
            best = Some((key, record));
        }
    }
    best.map(|(_, record)| record)
}

/// Match an aggregator token by domain, display name, then domain stem.
fn match_token<'a>(db: &'a BiasDatabase, config: &ResolverConfig, token: &str) -> Option<&'a BiasRecord> {
    if let Some(record) = db.get(&canonical_key(token)) {
        return Some(record);
    }
    if let Some(record) = normalize(token).ok().and_then(|d| db.get(&d)) {
        return Some(record);
    }

    let spaced = fold_text(&token.replace(['-', '_', '+'], " "));
    if spaced.is_empty() {
        return None;
    }
    if let Some((_, record)) = db.iter().find(|(_, r)| fold_text(&r.name) == spaced) {
        return Some(record);
    }

    let compact: String = spaced.chars().filter(|c| !c.is_whitespace()).collect();
    db.iter()
        .find(|(key, _)| domain_stem(key, &config.compound_suffixes) == compact)
        .map(|(_, record)| record)
}

/// Resolve a citation string such as "Reporting by Reuters".
pub fn match_text(db: &BiasDatabase, config: &ResolverConfig, text: &str) -> Resolution {
    let folded = fold_text(text);
    if folded.is_empty() {
        return Resolution {
            result: BiasRecord::unknown(text.trim()),
            tier: MatchTier::Fallback,
            domain: None,
        };
    }

    if let Some(record) = special_cases::match_text(&folded) {
        return Resolution {
            result: record,
            tier: MatchTier::SpecialCase,
            domain: None,
        };
    }

    let text_is_long_enough = folded.chars().count() >= 3;
    for (_, record) in db.iter() {
        let name = fold_text(&record.name);
        if name.is_empty() {
            continue;
        }
        if folded.contains(&name) || (text_is_long_enough && name.contains(&folded)) {
            return Resolution::hit(record, MatchTier::TextName, None);
        }
    }

    for (key, record) in db.iter() {
        let stem = domain_stem(key, &config.compound_suffixes);
        if stem.len() >= 3 && folded.contains(stem) {
            return Resolution::hit(record, MatchTier::TextStem, None);
        }
    }

    Resolution {
        result: BiasRecord::unknown(text.trim()),
        tier: MatchTier::Fallback,
        domain: None,
    }
}
