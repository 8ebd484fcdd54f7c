use url::Url;

use crate::normalization::canonical_key;

/// News aggregation hosts that embed the real publisher in the link.
pub const DEFAULT_AGGREGATOR_HOSTS: &[&str] = &[
    "news.google.com",
    "news.yahoo.com",
    "news.bing.com",
    "bing.com",
    "msn.com",
    "flipboard.com",
];

/// Path markers whose following segment names the publisher.
pub const DEFAULT_PATH_MARKERS: &[&str] = &["hub", "topic", "section", "news", "tag"];

/// Publisher token pulled out of an aggregator link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorHint {
    /// Canonical aggregator host the token came from.
    pub host: String,
    /// Decoded, lower-cased, trimmed token (`reuters`, `nytimes.com`, `the new york times`).
    pub token: String,
}

/// Whether `domain` (canonical) is, or is a subdomain of, a listed aggregator.
pub fn is_aggregator<S: AsRef<str>>(domain: &str, hosts: &[S]) -> bool {
    hosts.iter().any(|h| {
        let h = h.as_ref();
        domain == h || domain.strip_suffix(h).is_some_and(|rest| rest.ends_with('.'))
    })
}

/// Extract a publisher hint from an aggregator URL.
///
/// Priority: `source` query parameter > segment after the first path marker.
/// Returns `None` for non-aggregator hosts, unparseable URLs, or when neither
/// location carries a non-empty token.
pub fn extract_hint<H, M>(url: &str, hosts: &[H], markers: &[M]) -> Option<AggregatorHint>
where
    H: AsRef<str>,
    M: AsRef<str>,
{
    let parsed = Url::parse(url.trim()).ok()?;
    let host = canonical_key(parsed.host_str()?);
    if !is_aggregator(&host, hosts) {
        return None;
    }

    if let Some(token) = source_param(&parsed) {
        return Some(AggregatorHint { host, token });
    }

    let token = marker_segment(&parsed, markers)?;
    Some(AggregatorHint { host, token })
}

fn source_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k.eq_ignore_ascii_case("source"))
        .and_then(|(_, v)| clean_token(&v))
}

fn marker_segment<M: AsRef<str>>(url: &Url, markers: &[M]) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let pos = segments
        .iter()
        .position(|seg| markers.iter().any(|m| seg.eq_ignore_ascii_case(m.as_ref())))?;
    let raw = segments.get(pos + 1)?;
    let decoded: String = url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, _)| k.into_owned())
        .next()?;
    clean_token(&decoded)
}

fn clean_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
