use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use url::Url;

/// Compound public suffixes recognised by [`main_part`]. A finite list, not the
/// full public suffix table.
pub const DEFAULT_COMPOUND_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "gov.uk", "ac.uk", "com.au", "net.au", "org.au", "co.nz", "co.jp",
    "co.in", "com.br", "co.za",
];

/// Cross-TLD equivalents tried by [`variants`]. First matching pair only.
pub const DEFAULT_TLD_EQUIVALENTS: &[(&str, &str)] =
    &[(".com", ".co.uk"), (".org", ".org.uk"), (".gov", ".gov.uk")];

/// Input could not be parsed as a URL or bare hostname.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid url or host: {0:?}")]
pub struct InvalidInput(pub String);

/// Canonical domain for `url_or_host`: lower-cased hostname, no leading `www.`,
/// no trailing dot.
///
/// Scheme-less input that looks like a hostname (`apnews.com/x`, also with a
/// port) is retried with `http://`.
pub fn normalize(url_or_host: &str) -> Result<String, InvalidInput> {
    let trimmed = url_or_host.trim();
    let invalid = || InvalidInput(trimmed.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    // `host.com:443/x` parses with `host.com` as its scheme and no host.
    let parsed = match Url::parse(trimmed) {
        Ok(url) if url.host_str().is_some() || !url.scheme().contains('.') => url,
        _ if looks_like_bare_host(trimmed) => {
            Url::parse(&format!("http://{}", trimmed)).map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    let host = parsed.host_str().ok_or_else(invalid)?;
    let domain = canonical_key(host);
    if domain.is_empty() {
        return Err(invalid());
    }
    Ok(domain)
}

fn looks_like_bare_host(s: &str) -> bool {
    !s.contains("://") && !s.chars().any(char::is_whitespace) && {
        let host = s.split(['/', '?', '#']).next().unwrap_or("");
        host.contains('.') && !host.starts_with('.')
    }
}

/// Lower-case, trim, drop a trailing dot and a leading `www.`.
pub fn canonical_key(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let lower = lower.trim_end_matches('.');
    strip_www(lower).to_string()
}

/// Remove one leading `www.` label. Idempotent for canonical domains.
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// True if `s` parses as an absolute `http` or `https` URL.
pub fn is_http_url(s: &str) -> bool {
    match Url::parse(s.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Public suffix of `domain`: the last two labels when they form a known
/// compound suffix, otherwise the last label.
pub fn public_suffix<'a, S: AsRef<str>>(domain: &'a str, compound_suffixes: &[S]) -> &'a str {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() >= 3 {
        let last_two_start = domain.len() - labels[labels.len() - 2..].join(".").len();
        let last_two = &domain[last_two_start..];
        if compound_suffixes.iter().any(|s| s.as_ref() == last_two) {
            return last_two;
        }
    }
    match domain.rfind('.') {
        Some(idx) => &domain[idx + 1..],
        None => domain,
    }
}

/// Registrable root: last two labels, or last three under a compound suffix.
///
/// `news.bbc.co.uk` -> `bbc.co.uk`, `edition.cnn.com` -> `cnn.com`.
pub fn main_part<S: AsRef<str>>(domain: &str, compound_suffixes: &[S]) -> String {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() <= 2 {
        return domain.to_string();
    }
    let suffix = public_suffix(domain, compound_suffixes);
    let keep = if suffix.contains('.') { 3 } else { 2 };
    let keep = keep.min(labels.len());
    labels[labels.len() - keep..].join(".")
}

/// Secondary lookup candidates: the parent domain (when there are at least
/// three labels), then the first applicable cross-TLD equivalent.
pub fn variants<A: AsRef<str>, B: AsRef<str>>(domain: &str, tld_equivalents: &[(A, B)]) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(parent) = parent_domain(domain) {
        out.push(parent.to_string());
    }

    for (primary, alternate) in tld_equivalents {
        let (primary, alternate) = (primary.as_ref(), alternate.as_ref());
        if let Some(base) = domain.strip_suffix(alternate) {
            if !base.is_empty() {
                out.push(format!("{}{}", base, primary));
                break;
            }
        }
        if let Some(base) = domain.strip_suffix(primary) {
            if !base.is_empty() {
                out.push(format!("{}{}", base, alternate));
                break;
            }
        }
    }

    out.dedup();
    out.retain(|v| v != domain);
    out
}

/// All labels but the first, when the domain has at least three labels.
pub fn parent_domain(domain: &str) -> Option<&str> {
    if domain.split('.').count() < 3 {
        return None;
    }
    domain.split_once('.').map(|(_, rest)| rest)
}

/// The domain with its public suffix removed: `nytimes.com` -> `nytimes`,
/// `bbc.co.uk` -> `bbc`.
pub fn domain_stem<'a, S: AsRef<str>>(domain: &'a str, compound_suffixes: &[S]) -> &'a str {
    let suffix = public_suffix(domain, compound_suffixes);
    if suffix.len() >= domain.len() {
        return domain;
    }
    &domain[..domain.len() - suffix.len() - 1]
}

/// Fold citation text for matching: BOM removal, NFC, accent stripping,
/// lower-casing, whitespace collapsed to single spaces, trimmed.
pub fn fold_text(text: &str) -> String {
    let no_bom = text.replace('\u{FEFF}', "");
    let nfc: String = no_bom.nfc().collect();
    let stripped: String = nfc.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect();
    let lower = stripped.to_lowercase();

    let mut result = String::with_capacity(lower.len());
    let mut prev_space = false;
    for c in lower.chars() {
        if c.is_whitespace() {
            if !prev_space {
                result.push(' ');
                prev_space = true;
            }
        } else {
            result.push(c);
            prev_space = false;
        }
    }
    result.trim().to_string()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32,
        0x0300..=0x036F |
        0x1AB0..=0x1AFF |
        0x1DC0..=0x1DFF |
        0x20D0..=0x20FF |
        0xFE20..=0xFE2F
    )
}
