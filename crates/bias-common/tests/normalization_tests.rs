use bias_common::normalization::*;

// ============================================================================
// normalize
// ============================================================================

#[test]
fn normalize_strips_scheme_path_and_www() {
    assert_eq!(
        normalize("https://www.nytimes.com/2024/article?x=1").unwrap(),
        "nytimes.com"
    );
}

#[test]
fn normalize_lowercases_host() {
    assert_eq!(normalize("HTTPS://WWW.Reuters.COM/world").unwrap(), "reuters.com");
}

#[test]
fn normalize_keeps_other_subdomains() {
    assert_eq!(normalize("https://edition.cnn.com/x").unwrap(), "edition.cnn.com");
}

#[test]
fn normalize_accepts_bare_host() {
    assert_eq!(normalize("www.apnews.com").unwrap(), "apnews.com");
    assert_eq!(normalize("apnews.com/article/abc").unwrap(), "apnews.com");
}

#[test]
fn normalize_accepts_bare_host_with_port() {
    assert_eq!(normalize("apnews.com:443/x").unwrap(), "apnews.com");
    assert_eq!(normalize("www.apnews.com:8080").unwrap(), "apnews.com");
}

#[test]
fn normalize_drops_port_and_trailing_dot() {
    assert_eq!(normalize("http://bbc.co.uk.:8080/news").unwrap(), "bbc.co.uk");
}

#[test]
fn normalize_rejects_garbage() {
    assert!(normalize("not a url").is_err());
    assert!(normalize("").is_err());
    assert!(normalize("   ").is_err());
    assert!(normalize("nodots").is_err());
}

#[test]
fn normalize_rejects_hostless_urls() {
    assert!(normalize("mailto:someone@example.com").is_err());
}

#[test]
fn normalize_error_carries_input() {
    let err = normalize("  not a url ").unwrap_err();
    assert_eq!(err, InvalidInput("not a url".to_string()));
}

#[test]
fn strip_www_is_idempotent() {
    assert_eq!(strip_www("www.cnn.com"), "cnn.com");
    assert_eq!(strip_www(strip_www("www.cnn.com")), "cnn.com");
    assert_eq!(strip_www("cnn.com"), "cnn.com");
}

#[test]
fn canonical_key_cleans_database_keys() {
    assert_eq!(canonical_key("  WWW.FoxNews.com. "), "foxnews.com");
    assert_eq!(canonical_key(""), "");
}

// ============================================================================
// main_part / public_suffix
// ============================================================================

#[test]
fn main_part_two_labels() {
    assert_eq!(main_part("edition.cnn.com", DEFAULT_COMPOUND_SUFFIXES), "cnn.com");
    assert_eq!(main_part("a.b.c.example.com", DEFAULT_COMPOUND_SUFFIXES), "example.com");
}

#[test]
fn main_part_compound_suffix_keeps_three() {
    assert_eq!(main_part("news.bbc.co.uk", DEFAULT_COMPOUND_SUFFIXES), "bbc.co.uk");
    assert_eq!(main_part("www.smh.com.au", DEFAULT_COMPOUND_SUFFIXES), "smh.com.au");
}

#[test]
fn main_part_short_domain_unchanged() {
    assert_eq!(main_part("cnn.com", DEFAULT_COMPOUND_SUFFIXES), "cnn.com");
    assert_eq!(main_part("bbc.co.uk", DEFAULT_COMPOUND_SUFFIXES), "bbc.co.uk");
    assert_eq!(main_part("localhost", DEFAULT_COMPOUND_SUFFIXES), "localhost");
}

#[test]
fn main_part_respects_custom_list() {
    let none: &[&str] = &[];
    assert_eq!(main_part("news.bbc.co.uk", none), "co.uk");
}

#[test]
fn public_suffix_simple_and_compound() {
    assert_eq!(public_suffix("cnn.com", DEFAULT_COMPOUND_SUFFIXES), "com");
    assert_eq!(public_suffix("bbc.co.uk", DEFAULT_COMPOUND_SUFFIXES), "co.uk");
    assert_eq!(public_suffix("localhost", DEFAULT_COMPOUND_SUFFIXES), "localhost");
}

// ============================================================================
// variants / parent_domain / domain_stem
// ============================================================================

#[test]
fn parent_domain_requires_three_labels() {
    assert_eq!(parent_domain("news.bbc.co.uk"), Some("bbc.co.uk"));
    assert_eq!(parent_domain("edition.cnn.com"), Some("cnn.com"));
    assert_eq!(parent_domain("cnn.com"), None);
}

#[test]
fn variants_parent_then_tld_equivalent() {
    let v = variants("edition.cnn.com", DEFAULT_TLD_EQUIVALENTS);
    assert_eq!(v, vec!["cnn.com".to_string(), "edition.cnn.co.uk".to_string()]);
}

#[test]
fn variants_co_uk_to_com() {
    let v = variants("guardian.co.uk", DEFAULT_TLD_EQUIVALENTS);
    assert_eq!(v, vec!["co.uk".to_string(), "guardian.com".to_string()]);
}

#[test]
fn variants_org_uk_to_org() {
    let v = variants("amnesty.org", DEFAULT_TLD_EQUIVALENTS);
    assert_eq!(v, vec!["amnesty.org.uk".to_string()]);
}

#[test]
fn variants_unmatched_tld() {
    assert!(variants("lemonde.fr", DEFAULT_TLD_EQUIVALENTS).is_empty());
}

#[test]
fn domain_stem_strips_suffix() {
    assert_eq!(domain_stem("nytimes.com", DEFAULT_COMPOUND_SUFFIXES), "nytimes");
    assert_eq!(domain_stem("bbc.co.uk", DEFAULT_COMPOUND_SUFFIXES), "bbc");
    assert_eq!(domain_stem("abcnews.go.com", DEFAULT_COMPOUND_SUFFIXES), "abcnews.go");
    assert_eq!(domain_stem("localhost", DEFAULT_COMPOUND_SUFFIXES), "localhost");
}

// ============================================================================
// fold_text / is_http_url
// ============================================================================

#[test]
fn fold_text_lowercases_and_collapses() {
    assert_eq!(fold_text("  Reporting by\tthe\n Associated  Press "), "reporting by the associated press");
}

#[test]
fn fold_text_strips_accents_and_bom() {
    assert_eq!(fold_text("\u{FEFF}Le Monde Diplomatique \u{00C9}dition"), "le monde diplomatique edition");
    assert_eq!(fold_text("Caf\u{0065}\u{0301}"), "cafe");
}

#[test]
fn fold_text_idempotent() {
    let once = fold_text("  \u{00C9}L PA\u{00CD}S  ");
    assert_eq!(fold_text(&once), once);
}

#[test]
fn is_http_url_accepts_http_and_https_only() {
    assert!(is_http_url("https://apnews.com/x"));
    assert!(is_http_url("http://example.com"));
    assert!(!is_http_url("ftp://example.com/file"));
    assert!(!is_http_url("chrome://extensions"));
    assert!(!is_http_url("apnews.com"));
    assert!(!is_http_url(""));
}
