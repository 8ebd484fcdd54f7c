mod fixtures;

use bias_resolver::matcher::{match_text, match_url, MatchTier};
use bias_resolver::{BiasCategory, BiasDatabase, BiasRecord, Reliability, ResolverConfig};
use fixtures::sample_db;

fn url(input: &str) -> (BiasRecord, MatchTier) {
    let r = match_url(&sample_db(), &ResolverConfig::default(), input);
    (r.result, r.tier)
}

fn text(input: &str) -> (BiasRecord, MatchTier) {
    let r = match_text(&sample_db(), &ResolverConfig::default(), input);
    (r.result, r.tier)
}

// ============================================================================
// URL tiers
// ============================================================================

#[test]
fn exact_domain_match() {
    let (record, tier) = url("https://nytimes.com/section/politics");
    assert_eq!(record.name, "New York Times");
    assert_eq!(record.bias, BiasCategory::LeanLeft);
    assert_eq!(tier, MatchTier::Exact);
}

#[test]
fn www_is_stripped_before_exact_match() {
    let (record, tier) = url("https://www.nytimes.com/2024/article");
    assert_eq!(record.name, "New York Times");
    assert_eq!(tier, MatchTier::Exact);
}

#[test]
fn doubled_www_hits_stripped_tier() {
    let (record, tier) = url("https://www.www.reuters.com/world");
    assert_eq!(record.name, "Reuters");
    assert_eq!(tier, MatchTier::WwwStripped);
}

#[test]
fn subdomain_found_by_containment() {
    let (record, tier) = url("https://amp.theguardian.com/world/2024");
    assert_eq!(record.name, "The Guardian");
    assert_eq!(tier, MatchTier::Containment);
}

#[test]
fn containment_prefers_longest_key() {
    let db = BiasDatabase::from_records([
        ("times.com", BiasRecord::new("Times", BiasCategory::Center, Reliability::Medium)),
        (
            "nytimes.com",
            BiasRecord::new("New York Times", BiasCategory::LeanLeft, Reliability::High),
        ),
    ]);
    let r = match_url(&db, &ResolverConfig::default(), "https://int.nytimes.com/x");
    assert_eq!(r.result.name, "New York Times");
    assert_eq!(r.tier, MatchTier::Containment);
}

#[test]
fn short_keys_are_not_used_for_containment() {
    let db = BiasDatabase::from_records([(
        "ap.io",
        BiasRecord::new("Tiny", BiasCategory::Left, Reliability::Low),
    )]);
    let config = ResolverConfig {
        min_containment_len: 6,
        ..ResolverConfig::default()
    };
    let r = match_url(&db, &config, "https://snap.iox.dev");
    assert_eq!(r.tier, MatchTier::Fallback);
}

#[test]
fn subdomain_tier_uses_registrable_root() {
    let config = ResolverConfig {
        min_containment_len: 100,
        ..ResolverConfig::default()
    };
    let r = match_url(&sample_db(), &config, "https://news.bbc.co.uk/sport");
    assert_eq!(r.result.name, "BBC");
    assert_eq!(r.tier, MatchTier::Subdomain);
}

#[test]
fn tld_variant_tier() {
    let (record, tier) = url("https://bbc.com/news");
    assert_eq!(record.name, "BBC");
    assert_eq!(tier, MatchTier::Variant);
}

#[test]
fn special_case_used_when_database_misses() {
    let (record, tier) = url("https://apnews.com/article/abc");
    assert_eq!(record, BiasRecord::new("Associated Press", BiasCategory::Center, Reliability::High));
    assert_eq!(tier, MatchTier::SpecialCase);
}

#[test]
fn nytimes_special_case_with_empty_database() {
    let r = match_url(
        &BiasDatabase::empty(),
        &ResolverConfig::default(),
        "https://www.nytimes.com/2024/article",
    );
    assert_eq!(r.result, BiasRecord::new("New York Times", BiasCategory::LeanLeft, Reliability::High));
    assert_eq!(r.tier, MatchTier::SpecialCase);
}

#[test]
fn database_entry_beats_special_case() {
    let (record, tier) = url("https://www.foxnews.com/politics");
    assert_eq!(record.name, "Fox News Channel");
    assert_eq!(record.reliability, Reliability::Low);
    assert_eq!(tier, MatchTier::Exact);

    let (record, _) = url("https://video.foxnews.com/v/1");
    assert_eq!(record.name, "Fox News Channel");
}

#[test]
fn special_case_covers_sibling_domain() {
    let (record, tier) = url("https://www.foxbusiness.com/markets");
    assert_eq!(record, BiasRecord::new("Fox News", BiasCategory::Right, Reliability::Medium));
    assert_eq!(tier, MatchTier::SpecialCase);
}

#[test]
fn unknown_domain_falls_back_to_domain_name() {
    let (record, tier) = url("https://www.unheard-of.example/story");
    assert_eq!(record, BiasRecord::unknown("unheard-of.example"));
    assert_eq!(tier, MatchTier::Fallback);
}

#[test]
fn garbage_input_is_unknown_without_panicking() {
    let (record, tier) = url("not a url");
    assert_eq!(record, BiasRecord::unknown("not a url"));
    assert_eq!(tier, MatchTier::Fallback);

    let (record, _) = url("");
    assert_eq!(record.name, "unknown");
    assert!(record.is_unknown());
}

// ============================================================================
// Aggregators
// ============================================================================

#[test]
fn aggregator_source_param_matches_domain() {
    let r = match_url(
        &sample_db(),
        &ResolverConfig::default(),
        "https://news.google.com/articles/CBM?source=reuters.com&hl=en",
    );
    assert_eq!(r.result.name, "Reuters");
    assert_eq!(r.tier, MatchTier::Aggregator);
    assert_eq!(r.domain.as_deref(), Some("news.google.com"));
}

#[test]
fn aggregator_path_token_matches_display_name() {
    let (record, tier) = url("https://www.msn.com/en-us/news/the-guardian/ar-AA1");
    assert_eq!(record.name, "The Guardian");
    assert_eq!(tier, MatchTier::Aggregator);
}

#[test]
fn aggregator_path_token_matches_domain_stem() {
    let (record, tier) = url("https://flipboard.com/section/motherjones");
    assert_eq!(record.name, "Mother Jones");
    assert_eq!(tier, MatchTier::Aggregator);
}

#[test]
fn aggregator_without_match_falls_through() {
    let (record, tier) = url("https://news.google.com/topic/unheardof");
    assert_eq!(record, BiasRecord::unknown("news.google.com"));
    assert_eq!(tier, MatchTier::Fallback);
}

// ============================================================================
// Text path
// ============================================================================

#[test]
fn associated_press_phrase() {
    let (record, tier) = text("Reporting by the Associated Press");
    assert_eq!(record, BiasRecord::new("Associated Press", BiasCategory::Center, Reliability::High));
    assert_eq!(tier, MatchTier::SpecialCase);
}

#[test]
fn ap_must_be_a_whole_word() {
    let (record, _) = text("Photo: AP");
    assert_eq!(record.name, "Associated Press");

    let (record, tier) = text("Gap analysis");
    assert_eq!(record, BiasRecord::unknown("Gap analysis"));
    assert_eq!(tier, MatchTier::Fallback);
}

#[test]
fn display_name_contained_in_text() {
    let (record, tier) = text("Analysis from  The   Guardian");
    assert_eq!(record.name, "The Guardian");
    assert_eq!(tier, MatchTier::TextName);
}

#[test]
fn text_contained_in_display_name() {
    let (record, tier) = text("Mother");
    assert_eq!(record.name, "Mother Jones");
    assert_eq!(tier, MatchTier::TextName);
}

#[test]
fn domain_stem_in_text() {
    let (record, tier) = text("as first reported in the WSJ");
    assert_eq!(record.name, "Wall Street Journal");
    assert_eq!(tier, MatchTier::TextStem);
}

#[test]
fn very_short_text_does_not_match_names() {
    let (record, tier) = text("bb");
    assert_eq!(record, BiasRecord::unknown("bb"));
    assert_eq!(tier, MatchTier::Fallback);
}

#[test]
fn blank_text_is_unknown() {
    let (record, tier) = text("   ");
    assert_eq!(record.name, "unknown");
    assert_eq!(tier, MatchTier::Fallback);
}
