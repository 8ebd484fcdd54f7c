//! Hard-coded records for outlets whose domain variants are too numerous for
//! the database to cover. Consulted only after every database tier misses, so
//! an explicit database entry always wins.

use bias_common::types::{BiasCategory, BiasRecord, Reliability};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Plain substring of the candidate.
    Substring(&'static str),
    /// Whole token, delimited by anything that is not alphanumeric.
    Word(&'static str),
}

impl Pattern {
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            Pattern::Substring(needle) => haystack.contains(*needle),
            Pattern::Word(word) => haystack
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == *word),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SpecialCase {
    pub patterns: &'static [Pattern],
    pub name: &'static str,
    pub bias: BiasCategory,
    pub reliability: Reliability,
}

impl SpecialCase {
    pub fn matches(&self, haystack: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(haystack))
    }

    pub fn record(&self) -> BiasRecord {
        BiasRecord::new(self.name, self.bias, self.reliability)
    }
}

const ASSOCIATED_PRESS: &str = "Associated Press";
const REUTERS: &str = "Reuters";

/// Checked against canonical domains, in order.
pub const DOMAIN_CASES: &[SpecialCase] = &[
    SpecialCase {
        patterns: &[Pattern::Substring("apnews"), Pattern::Substring("ap.org")],
        name: ASSOCIATED_PRESS,
        bias: BiasCategory::Center,
        reliability: Reliability::High,
    },
    SpecialCase {
        patterns: &[Pattern::Substring("reuters")],
        name: REUTERS,
        bias: BiasCategory::Center,
        reliability: Reliability::High,
    },
    SpecialCase {
        patterns: &[Pattern::Substring("nytimes"), Pattern::Substring("nyti.ms")],
        name: "New York Times",
        bias: BiasCategory::LeanLeft,
        reliability: Reliability::High,
    },
    SpecialCase {
        patterns: &[Pattern::Substring("washingtonpost"), Pattern::Substring("wapo")],
        name: "Washington Post",
        bias: BiasCategory::LeanLeft,
        reliability: Reliability::High,
    },
    SpecialCase {
        patterns: &[Pattern::Substring("foxnews"), Pattern::Substring("foxbusiness")],
        name: "Fox News",
        bias: BiasCategory::Right,
        reliability: Reliability::Medium,
    },
    SpecialCase {
        patterns: &[Pattern::Substring("cnn")],
        name: "CNN",
        bias: BiasCategory::LeanLeft,
        reliability: Reliability::Medium,
    },
];

/// Checked against folded citation text, in order.
pub const TEXT_CASES: &[SpecialCase] = &[
    SpecialCase {
        patterns: &[Pattern::Word("ap"), Pattern::Substring("associated press")],
        name: ASSOCIATED_PRESS,
        bias: BiasCategory::Center,
        reliability: Reliability::High,
    },
    SpecialCase {
        patterns: &[Pattern::Substring("reuters")],
        name: REUTERS,
        bias: BiasCategory::Center,
        reliability: Reliability::High,
    },
];

pub fn match_domain(domain: &str) -> Option<BiasRecord> {
    first_match(DOMAIN_CASES, domain)
}

pub fn match_text(folded: &str) -> Option<BiasRecord> {
    first_match(TEXT_CASES, folded)
}

fn first_match(cases: &[SpecialCase], haystack: &str) -> Option<BiasRecord> {
    cases.iter().find(|c| c.matches(haystack)).map(SpecialCase::record)
}
