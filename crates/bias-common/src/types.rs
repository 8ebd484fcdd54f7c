use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::normalization::canonical_key;

/// Perceived political orientation of a publisher.
///
/// Unrecognised strings in source data decode to `Unknown` rather than failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum BiasCategory {
    Left,
    LeanLeft,
    Center,
    LeanRight,
    Right,
    #[default]
    Unknown,
}

impl BiasCategory {
    /// Known categories in left-to-right spectrum order.
    pub const SPECTRUM: [BiasCategory; 5] = [
        BiasCategory::Left,
        BiasCategory::LeanLeft,
        BiasCategory::Center,
        BiasCategory::LeanRight,
        BiasCategory::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BiasCategory::Left => "left",
            BiasCategory::LeanLeft => "lean-left",
            BiasCategory::Center => "center",
            BiasCategory::LeanRight => "lean-right",
            BiasCategory::Right => "right",
            BiasCategory::Unknown => "unknown",
        }
    }

    /// Human-readable label, e.g. `Lean Left`.
    pub fn label(&self) -> &'static str {
        match self {
            BiasCategory::Left => "Left",
            BiasCategory::LeanLeft => "Lean Left",
            BiasCategory::Center => "Center",
            BiasCategory::LeanRight => "Lean Right",
            BiasCategory::Right => "Right",
            BiasCategory::Unknown => "Unknown",
        }
    }

    /// Lenient parse: accepts `lean-left`, `Lean Left`, `left_center`, `centre`, ...
    pub fn parse(s: &str) -> Self {
        match dashed(s).as_str() {
            "left" | "far-left" => BiasCategory::Left,
            "lean-left" | "left-center" | "center-left" => BiasCategory::LeanLeft,
            "center" | "centre" | "least-biased" => BiasCategory::Center,
            "lean-right" | "right-center" | "center-right" => BiasCategory::LeanRight,
            "right" | "far-right" => BiasCategory::Right,
            _ => BiasCategory::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BiasCategory::Unknown)
    }
}

impl From<String> for BiasCategory {
    fn from(s: String) -> Self {
        BiasCategory::parse(&s)
    }
}

impl fmt::Display for BiasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Historical factual-accuracy reputation of a publisher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Reliability {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Reliability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reliability::High => "high",
            Reliability::Medium => "medium",
            Reliability::Low => "low",
            Reliability::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reliability::High => "High",
            Reliability::Medium => "Medium",
            Reliability::Low => "Low",
            Reliability::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Self {
        match dashed(s).as_str() {
            "high" | "very-high" => Reliability::High,
            "medium" | "mixed" | "mostly-factual" => Reliability::Medium,
            "low" | "very-low" => Reliability::Low,
            _ => Reliability::Unknown,
        }
    }
}

impl From<String> for Reliability {
    fn from(s: String) -> Self {
        Reliability::parse(&s)
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn dashed(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// One known publisher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasRecord {
    pub name: String,
    #[serde(default)]
    pub bias: BiasCategory,
    #[serde(default, alias = "accuracy")]
    pub reliability: Reliability,
}

impl BiasRecord {
    pub fn new(name: impl Into<String>, bias: BiasCategory, reliability: Reliability) -> Self {
        Self {
            name: name.into(),
            bias,
            reliability,
        }
    }

    /// The total fallback: unknown bias and reliability under the given display name.
    pub fn unknown(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            "unknown".to_string()
        } else {
            name
        };
        Self::new(name, BiasCategory::Unknown, Reliability::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        self.bias == BiasCategory::Unknown && self.reliability == Reliability::Unknown
    }
}

/// Output of a lookup. Same shape as [`BiasRecord`], but always fully populated.
pub type ResolutionResult = BiasRecord;

/// Canonical domain -> publisher table.
///
/// Keys are lower-cased with `www.` stripped. Iteration is in sorted key order,
/// which keeps every heuristic scan deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, BiasRecord>", into = "BTreeMap<String, BiasRecord>")]
pub struct BiasDatabase {
    records: BTreeMap<String, BiasRecord>,
}

impl BiasDatabase {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw `(domain, record)` pairs. Keys are canonicalized; entries
    /// with an empty key or empty display name are dropped. Later duplicates win.
    pub fn from_records<I, K>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, BiasRecord)>,
        K: AsRef<str>,
    {
        let records = records
            .into_iter()
            .filter_map(|(key, record)| {
                let key = canonical_key(key.as_ref());
                if key.is_empty() || record.name.trim().is_empty() {
                    None
                } else {
                    Some((key, record))
                }
            })
            .collect();
        Self { records }
    }

    pub fn get(&self, domain: &str) -> Option<&BiasRecord> {
        self.records.get(domain)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.records.contains_key(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BiasRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<BTreeMap<String, BiasRecord>> for BiasDatabase {
    fn from(map: BTreeMap<String, BiasRecord>) -> Self {
        Self::from_records(map)
    }
}

impl From<BiasDatabase> for BTreeMap<String, BiasRecord> {
    fn from(db: BiasDatabase) -> Self {
        db.records
    }
}

/// A memoized resolution as persisted per canonical domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub result: ResolutionResult,
    /// Epoch milliseconds at write time.
    pub timestamp: u64,
    #[serde(default)]
    pub version: u32,
    /// Digest of the database the result was resolved against.
    #[serde(default)]
    pub revision: String,
}
