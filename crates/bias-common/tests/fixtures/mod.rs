/// Small wrapped database in the bundled file layout.
#[allow(dead_code)]
pub const SAMPLE_DATABASE_JSON: &str = r#"{
  "mediaBiasData": {
    "nytimes.com": { "name": "New York Times", "bias": "lean-left", "reliability": "high" },
    "WWW.Reuters.com": { "name": "Reuters", "bias": "center", "reliability": "high" },
    "foxnews.com": { "name": "Fox News", "bias": "right", "accuracy": "medium" },
    "bbc.co.uk": { "name": "BBC", "bias": "center", "reliability": "high" },
    "example.org": { "name": "Example", "bias": "far-out", "reliability": "sometimes" }
  }
}"#;
