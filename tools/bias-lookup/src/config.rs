use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bias_resolver::ResolverConfig;
use serde::Deserialize;

const APP_DIR: &str = "media-bias-lens";

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
    /// Bias data file used instead of the bundled table.
    pub database: Option<PathBuf>,
    /// Directory for the persisted database snapshot and resolutions.
    pub store_dir: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}

pub fn default_store_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        if let Err(errors) = config.resolver.validate() {
            bail!(
                "Invalid config file '{}':\n  - {}",
                path.display(),
                errors.join("\n  - ")
            );
        }
        Ok(config)
    }

    /// An explicitly named file must exist; the default location may be absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
