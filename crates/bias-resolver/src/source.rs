use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ResolveError, Result};

/// Bias data shipped with the crate.
pub const BUNDLED_DATABASE: &[u8] = include_bytes!("../data/media-bias-data.json");

/// Where the raw bias database bytes come from.
#[async_trait]
pub trait DatabaseSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: DatabaseSource + ?Sized> DatabaseSource for Arc<T> {
    async fn fetch(&self) -> Result<Vec<u8>> {
        (**self).fetch().await
    }
}

/// In-binary resource, the bundled table by default.
#[derive(Debug, Clone)]
pub struct BundledSource {
    bytes: &'static [u8],
}

impl BundledSource {
    pub fn new(bytes: &'static [u8]) -> Self {
        Self { bytes }
    }
}

impl Default for BundledSource {
    fn default() -> Self {
        Self::new(BUNDLED_DATABASE)
    }
}

#[async_trait]
impl DatabaseSource for BundledSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

/// A JSON data file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatabaseSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            ResolveError::DatabaseUnavailable(format!("read {}: {}", self.path.display(), e))
        })
    }
}
