//! Key/value persistence used for the database snapshot and per-domain
//! resolutions. Values are opaque bytes; callers encode them as CBOR.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bias_common::hashing::storage_key_digest;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ResolveError, Result};

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Values for the keys that exist. Missing keys are simply absent.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Vec<u8>>>;
    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> Result<()>;
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Vec<u8>>> {
        (**self).get(keys).await
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> Result<()> {
        (**self).set(entries).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        (**self).remove(keys).await
    }
}

pub fn cbor_encode<T: Serialize>(val: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(val, &mut buf)
        .map_err(|e| ResolveError::CacheUnavailable(format!("CBOR encode: {}", e)))?;
    Ok(buf)
}

pub fn cbor_decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::de::from_reader(bytes)
        .map_err(|e| ResolveError::CacheUnavailable(format!("CBOR decode: {}", e)))
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| ResolveError::CacheUnavailable("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Vec<u8>>> {
        let map = self.lock()?;
        Ok(keys
            .iter()
            .filter_map(|k| map.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> Result<()> {
        self.lock()?.extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.lock()?;
        for k in keys {
            map.remove(*k);
        }
        Ok(())
    }
}

/// One file per key under a directory. File names are sha256(key) in hex so
/// arbitrary keys are safe on every file system.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(storage_key_digest(key))
    }
}

fn io_error(op: &str, path: &Path, e: std::io::Error) -> ResolveError {
    ResolveError::CacheUnavailable(format!("{} {}: {}", op, path.display(), e))
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Vec<u8>>> {
        let mut out = HashMap::new();
        for key in keys {
            let path = self.path_for(key);
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    out.insert(key.to_string(), bytes);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(io_error("read", &path, e)),
            }
        }
        Ok(out)
    }

    async fn set(&self, entries: HashMap<String, Vec<u8>>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, e))?;
        for (key, value) in entries {
            let path = self.path_for(&key);
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, &value)
                .await
                .map_err(|e| io_error("write", &tmp, e))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .map_err(|e| io_error("rename", &path, e))?;
        }
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            let path = self.path_for(key);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(io_error("remove", &path, e)),
            }
        }
        Ok(())
    }
}
