use sha2::{Digest, Sha256};

use crate::types::BiasDatabase;

/// File-system-safe name for a storage key: lowercase hex sha256(key).
pub fn storage_key_digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let hash: [u8; 32] = hasher.finalize().into();
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Content digest of a bias database, stable across reloads of the same data.
pub fn database_revision(db: &BiasDatabase) -> String {
    let mut hasher = Sha256::new();
    for (key, record) in db.iter() {
        for field in [
            key,
            record.name.as_str(),
            record.bias.as_str(),
            record.reliability.as_str(),
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0u8]);
        }
    }
    let hash: [u8; 32] = hasher.finalize().into();
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}
