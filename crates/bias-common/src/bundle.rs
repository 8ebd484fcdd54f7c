use serde::Deserialize;
use thiserror::Error;

use crate::types::BiasDatabase;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("bias database resource is empty")]
    Empty,
    #[error("bias database is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bundled data file layout. The wrapped form is what ships with the crate;
/// a bare `domain -> record` object is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatabaseFile {
    Wrapped {
        #[serde(rename = "mediaBiasData")]
        media_bias_data: BiasDatabase,
    },
    Bare(BiasDatabase),
}

/// Decode the bias data file: optional UTF-8 BOM, then JSON.
pub fn decode_database(raw: &[u8]) -> Result<BiasDatabase, BundleError> {
    let bytes = raw.strip_prefix(&UTF8_BOM[..]).unwrap_or(raw);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(BundleError::Empty);
    }

    let file: DatabaseFile = serde_json::from_slice(bytes)?;
    Ok(match file {
        DatabaseFile::Wrapped { media_bias_data } => media_bias_data,
        DatabaseFile::Bare(db) => db,
    })
}
