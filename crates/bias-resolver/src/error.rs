use bias_common::bundle::BundleError;
use bias_common::normalization::InvalidInput;
use thiserror::Error;

/// Failure taxonomy. None of these escape the public resolver API; they are
/// recovered locally and logged.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("bias database unavailable: {0}")]
    DatabaseUnavailable(String),
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl From<InvalidInput> for ResolveError {
    fn from(e: InvalidInput) -> Self {
        ResolveError::InvalidInput(e.0)
    }
}

impl From<BundleError> for ResolveError {
    fn from(e: BundleError) -> Self {
        ResolveError::DatabaseUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
