//! Error types for lookups, storage and resolution

use thiserror::Error;

/// Failure of a single call to the lookup service
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Network(String),

    #[error("lookup service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed lookup payload: {0}")]
    Decode(String),

    #[error("lookup call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lookup API credential is missing (set EXERCISE_API_KEY)")]
    MissingCredential,

    #[error("lookup API credential contains characters not allowed in a header")]
    InvalidCredential,

    #[error("invalid lookup base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Persistent cache failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Task(String),
}

/// Resolution failures surfaced to callers. A miss is not an error.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("resolution unavailable: all {attempts} attempts failed (last: {last_error})")]
    Unavailable { attempts: usize, last_error: LookupError },

    #[error("resolution aborted: {0}")]
    Aborted(String),
}

impl From<tokio::task::JoinError> for ResolveError {
    fn from(err: tokio::task::JoinError) -> Self {
        ResolveError::Aborted(err.to_string())
    }
}
