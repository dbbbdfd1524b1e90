//! Error types for the local store.

use pospro_license::LicenseError;
use pospro_model::ValidationError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A form or record was rejected.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Password hashing failed.
    #[error("credential error: {0}")]
    Credentials(String),

    /// Stored or imported data is malformed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Setup was attempted on an installation that already has an owner.
    #[error("an owner is already set up")]
    AlreadySetUp,

    /// A login name is taken.
    #[error("already in use: {0}")]
    Duplicate(String),
}

impl From<StoreError> for LicenseError {
    fn from(e: StoreError) -> Self {
        LicenseError::Storage(e.to_string())
    }
}
