//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The key was empty after trimming.
    #[error("license key is empty")]
    EmptyKey,

    /// The key is neither the demo key nor on the allow-list.
    #[error("license key not recognised")]
    UnknownKey,

    /// The account store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// IO error while touching the pending ledger.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Returns true for rejections caused by the key itself, as opposed to
    /// storage or environment faults.
    #[must_use]
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::EmptyKey | Self::UnknownKey)
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
