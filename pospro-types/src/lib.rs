//! Core type definitions for POS Pro.
//!
//! This crate defines the identifier types shared by the model, the local
//! store and the licensing subsystem:
//! - Business, owner, staff, product and sale identifiers (UUID v7)
//!
//! Domain records (products, carts, sales) live in `pospro-model`.

mod ids;

pub use ids::{BusinessId, OwnerId, ProductId, SaleId, StaffId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
