//! SQLite storage layer for POS Pro.
//!
//! One database file per installation holds the business record, the owner
//! and staff logins, the device session, the catalog and the sales history.
//!
//! # Architecture
//!
//! - [`PosStore`] owns a single connection behind a mutex; every operation
//!   is a short blocking call
//! - The schema is created on open
//! - The store is the account side of licensing: it implements
//!   [`pospro_license::AccountDirectory`] over the business record's
//!   `activated_license_key_hash` column

mod auth;
mod backup;
mod catalog;
mod error;
mod license;
mod sales;
mod store;

pub use backup::Backup;
pub use error::{StoreError, StoreResult};
pub use store::PosStore;
