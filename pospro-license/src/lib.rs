//! Licensing and activation for POS Pro.
//!
//! This module handles:
//! - License key normalization and 32-bit key hashing
//! - Allow-list membership checks against the compiled-in key hashes
//! - Activation against the signed-in business, or deferral when no
//!   business exists yet
//! - The device-local pending-activation ledger and its reconciliation
//!
//! # Design Principles
//!
//! - **No key material at rest**: only the 32-bit hash of a key is stored
//! - **Offline-only**: the allow-list is embedded, nothing is fetched
//! - **Boolean facade**: screens get `bool`; the tagged results behind it
//!   stay available to hosts that want differentiated feedback
//!
//! # Key hashing
//!
//! Keys are trimmed and upper-cased, then folded over their UTF-16 code
//! units as `h = h * 31 + unit` with two's-complement `i32` wraparound at
//! every step.

mod activation;
mod allow_list;
mod error;
mod key;
mod ledger;

pub use activation::{
    AccountDirectory, Activation, Entitlements, Reconciliation, SetupNotice,
};
pub use allow_list::AllowList;
pub use error::{LicenseError, LicenseResult};
pub use key::{DEMO_KEY, KeyHash, LicenseKey, normalize};
pub use ledger::{FilePendingLedger, MemoryPendingLedger, PENDING_LEDGER_KEY, PendingLedger};
