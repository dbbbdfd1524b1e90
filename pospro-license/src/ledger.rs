//! Device-local storage for a license activated before any business exists.
//!
//! The ledger is a single slot. Writing replaces whatever was there; there is
//! no history. It lives on the device and is never synced.

use crate::error::LicenseResult;
use crate::key::KeyHash;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Name of the slot in the ledger document.
pub const PENDING_LEDGER_KEY: &str = "pending_license_hash";

/// Storage for at most one deferred key hash.
pub trait PendingLedger {
    /// Returns the pending hash without removing it.
    fn peek(&self) -> LicenseResult<Option<KeyHash>>;

    /// Stores a pending hash, replacing any previous one.
    fn put(&self, hash: KeyHash) -> LicenseResult<()>;

    /// Removes the pending hash, if any.
    fn clear(&self) -> LicenseResult<()>;

    /// Returns and removes the pending hash.
    fn take(&self) -> LicenseResult<Option<KeyHash>> {
        let pending = self.peek()?;
        if pending.is_some() {
            self.clear()?;
        }
        Ok(pending)
    }
}

impl<T: PendingLedger + ?Sized> PendingLedger for &T {
    fn peek(&self) -> LicenseResult<Option<KeyHash>> {
        (**self).peek()
    }

    fn put(&self, hash: KeyHash) -> LicenseResult<()> {
        (**self).put(hash)
    }

    fn clear(&self) -> LicenseResult<()> {
        (**self).clear()
    }
}

/// In-process ledger. Does not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryPendingLedger {
    slot: Mutex<Option<KeyHash>>,
}

impl MemoryPendingLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PendingLedger for MemoryPendingLedger {
    fn peek(&self) -> LicenseResult<Option<KeyHash>> {
        Ok(*self.slot.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn put(&self, hash: KeyHash) -> LicenseResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(hash);
        Ok(())
    }

    fn clear(&self) -> LicenseResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    fn take(&self) -> LicenseResult<Option<KeyHash>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).take())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(rename = "pending_license_hash")]
    pending: Option<KeyHash>,
}

/// Ledger persisted as a small JSON file, surviving restarts on this device.
///
/// A missing file is an empty slot.
#[derive(Debug, Clone)]
pub struct FilePendingLedger {
    path: PathBuf,
}

impl FilePendingLedger {
    /// Uses the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default ledger location under the platform's local data directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("pospro").join("pending_license.json"))
    }

    /// Opens the ledger at [`default_path`](Self::default_path).
    #[must_use]
    pub fn open_default() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, doc: &LedgerDocument) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(doc)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PendingLedger for FilePendingLedger {
    fn peek(&self) -> LicenseResult<Option<KeyHash>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc: LedgerDocument = serde_json::from_slice(&bytes)?;
        Ok(doc.pending)
    }

    fn put(&self, hash: KeyHash) -> LicenseResult<()> {
        debug!(path = %self.path.display(), %hash, "Writing pending license hash");
        self.write(&LedgerDocument {
            pending: Some(hash),
        })
    }

    fn clear(&self) -> LicenseResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
