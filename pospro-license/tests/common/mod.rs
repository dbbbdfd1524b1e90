//! Shared test helpers for license tests.

#![allow(dead_code)]

use pospro_license::{AccountDirectory, KeyHash, LicenseError, LicenseResult};
use pospro_types::BusinessId;
use std::collections::HashMap;
use std::sync::Mutex;

/// Keys whose hashes are on the builtin allow-list.
pub const VALID_KEY: &str = "POSPRO-ANWUZJE";
pub const VALID_KEY_HASH: i32 = 1904797046;
pub const OTHER_VALID_KEY: &str = "POSPRO-ANWZXXE";
pub const OTHER_VALID_KEY_HASH: i32 = 1904944513;

/// Hash of the trial key. Not on the builtin allow-list.
pub const DEMO_KEY_HASH: i32 = -588170170;

#[derive(Default)]
struct State {
    installed: Option<BusinessId>,
    signed_in: bool,
    hashes: HashMap<BusinessId, KeyHash>,
    fail_writes: bool,
    fail_reads: bool,
}

/// In-memory account store with switchable failure modes.
#[derive(Default)]
pub struct FakeAccounts {
    state: Mutex<State>,
}

impl FakeAccounts {
    /// No business has been set up.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A business exists but nobody is signed in.
    pub fn installed() -> (Self, BusinessId) {
        let accounts = Self::default();
        let id = BusinessId::new();
        accounts.state.lock().unwrap().installed = Some(id);
        (accounts, id)
    }

    /// A business exists and its owner is signed in.
    pub fn signed_in() -> (Self, BusinessId) {
        let (accounts, id) = Self::installed();
        accounts.sign_in();
        (accounts, id)
    }

    /// Creates the business, as setup does.
    pub fn create_business(&self) -> BusinessId {
        let id = BusinessId::new();
        self.state.lock().unwrap().installed = Some(id);
        id
    }

    pub fn sign_in(&self) {
        self.state.lock().unwrap().signed_in = true;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn stored_hash(&self, id: BusinessId) -> Option<i32> {
        self.state.lock().unwrap().hashes.get(&id).map(|h| h.value())
    }

    pub fn store_hash(&self, id: BusinessId, hash: i32) {
        self.state
            .lock()
            .unwrap()
            .hashes
            .insert(id, KeyHash::from_raw(hash));
    }
}

impl AccountDirectory for FakeAccounts {
    fn current_account(&self) -> LicenseResult<Option<BusinessId>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(LicenseError::Storage("read failed".into()));
        }
        Ok(if state.signed_in { state.installed } else { None })
    }

    fn installed_account(&self) -> LicenseResult<Option<BusinessId>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(LicenseError::Storage("read failed".into()));
        }
        Ok(state.installed)
    }

    fn set_activated_hash(&self, account: BusinessId, hash: KeyHash) -> LicenseResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(LicenseError::Storage("write failed".into()));
        }
        state.hashes.insert(account, hash);
        Ok(())
    }

    fn activated_hash(&self, account: BusinessId) -> LicenseResult<Option<KeyHash>> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(LicenseError::Storage("read failed".into()));
        }
        Ok(state.hashes.get(&account).copied())
    }
}
