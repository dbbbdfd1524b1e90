//! License activation, entitlement queries and pending-license reconciliation.
//!
//! [`Entitlements`] ties together three collaborators: the allow-list, the
//! account store that persists the activated hash on a business record, and
//! the device-local [`PendingLedger`].
//!
//! Activation needs a signed-in owner to write to the business record. When
//! no owner is signed in (first run, before setup), an admitted key is parked
//! in the ledger instead and applied once the new owner logs in.

use crate::allow_list::AllowList;
use crate::error::{LicenseError, LicenseResult};
use crate::key::{KeyHash, LicenseKey};
use crate::ledger::PendingLedger;
use pospro_types::BusinessId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The account side of licensing: resolves the business and persists its
/// activated key hash.
///
/// Calls are blocking and are not retried.
pub trait AccountDirectory {
    /// The business of the signed-in owner, or `None` when nobody is signed in.
    fn current_account(&self) -> LicenseResult<Option<BusinessId>>;

    /// The business record of this installation, resolvable without a login.
    fn installed_account(&self) -> LicenseResult<Option<BusinessId>>;

    /// Overwrites the activated hash of a business.
    fn set_activated_hash(&self, account: BusinessId, hash: KeyHash) -> LicenseResult<()>;

    /// Reads the activated hash of a business.
    fn activated_hash(&self, account: BusinessId) -> LicenseResult<Option<KeyHash>>;
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for &T {
    fn current_account(&self) -> LicenseResult<Option<BusinessId>> {
        (**self).current_account()
    }

    fn installed_account(&self) -> LicenseResult<Option<BusinessId>> {
        (**self).installed_account()
    }

    fn set_activated_hash(&self, account: BusinessId, hash: KeyHash) -> LicenseResult<()> {
        (**self).set_activated_hash(account, hash)
    }

    fn activated_hash(&self, account: BusinessId) -> LicenseResult<Option<KeyHash>> {
        (**self).activated_hash(account)
    }
}

/// A successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The hash was written to the signed-in business.
    Applied { account: BusinessId, hash: KeyHash },
    /// No business was signed in; the hash was parked in the pending ledger.
    Deferred { hash: KeyHash },
}

impl Activation {
    /// The activated hash.
    #[must_use]
    pub fn hash(&self) -> KeyHash {
        match self {
            Self::Applied { hash, .. } | Self::Deferred { hash } => *hash,
        }
    }
}

/// What the host should tell the user once setup has created a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupNotice {
    /// A license is waiting; the owner must log in to finalize it.
    LoginRequired { hash: KeyHash },
    /// Nothing pending.
    NothingPending,
}

/// Outcome of applying the pending ledger after a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The pending hash was written to the business and the ledger cleared.
    Applied { account: BusinessId, hash: KeyHash },
    /// The ledger was empty.
    NothingPending,
    /// A hash is pending but nobody is signed in; the ledger is untouched.
    NoAccount,
}

/// The license entitlement subsystem.
pub struct Entitlements<D, L> {
    accounts: D,
    ledger: L,
    allow_list: Arc<AllowList>,
}

impl<D: AccountDirectory, L: PendingLedger> Entitlements<D, L> {
    /// Creates the subsystem over the builtin allow-list.
    pub fn new(accounts: D, ledger: L) -> Self {
        Self::with_allow_list(accounts, ledger, AllowList::builtin())
    }

    /// Creates the subsystem over a specific allow-list.
    pub fn with_allow_list(accounts: D, ledger: L, allow_list: Arc<AllowList>) -> Self {
        Self {
            accounts,
            ledger,
            allow_list,
        }
    }

    /// Returns the account store.
    pub fn accounts(&self) -> &D {
        &self.accounts
    }

    /// Returns the pending ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Returns the allow-list in use.
    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Activates a license key.
    ///
    /// The key is normalized and must be the trial key or hash onto the
    /// allow-list. With a signed-in owner the hash overwrites the business's
    /// activated hash; otherwise it overwrites the pending ledger slot.
    ///
    /// # Errors
    ///
    /// - [`LicenseError::EmptyKey`] / [`LicenseError::UnknownKey`] for
    ///   rejected keys, with no state change
    /// - any error from the account store or the ledger
    pub fn try_activate(&self, raw_key: &str) -> LicenseResult<Activation> {
        let key = LicenseKey::parse(raw_key)?;
        if !self.allow_list.admits(&key) {
            return Err(LicenseError::UnknownKey);
        }
        let hash = key.hash();

        match self.accounts.current_account()? {
            Some(account) => {
                self.accounts.set_activated_hash(account, hash)?;
                info!(business_id = %account, %hash, demo = key.is_demo(), "License activated");
                Ok(Activation::Applied { account, hash })
            }
            None => {
                self.ledger.put(hash)?;
                info!(%hash, "No owner signed in; license stored as pending");
                Ok(Activation::Deferred { hash })
            }
        }
    }

    /// Boolean form of [`try_activate`](Self::try_activate).
    ///
    /// `false` covers both rejected keys and storage failures; the latter are
    /// logged.
    pub fn activate_license(&self, raw_key: &str) -> bool {
        match self.try_activate(raw_key) {
            Ok(_) => true,
            Err(e) if e.is_invalid_key() => {
                debug!("License key rejected: {e}");
                false
            }
            Err(e) => {
                warn!("License activation failed: {e}");
                false
            }
        }
    }

    /// Returns true if this installation's business holds an activated hash
    /// that is on the allow-list.
    ///
    /// The allow-list is consulted again here, so a trial activation whose
    /// hash is not listed reports unlicensed.
    ///
    /// # Errors
    ///
    /// Propagates account store errors.
    pub fn try_is_licensed(&self) -> LicenseResult<bool> {
        let Some(account) = self.accounts.installed_account()? else {
            debug!("No business record; not licensed");
            return Ok(false);
        };
        let licensed = match self.accounts.activated_hash(account)? {
            Some(hash) => self.allow_list.contains(hash),
            None => false,
        };
        debug!(business_id = %account, licensed, "License check");
        Ok(licensed)
    }

    /// Boolean form of [`try_is_licensed`](Self::try_is_licensed); store
    /// errors report unlicensed.
    pub fn is_licensed(&self) -> bool {
        self.try_is_licensed().unwrap_or_else(|e| {
            warn!("License check failed: {e}");
            false
        })
    }

    /// Runs right after setup has created a business.
    ///
    /// The new owner is not signed in yet, so a pending hash cannot be written
    /// here. It stays in the ledger and the caller is told to ask for a login;
    /// [`reconcile_after_login`](Self::reconcile_after_login) finishes the job.
    ///
    /// # Errors
    ///
    /// Propagates ledger read errors.
    pub fn complete_setup(&self) -> LicenseResult<SetupNotice> {
        match self.ledger.peek()? {
            Some(hash) => {
                info!(%hash, "Pending license awaits owner login");
                Ok(SetupNotice::LoginRequired { hash })
            }
            None => Ok(SetupNotice::NothingPending),
        }
    }

    /// Applies a pending hash to the signed-in owner's business.
    ///
    /// The ledger is cleared only after the business record was written, so a
    /// failed write leaves the hash pending for the next login.
    ///
    /// # Errors
    ///
    /// Propagates account store and ledger errors.
    pub fn reconcile_after_login(&self) -> LicenseResult<Reconciliation> {
        let Some(hash) = self.ledger.peek()? else {
            return Ok(Reconciliation::NothingPending);
        };
        let Some(account) = self.accounts.current_account()? else {
            debug!(%hash, "Pending license kept; nobody signed in");
            return Ok(Reconciliation::NoAccount);
        };
        self.accounts.set_activated_hash(account, hash)?;
        self.ledger.clear()?;
        info!(business_id = %account, %hash, "Pending license applied");
        Ok(Reconciliation::Applied { account, hash })
    }
}
