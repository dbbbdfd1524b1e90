//! License persistence on the business record.

use crate::error::StoreError;
use crate::store::PosStore;
use pospro_license::{AccountDirectory, KeyHash, LicenseResult};
use pospro_model::SessionUser;
use pospro_types::BusinessId;
use rusqlite::{OptionalExtension, params};

impl AccountDirectory for PosStore {
    /// Only an owner session can activate; staff sessions count as nobody.
    fn current_account(&self) -> LicenseResult<Option<BusinessId>> {
        Ok(match self.current_user()? {
            Some(SessionUser::Owner { business_id, .. }) => Some(business_id),
            _ => None,
        })
    }

    fn installed_account(&self) -> LicenseResult<Option<BusinessId>> {
        let conn = self.lock();
        let Some(id) = Self::first_business_id(&conn)? else {
            return Ok(None);
        };
        let id = id
            .parse()
            .map_err(|e| StoreError::InvalidData(format!("business id {id}: {e}")))?;
        Ok(Some(id))
    }

    fn set_activated_hash(&self, account: BusinessId, hash: KeyHash) -> LicenseResult<()> {
        let conn = self.lock();
        let changed = conn
            .execute(
                "UPDATE businesses SET activated_license_key_hash = ?2 WHERE id = ?1",
                params![account.to_string(), hash.value()],
            )
            .map_err(StoreError::from)?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("business {account}")).into());
        }
        Ok(())
    }

    fn activated_hash(&self, account: BusinessId) -> LicenseResult<Option<KeyHash>> {
        let conn = self.lock();
        let stored: Option<Option<i32>> = conn
            .query_row(
                "SELECT activated_license_key_hash FROM businesses WHERE id = ?1",
                params![account.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;
        match stored {
            Some(hash) => Ok(hash.map(KeyHash::from_raw)),
            None => Err(StoreError::NotFound(format!("business {account}")).into()),
        }
    }
}
