//! Owner setup, login sessions and staff accounts.
//!
//! Passwords are stored as Argon2id PHC strings. The recovery passcode stays
//! in clear on the business record, since recovery compares it verbatim.

use crate::error::{StoreError, StoreResult};
use crate::store::{PosStore, enum_text, id_col, json_col};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use pospro_model::{
    BusinessDetails, MIN_PASSWORD_LEN, NewStaff, OwnerSetup, SessionUser, StaffMember,
    StaffPermissions, ValidationError,
};
use pospro_types::{BusinessId, OwnerId, ProductId, StaffId};
use rand::RngCore;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

const SALT_LEN: usize = 16;

fn hash_password(password: &str) -> StoreResult<String> {
    let mut bytes = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let salt = SaltString::encode_b64(&bytes).map_err(|e| StoreError::Credentials(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::Credentials(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Unreadable password hash: {e}");
            false
        }
    }
}

fn staff_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        id: id_col(row, 0)?,
        business_id: id_col(row, 1)?,
        name: row.get(2)?,
        username: row.get(3)?,
        contact: row.get(4)?,
        cnic: row.get(5)?,
        permissions: StaffPermissions {
            can_access_admin_dashboard: row.get(6)?,
        },
    })
}

const STAFF_COLUMNS: &str =
    "id, business_id, name, username, contact, cnic, can_access_admin_dashboard";

impl PosStore {
    /// Creates the owner, the business record and the starter catalog.
    ///
    /// Does not sign the owner in.
    pub fn setup_owner(&self, setup: &OwnerSetup) -> StoreResult<BusinessId> {
        setup.validate()?;
        let password_hash = hash_password(&setup.password)?;

        let mut conn = self.lock();
        if Self::first_business_id(&conn)?.is_some() {
            return Err(StoreError::AlreadySetUp);
        }

        let business_id = BusinessId::new();
        let details = BusinessDetails::from_setup(business_id, setup);
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO businesses (id, business_name, business_type, owner_name, email,
                mobile_number, passcode, display_language, logo_url, receipt_footer,
                tax_rate, receipt_font_size, activated_license_key_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, ?13)",
            params![
                details.id.to_string(),
                details.business_name,
                enum_text(&details.business_type)?,
                details.owner_name,
                details.email,
                details.mobile_number,
                details.passcode,
                enum_text(&details.display_language)?,
                details.logo_url,
                details.receipt_footer,
                details.tax_rate,
                enum_text(&details.receipt_font_size)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        tx.execute(
            "INSERT INTO owners (id, business_id, email, password_hash) VALUES (?1, ?2, ?3, ?4)",
            params![
                OwnerId::new().to_string(),
                business_id.to_string(),
                details.email,
                password_hash,
            ],
        )?;
        for product in details.business_type.sample_products() {
            Self::insert_product(&tx, business_id, &product.with_id(ProductId::new()))?;
        }
        tx.commit()?;

        info!(business_id = %business_id, business_type = ?details.business_type, "Owner set up");
        Ok(business_id)
    }

    /// Signs in by owner email or staff username.
    ///
    /// Owners are matched first, by case-insensitive email. Returns `None`
    /// for unknown names and wrong passwords alike. A successful login
    /// replaces any previous session.
    pub fn login(&self, credential: &str, password: &str) -> StoreResult<Option<SessionUser>> {
        let credential = credential.trim();
        let conn = self.lock();

        let user = match Self::owner_login(&conn, credential, password)? {
            Some(owner) => Some(owner),
            None => Self::staff_login(&conn, credential, password)?,
        };

        match &user {
            Some(user) => {
                Self::save_session(&conn, user)?;
                info!(role = ?user.role(), business_id = %user.business_id(), "Signed in");
            }
            None => debug!("Login rejected"),
        }
        Ok(user)
    }

    fn owner_login(
        conn: &Connection,
        email: &str,
        password: &str,
    ) -> StoreResult<Option<SessionUser>> {
        let row = conn
            .query_row(
                "SELECT o.id, o.business_id, b.owner_name, o.email, o.password_hash
                 FROM owners o JOIN businesses b ON b.id = o.business_id
                 WHERE o.email = ?1",
                params![email.to_lowercase()],
                |row| {
                    Ok((
                        SessionUser::Owner {
                            id: id_col(row, 0)?,
                            business_id: id_col(row, 1)?,
                            name: row.get(2)?,
                            email: row.get(3)?,
                        },
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;
        Ok(row.and_then(|(user, stored)| verify_password(password, &stored).then_some(user)))
    }

    fn staff_login(
        conn: &Connection,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<SessionUser>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS}, password_hash FROM staff_users WHERE username = ?1"
        ))?;
        let candidates = stmt
            .query_map(params![username], |row| {
                Ok((staff_from_row(row)?, row.get::<_, String>(7)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(candidates
            .into_iter()
            .find(|(_, stored)| verify_password(password, stored))
            .map(|(staff, _)| SessionUser::Staff {
                id: staff.id,
                business_id: staff.business_id,
                name: staff.name,
                username: staff.username,
                permissions: staff.permissions,
            }))
    }

    fn save_session(conn: &Connection, user: &SessionUser) -> StoreResult<()> {
        conn.execute(
            "INSERT INTO session (slot, user) VALUES (1, ?1)
             ON CONFLICT(slot) DO UPDATE SET user = excluded.user",
            params![serde_json::to_string(user)?],
        )?;
        Ok(())
    }

    /// Clears the session when it belongs to a staff member `stale` matches.
    pub(crate) fn end_staff_session(
        conn: &Connection,
        stale: impl Fn(StaffId, BusinessId) -> bool,
    ) -> StoreResult<()> {
        let user: Option<SessionUser> = conn
            .query_row("SELECT user FROM session WHERE slot = 1", [], |row| {
                json_col(row, 0)
            })
            .optional()?;
        if let Some(SessionUser::Staff {
            id, business_id, ..
        }) = user
            && stale(id, business_id)
        {
            conn.execute("DELETE FROM session WHERE slot = 1", [])?;
            info!(staff_id = %id, "Signed out removed staff member");
        }
        Ok(())
    }

    /// Ends the current session, if any.
    pub fn logout(&self) -> StoreResult<()> {
        let conn = self.lock();
        if conn.execute("DELETE FROM session", [])? > 0 {
            info!("Signed out");
        }
        Ok(())
    }

    /// The signed-in user on this device.
    pub fn current_user(&self) -> StoreResult<Option<SessionUser>> {
        let conn = self.lock();
        Ok(conn
            .query_row("SELECT user FROM session WHERE slot = 1", [], |row| {
                json_col(row, 0)
            })
            .optional()?)
    }

    /// Owner recovery: returns the owner's name and login email when the
    /// mobile number and passcode both match.
    pub fn recover_owner(
        &self,
        mobile_number: &str,
        passcode: &str,
    ) -> StoreResult<Option<(String, String)>> {
        let conn = self.lock();
        let found = conn
            .query_row(
                "SELECT owner_name, email FROM businesses
                 WHERE mobile_number = ?1 AND passcode = ?2",
                params![mobile_number.trim(), passcode.trim()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        if found.is_none() {
            debug!("Owner recovery did not match");
        }
        Ok(found)
    }

    // ── Staff ────────────────────────────────────────────────────

    /// Staff of a business, by name.
    pub fn list_staff(&self, business_id: BusinessId) -> StoreResult<Vec<StaffMember>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff_users WHERE business_id = ?1 ORDER BY name"
        ))?;
        let staff = stmt
            .query_map(params![business_id.to_string()], staff_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(staff)
    }

    /// Adds a staff login. Usernames are unique within a business.
    pub fn add_staff(&self, business_id: BusinessId, staff: &NewStaff) -> StoreResult<StaffMember> {
        let username = staff.username.trim();
        if staff.name.trim().is_empty() {
            return Err(ValidationError::Missing("name").into());
        }
        if username.is_empty() {
            return Err(ValidationError::Missing("username").into());
        }
        if staff.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN).into());
        }
        let password_hash = hash_password(&staff.password)?;

        let conn = self.lock();
        let taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM staff_users WHERE business_id = ?1 AND username = ?2)",
            params![business_id.to_string(), username],
            |row| row.get(0),
        )?;
        if taken {
            return Err(StoreError::Duplicate(username.to_string()));
        }

        let member = StaffMember {
            id: StaffId::new(),
            business_id,
            name: staff.name.trim().to_string(),
            username: username.to_string(),
            contact: staff.contact.clone(),
            cnic: staff.cnic.clone(),
            permissions: staff.permissions,
        };
        conn.execute(
            "INSERT INTO staff_users (id, business_id, name, username, contact, cnic,
                can_access_admin_dashboard, password_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                member.id.to_string(),
                business_id.to_string(),
                member.name,
                member.username,
                member.contact,
                member.cnic,
                member.permissions.can_access_admin_dashboard,
                password_hash,
            ],
        )?;
        info!(staff_id = %member.id, username = %member.username, "Staff added");
        Ok(member)
    }

    /// Updates a staff record; a `Some` password also resets the login.
    pub fn update_staff(&self, member: &StaffMember, password: Option<&str>) -> StoreResult<()> {
        if password.is_some_and(|p| p.chars().count() < MIN_PASSWORD_LEN) {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN).into());
        }
        let password_hash = password.map(hash_password).transpose()?;
        let conn = self.lock();
        let changed = conn.execute(
            "UPDATE staff_users SET name = ?2, contact = ?3, cnic = ?4,
                can_access_admin_dashboard = ?5,
                password_hash = COALESCE(?6, password_hash)
             WHERE id = ?1",
            params![
                member.id.to_string(),
                member.name,
                member.contact,
                member.cnic,
                member.permissions.can_access_admin_dashboard,
                password_hash,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("staff {}", member.id)));
        }
        Ok(())
    }

    /// Removes a staff login and signs that member out if they are the
    /// current session.
    pub fn delete_staff(&self, id: StaffId) -> StoreResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        if tx.execute("DELETE FROM staff_users WHERE id = ?1", params![id.to_string()])? == 0 {
            return Err(StoreError::NotFound(format!("staff {id}")));
        }
        Self::end_staff_session(&tx, |staff, _| staff == id)?;
        tx.commit()?;
        info!(staff_id = %id, "Staff removed");
        Ok(())
    }
}
