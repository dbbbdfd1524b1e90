use crate::error::{StoreError, StoreResult};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Persistent store for one POS installation, backed by SQLite.
#[derive(Clone)]
pub struct PosStore {
    conn: Arc<Mutex<Connection>>,
}

impl PosStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::InvalidData(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        debug!(path = %path.display(), "Opening store");
        Self::init(Connection::open(path)?)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock();
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS businesses (
                id TEXT PRIMARY KEY,
                business_name TEXT NOT NULL,
                business_type TEXT NOT NULL,
                owner_name TEXT NOT NULL,
                email TEXT NOT NULL,
                mobile_number TEXT NOT NULL,
                passcode TEXT NOT NULL,
                display_language TEXT NOT NULL,
                logo_url TEXT NOT NULL DEFAULT '',
                receipt_footer TEXT NOT NULL DEFAULT '',
                tax_rate REAL NOT NULL DEFAULT 0,
                receipt_font_size TEXT NOT NULL,
                activated_license_key_hash INTEGER,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS owners (
                id TEXT PRIMARY KEY,
                business_id TEXT NOT NULL REFERENCES businesses(id),
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS staff_users (
                id TEXT PRIMARY KEY,
                business_id TEXT NOT NULL REFERENCES businesses(id),
                name TEXT NOT NULL,
                username TEXT NOT NULL,
                contact TEXT NOT NULL DEFAULT '',
                cnic TEXT NOT NULL DEFAULT '',
                can_access_admin_dashboard INTEGER NOT NULL DEFAULT 0,
                password_hash TEXT NOT NULL,
                UNIQUE(business_id, username)
            );

            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                business_id TEXT NOT NULL REFERENCES businesses(id),
                name TEXT NOT NULL,
                urdu_name TEXT NOT NULL DEFAULT '',
                price REAL NOT NULL,
                purchase_price REAL NOT NULL,
                category TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sales (
                id TEXT PRIMARY KEY,
                business_id TEXT NOT NULL REFERENCES businesses(id),
                items TEXT NOT NULL,
                subtotal REAL NOT NULL,
                tax_amount REAL NOT NULL,
                total REAL NOT NULL,
                staff_name TEXT NOT NULL,
                customer_name TEXT,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sales_business_ts ON sales(business_id, timestamp);

            CREATE TABLE IF NOT EXISTS session (
                slot INTEGER PRIMARY KEY CHECK (slot = 1),
                user TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true once setup has created a business.
    pub fn has_owner(&self) -> StoreResult<bool> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM businesses", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    pub(crate) fn first_business_id(conn: &Connection) -> StoreResult<Option<String>> {
        Ok(conn
            .query_row(
                "SELECT id FROM businesses ORDER BY created_at LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }
}

// ── Column helpers ───────────────────────────────────────────────

/// Stores a unit enum as its serde name.
pub(crate) fn enum_text<T: Serialize>(value: &T) -> StoreResult<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Err(StoreError::InvalidData(format!(
            "expected a unit variant, got {other}"
        ))),
    }
}

/// Reads a unit enum stored by [`enum_text`].
pub(crate) fn enum_col<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_value(serde_json::Value::String(text))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reads an identifier column.
pub(crate) fn id_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reads a JSON column.
pub(crate) fn json_col<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
