//! Backup export/import and application reset.

use crate::error::{StoreError, StoreResult};
use crate::store::PosStore;
use pospro_model::{BusinessDetails, BusinessSettings, Product, Sale, StaffMember};
use pospro_types::{BusinessId, ProductId, SaleId};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const SECTIONS: [&str; 4] = ["products", "staff", "sales", "details"];

/// A full backup of one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub products: Vec<Product>,
    /// Exported for reference only; staff are never imported.
    pub staff: Vec<StaffMember>,
    pub sales: Vec<Sale>,
    pub details: BusinessDetails,
}

impl PosStore {
    /// Snapshot of a business's data.
    pub fn backup(&self, business_id: BusinessId) -> StoreResult<Backup> {
        Ok(Backup {
            products: self.list_products(business_id)?,
            staff: self.list_staff(business_id)?,
            sales: self.list_sales(business_id)?,
            details: self.business_details(business_id)?,
        })
    }

    /// Pretty-printed JSON backup.
    pub fn export_data(&self, business_id: BusinessId) -> StoreResult<String> {
        let json = serde_json::to_string_pretty(&self.backup(business_id)?)?;
        info!(business_id = %business_id, bytes = json.len(), "Data exported");
        Ok(json)
    }

    /// Restores a JSON backup into a business.
    ///
    /// Products and sales are replaced and receive fresh identifiers.
    /// Business settings are taken from the backup, except for the email,
    /// the recovery passcode and the activated license hash, which keep
    /// their current values. Staff are not imported and existing staff stay.
    /// Nothing is changed unless the whole backup is readable.
    pub fn import_data(&self, business_id: BusinessId, json: &str) -> StoreResult<()> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(missing) = SECTIONS
            .iter()
            .find(|key| value.get(**key).is_none_or(serde_json::Value::is_null))
        {
            return Err(StoreError::InvalidData(format!(
                "invalid backup file format: missing \"{missing}\""
            )));
        }
        let backup: Backup = serde_json::from_value(value)?;

        let mut conn = self.lock();
        let mut details = Self::load_details(&conn, business_id)?;
        let imported = &backup.details;
        details.apply(&BusinessSettings {
            business_name: Some(imported.business_name.clone()),
            mobile_number: Some(imported.mobile_number.clone()),
            display_language: Some(imported.display_language),
            logo_url: Some(imported.logo_url.clone()),
            receipt_footer: Some(imported.receipt_footer.clone()),
            tax_rate: Some(imported.tax_rate),
            receipt_font_size: Some(imported.receipt_font_size),
        })?;
        details.owner_name = imported.owner_name.clone();

        let tx = conn.transaction()?;
        let id = business_id.to_string();
        tx.execute("DELETE FROM sales WHERE business_id = ?1", params![id])?;
        tx.execute("DELETE FROM products WHERE business_id = ?1", params![id])?;
        for product in &backup.products {
            let product = Product {
                id: ProductId::new(),
                ..product.clone()
            };
            Self::insert_product(&tx, business_id, &product)?;
        }
        for sale in &backup.sales {
            let sale = Sale {
                id: SaleId::new(),
                ..sale.clone()
            };
            Self::insert_sale(&tx, business_id, &sale)?;
        }
        Self::write_settings(&tx, &details)?;
        tx.commit()?;

        if !backup.staff.is_empty() {
            warn!(
                skipped = backup.staff.len(),
                "Staff accounts are not imported; recreate them with new passwords"
            );
        }
        info!(
            business_id = %business_id,
            products = backup.products.len(),
            sales = backup.sales.len(),
            "Data imported"
        );
        Ok(())
    }

    /// Deletes sales, products and staff. The business record, the owner
    /// login and the activated license stay.
    pub fn reset_application(&self, business_id: BusinessId) -> StoreResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let id = business_id.to_string();
        tx.execute("DELETE FROM sales WHERE business_id = ?1", params![id])?;
        tx.execute("DELETE FROM products WHERE business_id = ?1", params![id])?;
        tx.execute("DELETE FROM staff_users WHERE business_id = ?1", params![id])?;
        PosStore::end_staff_session(&tx, |_, business| business == business_id)?;
        tx.commit()?;
        info!(business_id = %business_id, "Application data reset");
        Ok(())
    }
}
