//! Products and the business record.

use crate::error::{StoreError, StoreResult};
use crate::store::{PosStore, enum_col, enum_text, id_col};
use pospro_model::{BusinessDetails, BusinessSettings, NewProduct, Product};
use pospro_types::{BusinessId, ProductId};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: id_col(row, 0)?,
        name: row.get(1)?,
        urdu_name: row.get(2)?,
        price: row.get(3)?,
        purchase_price: row.get(4)?,
        category: row.get(5)?,
    })
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<BusinessDetails> {
    Ok(BusinessDetails {
        id: id_col(row, 0)?,
        business_name: row.get(1)?,
        business_type: enum_col(row, 2)?,
        owner_name: row.get(3)?,
        email: row.get(4)?,
        mobile_number: row.get(5)?,
        passcode: row.get(6)?,
        display_language: enum_col(row, 7)?,
        logo_url: row.get(8)?,
        receipt_footer: row.get(9)?,
        tax_rate: row.get(10)?,
        receipt_font_size: enum_col(row, 11)?,
        activated_license_key_hash: row.get(12)?,
    })
}

impl PosStore {
    /// The business's catalog, ordered by category then name.
    pub fn list_products(&self, business_id: BusinessId) -> StoreResult<Vec<Product>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, urdu_name, price, purchase_price, category FROM products
             WHERE business_id = ?1 ORDER BY category, name",
        )?;
        let products = stmt
            .query_map(params![business_id.to_string()], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Loads one product.
    pub fn get_product(&self, id: ProductId) -> StoreResult<Product> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, name, urdu_name, price, purchase_price, category FROM products
             WHERE id = ?1",
            params![id.to_string()],
            product_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("product {id}")))
    }

    /// Validates and stores a new product.
    pub fn add_product(&self, business_id: BusinessId, product: NewProduct) -> StoreResult<Product> {
        product.validate()?;
        let product = product.with_id(ProductId::new());
        let conn = self.lock();
        Self::insert_product(&conn, business_id, &product)?;
        info!(product_id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    pub(crate) fn insert_product(
        conn: &Connection,
        business_id: BusinessId,
        product: &Product,
    ) -> StoreResult<()> {
        conn.execute(
            "INSERT INTO products (id, business_id, name, urdu_name, price, purchase_price, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                product.id.to_string(),
                business_id.to_string(),
                product.name,
                product.urdu_name,
                product.price,
                product.purchase_price,
                product.category,
            ],
        )?;
        Ok(())
    }

    /// Replaces a product's fields.
    pub fn update_product(&self, product: &Product) -> StoreResult<()> {
        NewProduct {
            name: product.name.clone(),
            urdu_name: product.urdu_name.clone(),
            price: product.price,
            purchase_price: product.purchase_price,
            category: product.category.clone(),
        }
        .validate()?;

        let conn = self.lock();
        let changed = conn.execute(
            "UPDATE products SET name = ?2, urdu_name = ?3, price = ?4, purchase_price = ?5,
                category = ?6
             WHERE id = ?1",
            params![
                product.id.to_string(),
                product.name,
                product.urdu_name,
                product.price,
                product.purchase_price,
                product.category,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("product {}", product.id)));
        }
        debug!(product_id = %product.id, "Product updated");
        Ok(())
    }

    /// Removes a product. Past sales keep their snapshot of it.
    pub fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        let conn = self.lock();
        if conn.execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])? == 0 {
            return Err(StoreError::NotFound(format!("product {id}")));
        }
        info!(product_id = %id, "Product removed");
        Ok(())
    }

    // ── Business record ──────────────────────────────────────────

    /// The full business record.
    pub fn business_details(&self, business_id: BusinessId) -> StoreResult<BusinessDetails> {
        let conn = self.lock();
        Self::load_details(&conn, business_id)
    }

    pub(crate) fn load_details(
        conn: &Connection,
        business_id: BusinessId,
    ) -> StoreResult<BusinessDetails> {
        conn.query_row(
            "SELECT id, business_name, business_type, owner_name, email, mobile_number, passcode,
                display_language, logo_url, receipt_footer, tax_rate, receipt_font_size,
                activated_license_key_hash
             FROM businesses WHERE id = ?1",
            params![business_id.to_string()],
            details_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("business {business_id}")))
    }

    /// Applies an owner's settings edit and returns the updated record.
    pub fn update_business_settings(
        &self,
        business_id: BusinessId,
        settings: &BusinessSettings,
    ) -> StoreResult<BusinessDetails> {
        let conn = self.lock();
        let mut details = Self::load_details(&conn, business_id)?;
        details.apply(settings)?;
        Self::write_settings(&conn, &details)?;
        info!(business_id = %business_id, "Business settings updated");
        Ok(details)
    }

    /// Writes the owner-editable columns. Identity, credentials and the
    /// license hash are left alone.
    pub(crate) fn write_settings(conn: &Connection, details: &BusinessDetails) -> StoreResult<()> {
        conn.execute(
            "UPDATE businesses SET business_name = ?2, owner_name = ?3, mobile_number = ?4,
                display_language = ?5, logo_url = ?6, receipt_footer = ?7, tax_rate = ?8,
                receipt_font_size = ?9
             WHERE id = ?1",
            params![
                details.id.to_string(),
                details.business_name,
                details.owner_name,
                details.mobile_number,
                enum_text(&details.display_language)?,
                details.logo_url,
                details.receipt_footer,
                details.tax_rate,
                enum_text(&details.receipt_font_size)?,
            ],
        )?;
        Ok(())
    }
}
