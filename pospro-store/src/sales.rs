use crate::error::StoreResult;
use crate::store::{PosStore, id_col, json_col};
use chrono::{DateTime, SecondsFormat, Utc};
use pospro_model::{Cart, DateRange, Sale, SalesReport};
use pospro_types::BusinessId;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use tracing::info;

fn sale_from_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
    let timestamp: String = row.get(7)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(Sale {
        id: id_col(row, 0)?,
        items: json_col(row, 1)?,
        subtotal: row.get(2)?,
        tax_amount: row.get(3)?,
        total: row.get(4)?,
        staff_name: row.get(5)?,
        customer_name: row.get(6)?,
        timestamp,
    })
}

impl PosStore {
    /// Checks out a cart at the business's tax rate and records the sale.
    ///
    /// The cart is emptied once the sale is stored; on error it is untouched.
    pub fn checkout(
        &self,
        business_id: BusinessId,
        cart: &mut Cart,
        staff_name: &str,
        customer_name: Option<&str>,
    ) -> StoreResult<Sale> {
        let tax_rate = self.business_details(business_id)?.tax_rate;
        let sale = Sale::checkout(&mut cart.clone(), tax_rate, staff_name, customer_name)?;
        self.record_sale(business_id, &sale)?;
        cart.clear();
        Ok(sale)
    }

    /// Records a completed checkout.
    pub fn record_sale(&self, business_id: BusinessId, sale: &Sale) -> StoreResult<()> {
        let conn = self.lock();
        Self::insert_sale(&conn, business_id, sale)?;
        info!(sale_id = %sale.id, total = sale.total, "Sale recorded");
        Ok(())
    }

    pub(crate) fn insert_sale(
        conn: &Connection,
        business_id: BusinessId,
        sale: &Sale,
    ) -> StoreResult<()> {
        conn.execute(
            "INSERT INTO sales (id, business_id, items, subtotal, tax_amount, total, staff_name,
                customer_name, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                sale.id.to_string(),
                business_id.to_string(),
                serde_json::to_string(&sale.items)?,
                sale.subtotal,
                sale.tax_amount,
                sale.total,
                sale.staff_name,
                sale.customer_name,
                sale.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )?;
        Ok(())
    }

    /// All sales of a business, newest first.
    pub fn list_sales(&self, business_id: BusinessId) -> StoreResult<Vec<Sale>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, items, subtotal, tax_amount, total, staff_name, customer_name, timestamp
             FROM sales WHERE business_id = ?1 ORDER BY timestamp DESC",
        )?;
        let sales = stmt
            .query_map(params![business_id.to_string()], sale_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sales)
    }

    /// Totals over the sales in a range.
    pub fn sales_report(&self, business_id: BusinessId, range: DateRange) -> StoreResult<SalesReport> {
        Ok(SalesReport::build(&self.list_sales(business_id)?, range))
    }

    /// Deletes all sales history of a business. Returns the number removed.
    pub fn clear_sales(&self, business_id: BusinessId) -> StoreResult<usize> {
        let conn = self.lock();
        let removed = conn.execute(
            "DELETE FROM sales WHERE business_id = ?1",
            params![business_id.to_string()],
        )?;
        info!(business_id = %business_id, removed, "Sales history cleared");
        Ok(removed)
    }
}
