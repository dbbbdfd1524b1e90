use crate::cart::{Cart, CartItem};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use pospro_types::SaleId;
use serde::{Deserialize, Serialize};

/// A completed checkout.
///
/// Lines hold the product as it was when sold, so later price edits do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub items: Vec<CartItem>,
    pub subtotal: f64,
    pub tax_amount: f64,
    /// Grand total including tax.
    pub total: f64,
    pub staff_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Sale {
    /// Checks out a cart, emptying it.
    ///
    /// A blank customer name is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCart`] if there is nothing to sell.
    pub fn checkout(
        cart: &mut Cart,
        tax_rate_percent: f64,
        staff_name: &str,
        customer_name: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        let summary = cart.summary(tax_rate_percent);
        Ok(Self {
            id: SaleId::new(),
            items: cart.take_items(),
            subtotal: summary.subtotal,
            tax_amount: summary.tax_amount,
            total: summary.total,
            staff_name: staff_name.to_string(),
            customer_name: customer_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            timestamp: Utc::now(),
        })
    }

    /// Purchase cost of the goods sold.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.items.iter().map(CartItem::line_cost).sum()
    }

    /// Grand total minus cost.
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.total - self.cost()
    }

    /// Units sold.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
