use crate::error::ValidationError;
use crate::product::Product;
use pospro_types::ProductId;
use serde::{Deserialize, Serialize};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

/// One line of a cart: a product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Selling price × quantity.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }

    /// Purchase price × quantity.
    #[must_use]
    pub fn line_cost(&self) -> f64 {
        self.product.purchase_price * f64::from(self.quantity)
    }
}

/// Money totals for a cart at a given tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// The checkout basket. Lines keep the order products were first added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit, extending an existing line for the same product.
    ///
    /// A line already at [`MAX_LINE_QUANTITY`] stays there.
    pub fn add(&mut self, product: Product) {
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1).min(MAX_LINE_QUANTITY),
            None => self.items.push(CartItem {
                product,
                quantity: 1,
            }),
        }
    }

    /// Adds `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuantity`] for zero, or when the
    /// line would exceed [`MAX_LINE_QUANTITY`]; the cart is unchanged.
    pub fn add_quantity(
        &mut self,
        product: Product,
        quantity: u32,
    ) -> Result<(), ValidationError> {
        let current = self
            .items
            .iter()
            .find(|i| i.product.id == product.id)
            .map_or(0, |i| i.quantity);
        let total = current
            .checked_add(quantity)
            .filter(|&q| quantity > 0 && q <= MAX_LINE_QUANTITY)
            .ok_or(ValidationError::InvalidQuantity(MAX_LINE_QUANTITY))?;
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity = total,
            None => self.items.push(CartItem {
                product,
                quantity: total,
            }),
        }
        Ok(())
    }

    /// Sets a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidQuantity`] above
    /// [`MAX_LINE_QUANTITY`]; the line is unchanged.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ValidationError> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(ValidationError::InvalidQuantity(MAX_LINE_QUANTITY));
        }
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Subtotal, tax at `tax_rate_percent` and grand total.
    #[must_use]
    pub fn summary(&self, tax_rate_percent: f64) -> CartSummary {
        let subtotal: f64 = self.items.iter().map(CartItem::line_total).sum();
        let tax_amount = subtotal * (tax_rate_percent / 100.0);
        CartSummary {
            subtotal,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }

    /// Hands the lines over, leaving the cart empty.
    pub fn take_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}
