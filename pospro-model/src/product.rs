use crate::error::ValidationError;
use pospro_types::ProductId;
use serde::{Deserialize, Serialize};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub urdu_name: String,
    /// Selling price.
    pub price: f64,
    /// Cost price, used for profit reporting.
    pub purchase_price: f64,
    pub category: String,
}

impl Product {
    /// Search as the POS screen does: case-insensitive on the English name
    /// and category, verbatim on the Urdu name. An empty query matches
    /// everything.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let lowered = query.to_lowercase();
        self.name.to_lowercase().contains(&lowered)
            || self.category.to_lowercase().contains(&lowered)
            || self.urdu_name.contains(query)
    }

    /// Category filter; `None` means all categories.
    #[must_use]
    pub fn in_category(&self, category: Option<&str>) -> bool {
        category.is_none_or(|c| self.category == c)
    }
}

/// A product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub urdu_name: String,
    pub price: f64,
    pub purchase_price: f64,
    pub category: String,
}

impl NewProduct {
    /// Requires a name, a category and a positive price.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::Missing("category"));
        }
        if self.price.is_nan() || self.price <= 0.0 {
            return Err(ValidationError::InvalidPrice);
        }
        Ok(())
    }

    /// Attaches an identifier.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            urdu_name: self.urdu_name,
            price: self.price,
            purchase_price: self.purchase_price,
            category: self.category,
        }
    }
}
