use crate::sale::Sale;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive day range. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// True if the instant's UTC day lies within the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

/// Totals over the sales in a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    /// Matching sales, newest first.
    pub sales: Vec<Sale>,
    /// Sum of grand totals.
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub transaction_count: usize,
}

impl SalesReport {
    #[must_use]
    pub fn build(sales: &[Sale], range: DateRange) -> Self {
        let mut matching: Vec<Sale> = sales
            .iter()
            .filter(|s| range.contains(s.timestamp))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total_revenue: f64 = matching.iter().map(|s| s.total).sum();
        let total_cost: f64 = matching.iter().map(Sale::cost).sum();
        Self {
            transaction_count: matching.len(),
            sales: matching,
            total_revenue,
            total_cost,
            total_profit: total_revenue - total_cost,
        }
    }
}
