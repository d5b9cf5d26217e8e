//! Product model: the current-state stock row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::ProductId;

/// A product as the ledger engine sees it.
///
/// This is the denormalized summary row: `stock` is the live quantity and
/// must always match what replaying the product's ledger history yields.
/// Catalog concerns (pricing, descriptions, suppliers) live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Live stock level. Never negative.
    pub stock: i64,
    /// Stock at or below this level triggers the low-stock alert.
    pub low_stock_threshold: i64,
    pub expiry_date: DateTime<Utc>,
    /// Discontinued products keep their history but drop out of alerts.
    pub discontinued: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        stock: i64,
        low_stock_threshold: i64,
        expiry_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            stock,
            low_stock_threshold,
            expiry_date,
            discontinued: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Low-stock alert predicate (inclusive threshold).
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// Whether the product expires on or before `deadline`.
    pub fn expires_by(&self, deadline: DateTime<Utc>) -> bool {
        self.expiry_date <= deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(stock: i64, threshold: i64) -> Product {
        Product::new(
            ProductId::new(),
            "Insulin pens",
            stock,
            threshold,
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        assert!(product(5, 5).is_low_stock());
        assert!(product(0, 5).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
    }

    #[test]
    fn expiry_deadline_is_inclusive() {
        let p = product(10, 5);
        assert!(p.expires_by(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        assert!(p.expires_by(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()));
        assert!(!p.expires_by(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap()));
    }
}
