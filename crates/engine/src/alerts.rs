//! Alerting projection: low-stock and near-expiry views.
//!
//! Pure reads over the product store, computed on demand. Nothing here is
//! cached or persisted, and nothing here writes.

use chrono::{DateTime, Months, Utc};

use stockbook_core::LedgerError;
use stockbook_products::{Product, ProductStore, StoreError};

/// Default cap on each alert view.
pub const DEFAULT_ALERT_LIMIT: usize = 10;

/// Both alert views in one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryAlerts {
    pub low_stock: Vec<Product>,
    pub near_expiry: Vec<Product>,
}

/// On-demand alert views over the product store.
///
/// A product can appear in both views at once; discontinued products
/// appear in neither (their history stays in the ledger regardless).
#[derive(Debug)]
pub struct AlertsProjection<P> {
    products: P,
}

impl<P> AlertsProjection<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }
}

impl<P: ProductStore> AlertsProjection<P> {
    /// Products at or below their low-stock threshold, most critical first.
    pub fn low_stock(&self, limit: usize) -> Result<Vec<Product>, LedgerError> {
        let mut alerts: Vec<Product> = self
            .list()?
            .into_iter()
            .filter(|product| !product.discontinued && product.is_low_stock())
            .collect();

        alerts.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
        alerts.truncate(limit);
        Ok(alerts)
    }

    /// Products expiring within one year of `now`, soonest first.
    ///
    /// Already-expired products stay in the view: they need attention
    /// more, not less.
    pub fn near_expiry(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Product>, LedgerError> {
        let deadline = now
            .checked_add_months(Months::new(12))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut alerts: Vec<Product> = self
            .list()?
            .into_iter()
            .filter(|product| !product.discontinued && product.expires_by(deadline))
            .collect();

        alerts.sort_by(|a, b| {
            a.expiry_date
                .cmp(&b.expiry_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        alerts.truncate(limit);
        Ok(alerts)
    }

    /// Both views with the default cap.
    pub fn inventory_alerts(&self, now: DateTime<Utc>) -> Result<InventoryAlerts, LedgerError> {
        Ok(InventoryAlerts {
            low_stock: self.low_stock(DEFAULT_ALERT_LIMIT)?,
            near_expiry: self.near_expiry(now, DEFAULT_ALERT_LIMIT)?,
        })
    }

    fn list(&self) -> Result<Vec<Product>, LedgerError> {
        self.products.list().map_err(|err| match err {
            StoreError::Unavailable(msg) => LedgerError::unavailable(msg),
            other => LedgerError::unavailable(other.to_string()),
        })
    }
}
