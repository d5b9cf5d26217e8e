use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use stockbook_core::ProductId;

use crate::product::Product;
use crate::store::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("product lock poisoned".to_string()))?;

        rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn update_stock(
        &self,
        id: ProductId,
        expected_stock: i64,
        new_stock: i64,
    ) -> Result<Product, StoreError> {
        if new_stock < 0 {
            return Err(StoreError::InvalidWrite(format!(
                "stock must not be negative, got {new_stock}"
            )));
        }

        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("product lock poisoned".to_string()))?;
        let product = rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        if product.stock != expected_stock {
            return Err(StoreError::Conflict {
                expected: expected_stock,
                actual: product.stock,
            });
        }

        product.stock = new_stock;
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("product lock poisoned".to_string()))?;

        Ok(rows.values().cloned().collect())
    }

    fn upsert(&self, product: Product) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("product lock poisoned".to_string()))?;

        rows.insert(product.id, product);
        Ok(())
    }
}
