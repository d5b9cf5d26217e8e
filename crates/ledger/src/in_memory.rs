use std::collections::HashMap;
use std::sync::RwLock;

use stockbook_core::{LedgerError, MovementId, ProductId};

use crate::movement::{Movement, NewMovement};
use crate::query::{MovementFilter, MovementPage, Pagination};
use crate::store::MovementLedger;

/// In-memory append-only movement ledger.
///
/// Intended for tests/dev and as the reference semantics for persistent
/// backends. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementLedger {
    inner: RwLock<Streams>,
}

#[derive(Debug, Default)]
struct Streams {
    by_product: HashMap<ProductId, Vec<Movement>>,
    // MovementId -> (product, position in its stream)
    index: HashMap<MovementId, (ProductId, usize)>,
}

impl InMemoryMovementLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovementLedger for InMemoryMovementLedger {
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError> {
        movement.validate()?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::unavailable("ledger lock poisoned"))?;
        let Streams { by_product, index } = &mut *inner;

        let stream = by_product.entry(movement.product_id).or_default();
        let sequence = stream.len() as u64 + 1;

        let stored = Movement {
            id: MovementId::new(),
            sequence,
            product_id: movement.product_id,
            product_name: movement.product_name,
            movement_type: movement.movement_type,
            quantity: movement.quantity,
            stock_before: movement.stock_before,
            stock_after: movement.stock_after,
            movement_date: movement.movement_date,
            user_id: movement.user_id,
            user_name: movement.user_name,
            batch_expiry_date: movement.batch_expiry_date,
            notes: movement.notes,
            related_order_id: movement.related_order_id,
            is_reverted: false,
            reverted_from_id: movement.reverted_from_id,
        };

        index.insert(stored.id, (stored.product_id, stream.len()));
        stream.push(stored.clone());

        tracing::debug!(
            "appended {} movement {} for product {} (seq {})",
            stored.movement_type,
            stored.id,
            stored.product_id,
            stored.sequence
        );

        Ok(stored)
    }

    fn get(&self, id: MovementId) -> Result<Movement, LedgerError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::unavailable("ledger lock poisoned"))?;

        inner
            .index
            .get(&id)
            .and_then(|(product_id, position)| inner.by_product.get(product_id)?.get(*position))
            .cloned()
            .ok_or_else(|| LedgerError::not_found(format!("movement {id}")))
    }

    fn find(
        &self,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> Result<MovementPage, LedgerError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::unavailable("ledger lock poisoned"))?;

        let mut matched: Vec<&Movement> = inner
            .by_product
            .values()
            .flatten()
            .filter(|movement| filter.matches(movement))
            .collect();

        // Newest first; sequence breaks ties within a product.
        matched.sort_by(|a, b| {
            b.movement_date
                .cmp(&a.movement_date)
                .then(b.sequence.cmp(&a.sequence))
        });

        let total = matched.len() as u64;
        let movements: Vec<Movement> = matched
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect();
        let consumed = pagination.offset as u64 + movements.len() as u64;
        let has_more = consumed < total;

        Ok(MovementPage {
            movements,
            total,
            pagination,
            has_more,
        })
    }

    fn mark_reverted(&self, id: MovementId) -> Result<Movement, LedgerError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::unavailable("ledger lock poisoned"))?;
        let Streams { by_product, index } = &mut *inner;

        let (product_id, position) = index
            .get(&id)
            .copied()
            .ok_or_else(|| LedgerError::not_found(format!("movement {id}")))?;
        let movement = by_product
            .get_mut(&product_id)
            .and_then(|stream| stream.get_mut(position))
            .ok_or_else(|| LedgerError::not_found(format!("movement {id}")))?;

        if movement.is_reverted {
            return Err(LedgerError::already_reverted(id.to_string()));
        }
        movement.is_reverted = true;

        tracing::debug!("movement {id} marked reverted");

        Ok(movement.clone())
    }

    fn history(&self, product_id: ProductId) -> Result<Vec<Movement>, LedgerError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::unavailable("ledger lock poisoned"))?;

        Ok(inner.by_product.get(&product_id).cloned().unwrap_or_default())
    }
}
