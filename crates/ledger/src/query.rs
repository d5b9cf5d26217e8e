//! Movement query interface: filtering, search, pagination.
//!
//! Read-side companion to [`crate::store::MovementLedger::find`]. All
//! queries are paginated by default and ordered newest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::ProductId;

use crate::movement::{Movement, MovementType};

/// Pagination parameters for movement queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of movements to return.
    pub limit: u32,
    /// Offset for pagination (0-based).
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 50, // Safe default
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(50).clamp(1, 1000), // Cap at 1000 for safety
            offset: offset.unwrap_or(0),
        }
    }
}

/// Filter criteria for movement queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementFilter {
    /// Filter by product (optional).
    pub product_id: Option<ProductId>,
    /// Filter by movement type (optional).
    pub movement_type: Option<MovementType>,
    /// Case-insensitive substring match over product name, user name,
    /// notes and the movement-type name (optional).
    pub search: Option<String>,
    /// Only movements dated at or after this time (optional).
    pub from: Option<DateTime<Utc>>,
    /// Only movements dated at or before this time (optional).
    pub to: Option<DateTime<Utc>>,
}

impl Default for MovementFilter {
    fn default() -> Self {
        Self {
            product_id: None,
            movement_type: None,
            search: None,
            from: None,
            to: None,
        }
    }
}

impl MovementFilter {
    /// Filter scoped to a single product.
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    /// Whether a movement satisfies every criterion.
    pub fn matches(&self, movement: &Movement) -> bool {
        if let Some(product_id) = self.product_id {
            if movement.product_id != product_id {
                return false;
            }
        }
        if let Some(movement_type) = self.movement_type {
            if movement.movement_type != movement_type {
                return false;
            }
        }
        if let Some(from) = self.from {
            if movement.movement_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if movement.movement_date > to {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() && !matches_search(movement, &needle) {
                return false;
            }
        }
        true
    }
}

fn matches_search(movement: &Movement, needle: &str) -> bool {
    movement.product_name.to_lowercase().contains(needle)
        || movement.user_name.to_lowercase().contains(needle)
        || movement.movement_type.as_str().contains(needle)
        || movement
            .notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

/// Paginated movement query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementPage {
    /// The movements on this page, newest first.
    pub movements: Vec<Movement>,
    /// Total number of movements matching the filter (across all pages).
    pub total: u64,
    /// Pagination parameters used.
    pub pagination: Pagination,
    /// Whether there are more movements available.
    pub has_more: bool,
}
