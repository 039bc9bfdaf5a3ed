//! Inventory (stock-count) entry model and DTOs.

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `inventory_entries` table: one counted quantity for an
/// item at a point in time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryEntry {
    pub id: DbId,
    pub workspace_id: DbId,
    pub item_id: DbId,
    pub quantity: i32,
    pub note: Option<String>,
    pub counted_at: Timestamp,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an inventory entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryEntry {
    pub item_id: DbId,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity: i32,
    pub note: Option<String>,
}

/// DTO for correcting an inventory entry.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInventoryEntry {
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity: Option<i32>,
    pub note: Option<String>,
}
