//! Item entity model and DTOs. Items are the central inventory record and
//! may reference a location, container, and category in the same workspace.

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub asset_tag: Option<String>,
    pub quantity: i32,
    pub purchase_price_cents: Option<i64>,
    pub location_id: Option<DbId>,
    pub container_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub asset_tag: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub purchase_price_cents: Option<i64>,
    pub location_id: Option<DbId>,
    pub container_id: Option<DbId>,
    pub category_id: Option<DbId>,
}

/// DTO for updating an item. Only the provided fields are merged onto the
/// current row.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub asset_tag: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub purchase_price_cents: Option<i64>,
    pub location_id: Option<DbId>,
    pub container_id: Option<DbId>,
    pub category_id: Option<DbId>,
}
