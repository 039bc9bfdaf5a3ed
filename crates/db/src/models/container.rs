//! Container entity model and DTOs (boxes, bins, cases).

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `containers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Container {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub location_id: Option<DbId>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a container.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContainer {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub location_id: Option<DbId>,
}

/// DTO for updating a container.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContainer {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub location_id: Option<DbId>,
}
