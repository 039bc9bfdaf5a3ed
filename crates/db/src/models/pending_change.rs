//! Pending change entity model and DTOs.
//!
//! The payload column is the audit record of *what was requested*, never of
//! what was eventually applied, and is immutable once stored.

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `pending_changes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingChange {
    pub id: DbId,
    pub workspace_id: DbId,
    pub requester_id: DbId,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub action: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub reviewer_id: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    /// Backfilled with the new entity id after an approved create.
    /// Best-effort completeness, not required for correctness.
    pub applied_entity_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new pending change.
#[derive(Debug, Clone)]
pub struct CreatePendingChange {
    pub workspace_id: DbId,
    pub requester_id: DbId,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub action: String,
    pub payload: serde_json::Value,
}

/// Filter parameters for listing pending changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingChangeQuery {
    pub status: Option<String>,
    pub entity_type: Option<String>,
    /// When true, only rows whose requester is the caller.
    pub mine: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for pending change listings.
#[derive(Debug, Clone, Serialize)]
pub struct PendingChangePage {
    pub items: Vec<PendingChange>,
    pub total: i64,
}
