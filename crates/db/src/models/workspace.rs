//! Workspace (tenant) and membership entity models and DTOs.

use attic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `workspaces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workspace {
    pub id: DbId,
    pub name: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `workspace_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceMember {
    pub id: DbId,
    pub workspace_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A workspace joined with the caller's role in it, for "my workspaces"
/// listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceWithRole {
    pub id: DbId,
    pub name: String,
    pub role: String,
}

/// DTO for creating a workspace. The creator becomes its owner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkspace {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
}

/// DTO for adding a member to a workspace.
#[derive(Debug, Clone, Deserialize)]
pub struct AddMember {
    pub user_id: DbId,
    pub role: String,
}
