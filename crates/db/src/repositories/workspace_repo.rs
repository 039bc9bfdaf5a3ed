//! Repository for the `workspaces` and `workspace_members` tables.

use attic_core::types::DbId;
use sqlx::PgPool;

use crate::models::workspace::{Workspace, WorkspaceMember, WorkspaceWithRole};

/// Column list for workspaces queries.
const WORKSPACE_COLUMNS: &str = "id, name, created_by, created_at, updated_at";

/// Column list for workspace_members queries.
const MEMBER_COLUMNS: &str = "id, workspace_id, user_id, role, created_at, updated_at";

/// Provides operations for workspaces and their memberships.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Create a workspace and enroll the creator as its owner in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        created_by: DbId,
    ) -> Result<Workspace, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workspaces (name, created_by)
             VALUES ($1, $2)
             RETURNING {WORKSPACE_COLUMNS}"
        );
        let workspace = sqlx::query_as::<_, Workspace>(&query)
            .bind(name)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, role)
             VALUES ($1, $2, 'owner')",
        )
        .bind(workspace.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(workspace)
    }

    /// List the workspaces a user belongs to, with the user's role in each.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WorkspaceWithRole>, sqlx::Error> {
        sqlx::query_as::<_, WorkspaceWithRole>(
            "SELECT w.id, w.name, m.role
             FROM workspaces w
             JOIN workspace_members m ON m.workspace_id = w.id
             WHERE m.user_id = $1
             ORDER BY w.name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Look up a user's role in a workspace. `None` means not a member.
    pub async fn find_member_role(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT role FROM workspace_members WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(role,)| role))
    }

    /// Add a member to a workspace, returning the created membership row.
    pub async fn add_member(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<WorkspaceMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspace_members (workspace_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, WorkspaceMember>(&query)
            .bind(workspace_id)
            .bind(user_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// List all members of a workspace.
    pub async fn list_members(
        pool: &PgPool,
        workspace_id: DbId,
    ) -> Result<Vec<WorkspaceMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members
             WHERE workspace_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, WorkspaceMember>(&query)
            .bind(workspace_id)
            .fetch_all(pool)
            .await
    }
}
