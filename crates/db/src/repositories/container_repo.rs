//! Repository for the `containers` table.

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::container::{Container, CreateContainer, UpdateContainer};

/// Column list for containers queries.
const COLUMNS: &str =
    "id, workspace_id, name, description, location_id, archived_at, created_at, updated_at";

/// Provides CRUD operations for containers. Delete is a soft archive.
pub struct ContainerRepo;

impl ContainerRepo {
    /// Insert a new container, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateContainer,
    ) -> Result<Container, sqlx::Error> {
        let query = format!(
            "INSERT INTO containers (workspace_id, name, description, location_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Container>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.location_id)
            .fetch_one(conn)
            .await
    }

    /// Find a live container by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Container>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM containers
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, Container>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live containers in a workspace, by name.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<Container>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM containers
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Container>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live container.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateContainer,
    ) -> Result<Option<Container>, sqlx::Error> {
        let query = format!(
            "UPDATE containers SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                location_id = COALESCE($5, location_id),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Container>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.location_id)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live container. Returns false if it was already absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE containers SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
