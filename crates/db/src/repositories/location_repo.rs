//! Repository for the `locations` table. See `item_repo` for why methods
//! take `&mut PgConnection`.

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list for locations queries.
const COLUMNS: &str =
    "id, workspace_id, name, description, parent_id, archived_at, created_at, updated_at";

/// Provides CRUD operations for locations. Delete is a soft archive.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (workspace_id, name, description, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.parent_id)
            .fetch_one(conn)
            .await
    }

    /// Find a live location by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live locations in a workspace, by name.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live location.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                parent_id = COALESCE($5, parent_id),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.parent_id)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live location. Returns false if it was already absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE locations SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
