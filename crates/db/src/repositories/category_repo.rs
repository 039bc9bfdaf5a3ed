//! Repository for the `categories` table. Names are unique per workspace
//! (constraint `uq_categories_workspace_name`).

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list for categories queries.
const COLUMNS: &str = "id, workspace_id, name, color, archived_at, created_at, updated_at";

/// Provides CRUD operations for categories. Delete is a soft archive.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (workspace_id, name, color)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_one(conn)
            .await
    }

    /// Find a live category by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live categories in a workspace, by name.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live category.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($3, name),
                color = COALESCE($4, color),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.color)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live category. Returns false if it was already absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
