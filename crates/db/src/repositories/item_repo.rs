//! Repository for the `items` table.
//!
//! Methods take `&mut PgConnection` rather than a pool: the same code path
//! must run from a pooled connection (direct mutations) and from inside the
//! approve transaction (replayed mutations).

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list for items queries.
const COLUMNS: &str = "id, workspace_id, name, description, asset_tag, quantity, \
    purchase_price_cents, location_id, container_id, category_id, \
    archived_at, created_at, updated_at";

/// Provides CRUD operations for items. Delete is a soft archive.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (workspace_id, name, description, asset_tag, quantity,
                 purchase_price_cents, location_id, container_id, category_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1), $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.asset_tag)
            .bind(input.quantity)
            .bind(input.purchase_price_cents)
            .bind(input.location_id)
            .bind(input.container_id)
            .bind(input.category_id)
            .fetch_one(conn)
            .await
    }

    /// Find a live (non-archived) item by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live items in a workspace, newest first.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live item. Returns `None` if the
    /// item does not exist (or is archived) in this workspace.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                asset_tag = COALESCE($5, asset_tag),
                quantity = COALESCE($6, quantity),
                purchase_price_cents = COALESCE($7, purchase_price_cents),
                location_id = COALESCE($8, location_id),
                container_id = COALESCE($9, container_id),
                category_id = COALESCE($10, category_id),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.asset_tag)
            .bind(input.quantity)
            .bind(input.purchase_price_cents)
            .bind(input.location_id)
            .bind(input.container_id)
            .bind(input.category_id)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live item. Returns false if it was already absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
