//! Repository for the `inventory_entries` table.

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::inventory::{CreateInventoryEntry, InventoryEntry, UpdateInventoryEntry};

/// Column list for inventory_entries queries.
const COLUMNS: &str = "id, workspace_id, item_id, quantity, note, counted_at, \
    archived_at, created_at, updated_at";

/// Provides CRUD operations for inventory entries. Delete is a soft archive.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Insert a new inventory entry, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateInventoryEntry,
    ) -> Result<InventoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_entries (workspace_id, item_id, quantity, note)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(workspace_id)
            .bind(input.item_id)
            .bind(input.quantity)
            .bind(&input.note)
            .fetch_one(conn)
            .await
    }

    /// Find a live inventory entry by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_entries
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live inventory entries in a workspace, newest count first.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_entries
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY counted_at DESC"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live inventory entry.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateInventoryEntry,
    ) -> Result<Option<InventoryEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE inventory_entries SET
                quantity = COALESCE($3, quantity),
                note = COALESCE($4, note),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryEntry>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(input.quantity)
            .bind(&input.note)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live inventory entry. Returns false if it was already
    /// absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inventory_entries SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
