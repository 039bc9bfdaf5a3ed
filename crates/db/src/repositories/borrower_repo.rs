//! Repository for the `borrowers` table.

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::borrower::{Borrower, CreateBorrower, UpdateBorrower};

/// Column list for borrowers queries.
const COLUMNS: &str = "id, workspace_id, name, email, phone, archived_at, created_at, updated_at";

/// Provides CRUD operations for borrowers. Delete is a soft archive.
pub struct BorrowerRepo;

impl BorrowerRepo {
    /// Insert a new borrower, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateBorrower,
    ) -> Result<Borrower, sqlx::Error> {
        let query = format!(
            "INSERT INTO borrowers (workspace_id, name, email, phone)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Borrower>(&query)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(conn)
            .await
    }

    /// Find a live borrower by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Borrower>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM borrowers
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, Borrower>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live borrowers in a workspace, by name.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<Borrower>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM borrowers
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Borrower>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live borrower.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateBorrower,
    ) -> Result<Option<Borrower>, sqlx::Error> {
        let query = format!(
            "UPDATE borrowers SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Borrower>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live borrower. Returns false if it was already absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE borrowers SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
