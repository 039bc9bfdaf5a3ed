//! Repository for the `loans` table.

use attic_core::types::DbId;
use sqlx::PgConnection;

use crate::models::loan::{CreateLoan, Loan, UpdateLoan};

/// Column list for loans queries.
const COLUMNS: &str = "id, workspace_id, item_id, borrower_id, loaned_at, due_at, \
    returned_at, notes, archived_at, created_at, updated_at";

/// Provides CRUD operations for loans. Delete is a soft archive.
pub struct LoanRepo;

impl LoanRepo {
    /// Insert a new loan, returning the created row. `loaned_at` defaults
    /// to the insertion time.
    pub async fn create(
        conn: &mut PgConnection,
        workspace_id: DbId,
        input: &CreateLoan,
    ) -> Result<Loan, sqlx::Error> {
        let query = format!(
            "INSERT INTO loans (workspace_id, item_id, borrower_id, due_at, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Loan>(&query)
            .bind(workspace_id)
            .bind(input.item_id)
            .bind(input.borrower_id)
            .bind(input.due_at)
            .bind(&input.notes)
            .fetch_one(conn)
            .await
    }

    /// Find a live loan by id within a workspace.
    pub async fn find_by_id(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Loan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM loans
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL"
        );
        sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// List all live loans in a workspace, most recent first.
    pub async fn list(
        conn: &mut PgConnection,
        workspace_id: DbId,
    ) -> Result<Vec<Loan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM loans
             WHERE workspace_id = $1 AND archived_at IS NULL
             ORDER BY loaned_at DESC"
        );
        sqlx::query_as::<_, Loan>(&query)
            .bind(workspace_id)
            .fetch_all(conn)
            .await
    }

    /// Merge the provided fields onto a live loan.
    pub async fn update(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
        input: &UpdateLoan,
    ) -> Result<Option<Loan>, sqlx::Error> {
        let query = format!(
            "UPDATE loans SET
                due_at = COALESCE($3, due_at),
                returned_at = COALESCE($4, returned_at),
                notes = COALESCE($5, notes),
                updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(input.due_at)
            .bind(input.returned_at)
            .bind(&input.notes)
            .fetch_optional(conn)
            .await
    }

    /// Soft-archive a live loan. Returns false if it was already absent.
    pub async fn archive(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE loans SET archived_at = now(), updated_at = now()
             WHERE id = $1 AND workspace_id = $2 AND archived_at IS NULL",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
