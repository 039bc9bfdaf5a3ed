//! Repository for the `pending_changes` table.
//!
//! This is the sole owner of pending-change persistence. Lifecycle fields
//! are only ever written through [`PendingChangeRepo::mark_approved`] and
//! [`PendingChangeRepo::mark_rejected`], both of which run inside a review
//! transaction that first takes the row lock via
//! [`PendingChangeRepo::lock_for_review`].

use attic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::pending_change::{
    CreatePendingChange, PendingChange, PendingChangePage, PendingChangeQuery,
};

/// Column list for pending_changes queries.
const COLUMNS: &str = "id, workspace_id, requester_id, entity_type, entity_id, action, \
    payload, status, reviewer_id, reviewed_at, rejection_reason, applied_entity_id, \
    created_at, updated_at";

/// Default page size for listings.
const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
const MAX_LIMIT: i64 = 200;

/// Provides persistence for pending changes.
pub struct PendingChangeRepo;

impl PendingChangeRepo {
    /// Insert a new proposal with status `pending`, returning the row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePendingChange,
    ) -> Result<PendingChange, sqlx::Error> {
        let query = format!(
            "INSERT INTO pending_changes
                (workspace_id, requester_id, entity_type, entity_id, action, payload)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(input.workspace_id)
            .bind(input.requester_id)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.action)
            .bind(&input.payload)
            .fetch_one(pool)
            .await
    }

    /// Find a pending change by id within a workspace.
    pub async fn find_by_id(
        pool: &PgPool,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<PendingChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_changes WHERE id = $1 AND workspace_id = $2"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }

    /// List pending changes in a workspace with optional status /
    /// entity-type / requester filters, newest first, paginated.
    pub async fn list(
        pool: &PgPool,
        workspace_id: DbId,
        query: &PendingChangeQuery,
        requester_id: Option<DbId>,
    ) -> Result<PendingChangePage, sqlx::Error> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = query.offset.unwrap_or(0).max(0);

        const FILTER: &str = "workspace_id = $1
            AND ($2::text IS NULL OR status = $2)
            AND ($3::text IS NULL OR entity_type = $3)
            AND ($4::bigint IS NULL OR requester_id = $4)";

        let total: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM pending_changes WHERE {FILTER}"
        ))
        .bind(workspace_id)
        .bind(&query.status)
        .bind(&query.entity_type)
        .bind(requester_id)
        .fetch_one(pool)
        .await?;

        let items = sqlx::query_as::<_, PendingChange>(&format!(
            "SELECT {COLUMNS} FROM pending_changes WHERE {FILTER}
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6"
        ))
        .bind(workspace_id)
        .bind(&query.status)
        .bind(&query.entity_type)
        .bind(requester_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(PendingChangePage {
            items,
            total: total.0,
        })
    }

    /// Load a row with `SELECT ... FOR UPDATE` inside a review transaction.
    ///
    /// The row lock is the serialization point for concurrent reviews: of
    /// two simultaneous approve calls, one blocks here until the other
    /// commits, then observes the terminal status and fails.
    pub async fn lock_for_review(
        conn: &mut PgConnection,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<PendingChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pending_changes
             WHERE id = $1 AND workspace_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(conn)
            .await
    }

    /// Transition a locked `pending` row to `approved`.
    pub async fn mark_approved(
        conn: &mut PgConnection,
        id: DbId,
        reviewer_id: DbId,
        applied_entity_id: Option<DbId>,
    ) -> Result<PendingChange, sqlx::Error> {
        let query = format!(
            "UPDATE pending_changes SET
                status = 'approved',
                reviewer_id = $2,
                reviewed_at = now(),
                applied_entity_id = COALESCE($3, applied_entity_id),
                updated_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(id)
            .bind(reviewer_id)
            .bind(applied_entity_id)
            .fetch_one(conn)
            .await
    }

    /// Transition a locked `pending` row to `rejected` with a reason.
    pub async fn mark_rejected(
        conn: &mut PgConnection,
        id: DbId,
        reviewer_id: DbId,
        reason: Option<&str>,
    ) -> Result<PendingChange, sqlx::Error> {
        let query = format!(
            "UPDATE pending_changes SET
                status = 'rejected',
                reviewer_id = $2,
                reviewed_at = now(),
                rejection_reason = $3,
                updated_at = now()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PendingChange>(&query)
            .bind(id)
            .bind(reviewer_id)
            .bind(reason)
            .fetch_one(conn)
            .await
    }
}
