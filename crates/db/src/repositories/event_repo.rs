//! Repository for the append-only `events` table.

use attic_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::EventRecord;

/// Column list for events queries.
const COLUMNS: &str = "id, event_type, workspace_id, source_entity_type, source_entity_id, \
    actor_user_id, payload, created_at";

/// Provides insert/list operations for the activity log.
pub struct EventRepo;

impl EventRepo {
    /// Insert a single event row, returning its id.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        workspace_id: Option<DbId>,
        source_entity_type: Option<&str>,
        source_entity_id: Option<DbId>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        let row: (DbId,) = sqlx::query_as(
            "INSERT INTO events
                (event_type, workspace_id, source_entity_type, source_entity_id,
                 actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(event_type)
        .bind(workspace_id)
        .bind(source_entity_type)
        .bind(source_entity_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// List the most recent events for a workspace.
    pub async fn list_for_workspace(
        pool: &PgPool,
        workspace_id: DbId,
        limit: i64,
    ) -> Result<Vec<EventRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE workspace_id = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, EventRecord>(&query)
            .bind(workspace_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
