//! Handlers for the `/workspaces/{workspace_id}/pending-changes` resource:
//! review-queue listing and the approve/reject transitions.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::pending_change::{PendingChange, PendingChangePage, PendingChangeQuery};
use attic_db::repositories::PendingChangeRepo;
use attic_pipeline::ReviewEngine;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// Request body for the reject endpoint.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// GET /api/v1/workspaces/{workspace_id}/pending-changes
///
/// Paginated listing, filterable by `status`, `entity_type`, and
/// `mine=true` (rows the caller submitted). Any workspace member may list.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Query(query): Query<PendingChangeQuery>,
) -> AppResult<Json<PendingChangePage>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;

    let requester_filter = if query.mine.unwrap_or(false) {
        Some(ctx.user_id)
    } else {
        None
    };

    let page = PendingChangeRepo::list(&state.pool, workspace_id, &query, requester_filter).await?;
    Ok(Json(page))
}

/// GET /api/v1/workspaces/{workspace_id}/pending-changes/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<PendingChange>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;

    let row = PendingChangeRepo::find_by_id(&state.pool, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "PendingChange",
            id,
        })?;
    Ok(Json(row))
}

/// POST /api/v1/workspaces/{workspace_id}/pending-changes/{id}/approve
///
/// Apply the proposal and flip the row to `approved` in one transaction.
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<PendingChange>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let updated =
        ReviewEngine::approve(&state.pool, &state.registry, &state.event_bus, &ctx, id).await?;
    Ok(Json(updated))
}

/// POST /api/v1/workspaces/{workspace_id}/pending-changes/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<RejectRequest>,
) -> AppResult<Json<PendingChange>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let updated = ReviewEngine::reject(
        &state.pool,
        &state.event_bus,
        &ctx,
        id,
        body.reason.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}
