//! Handler for the workspace activity feed (persisted bus events).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use attic_core::types::DbId;
use attic_db::models::event::EventRecord;
use attic_db::repositories::EventRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/workspaces/{workspace_id}/activity
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<EventRecord>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let events = EventRepo::list_for_workspace(&state.pool, workspace_id, limit).await?;
    Ok(Json(events))
}
