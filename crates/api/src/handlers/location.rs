//! Handlers for the `/workspaces/{workspace_id}/locations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::location::{CreateLocation, Location, UpdateLocation};
use attic_db::repositories::LocationRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/locations
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<Location>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let locations = LocationRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(locations))
}

/// GET /api/v1/workspaces/{workspace_id}/locations/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Location>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let location = LocationRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Location",
            id,
        })?;
    Ok(Json(location))
}

/// POST /api/v1/workspaces/{workspace_id}/locations
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let location = LocationRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("location.created")
            .in_workspace(workspace_id)
            .for_entity("location", location.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(location)))
}

/// PUT /api/v1/workspaces/{workspace_id}/locations/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateLocation>,
) -> AppResult<Json<Location>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let location = LocationRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Location",
            id,
        })?;

    state.event_bus.publish(
        LifecycleEvent::new("location.updated")
            .in_workspace(workspace_id)
            .for_entity("location", location.id)
            .by_user(user.user_id),
    );

    Ok(Json(location))
}

/// DELETE /api/v1/workspaces/{workspace_id}/locations/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = LocationRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound {
            entity: "Location",
            id,
        }
        .into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("location.archived")
            .in_workspace(workspace_id)
            .for_entity("location", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
