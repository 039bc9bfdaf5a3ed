//! Handlers for the `/workspaces/{workspace_id}/items` resource.
//!
//! Mutation handlers here are the direct (bypassing-tier) write path; the
//! gate middleware intercepts member-tier requests before they arrive.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::item::{CreateItem, Item, UpdateItem};
use attic_db::repositories::ItemRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/items
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<Item>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let items = ItemRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(items))
}

/// GET /api/v1/workspaces/{workspace_id}/items/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Item>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let item = ItemRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Item", id })?;
    Ok(Json(item))
}

/// POST /api/v1/workspaces/{workspace_id}/items
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let item = ItemRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("item.created")
            .in_workspace(workspace_id)
            .for_entity("item", item.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/workspaces/{workspace_id}/items/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let item = ItemRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound { entity: "Item", id })?;

    state.event_bus.publish(
        LifecycleEvent::new("item.updated")
            .in_workspace(workspace_id)
            .for_entity("item", item.id)
            .by_user(user.user_id),
    );

    Ok(Json(item))
}

/// DELETE /api/v1/workspaces/{workspace_id}/items/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = ItemRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound { entity: "Item", id }.into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("item.archived")
            .in_workspace(workspace_id)
            .for_entity("item", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
