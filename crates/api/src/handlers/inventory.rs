//! Handlers for the `/workspaces/{workspace_id}/inventory` resource
//! (stock-count entries).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::inventory::{CreateInventoryEntry, InventoryEntry, UpdateInventoryEntry};
use attic_db::repositories::InventoryRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/inventory
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<InventoryEntry>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let entries = InventoryRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(entries))
}

/// GET /api/v1/workspaces/{workspace_id}/inventory/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<InventoryEntry>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let entry = InventoryRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "InventoryEntry",
            id,
        })?;
    Ok(Json(entry))
}

/// POST /api/v1/workspaces/{workspace_id}/inventory
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateInventoryEntry>,
) -> AppResult<(StatusCode, Json<InventoryEntry>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let entry = InventoryRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("inventory.recorded")
            .in_workspace(workspace_id)
            .for_entity("inventory_entry", entry.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/v1/workspaces/{workspace_id}/inventory/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateInventoryEntry>,
) -> AppResult<Json<InventoryEntry>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let entry = InventoryRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "InventoryEntry",
            id,
        })?;

    state.event_bus.publish(
        LifecycleEvent::new("inventory.corrected")
            .in_workspace(workspace_id)
            .for_entity("inventory_entry", entry.id)
            .by_user(user.user_id),
    );

    Ok(Json(entry))
}

/// DELETE /api/v1/workspaces/{workspace_id}/inventory/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = InventoryRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound {
            entity: "InventoryEntry",
            id,
        }
        .into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("inventory.archived")
            .in_workspace(workspace_id)
            .for_entity("inventory_entry", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
