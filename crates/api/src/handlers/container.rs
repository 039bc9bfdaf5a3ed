//! Handlers for the `/workspaces/{workspace_id}/containers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::container::{Container, CreateContainer, UpdateContainer};
use attic_db::repositories::ContainerRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/containers
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<Container>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let containers = ContainerRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(containers))
}

/// GET /api/v1/workspaces/{workspace_id}/containers/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Container>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let container = ContainerRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Container",
            id,
        })?;
    Ok(Json(container))
}

/// POST /api/v1/workspaces/{workspace_id}/containers
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateContainer>,
) -> AppResult<(StatusCode, Json<Container>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let container = ContainerRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("container.created")
            .in_workspace(workspace_id)
            .for_entity("container", container.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(container)))
}

/// PUT /api/v1/workspaces/{workspace_id}/containers/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateContainer>,
) -> AppResult<Json<Container>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let container = ContainerRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Container",
            id,
        })?;

    state.event_bus.publish(
        LifecycleEvent::new("container.updated")
            .in_workspace(workspace_id)
            .for_entity("container", container.id)
            .by_user(user.user_id),
    );

    Ok(Json(container))
}

/// DELETE /api/v1/workspaces/{workspace_id}/containers/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = ContainerRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound {
            entity: "Container",
            id,
        }
        .into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("container.archived")
            .in_workspace(workspace_id)
            .for_entity("container", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
