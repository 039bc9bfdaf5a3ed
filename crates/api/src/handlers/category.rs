//! Handlers for the `/workspaces/{workspace_id}/categories` resource.
//! Duplicate names surface as 409 via the unique constraint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::category::{Category, CreateCategory, UpdateCategory};
use attic_db::repositories::CategoryRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/categories
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<Category>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let categories = CategoryRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(categories))
}

/// GET /api/v1/workspaces/{workspace_id}/categories/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Category>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let category = CategoryRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Category",
            id,
        })?;
    Ok(Json(category))
}

/// POST /api/v1/workspaces/{workspace_id}/categories
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let category = CategoryRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("category.created")
            .in_workspace(workspace_id)
            .for_entity("category", category.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/workspaces/{workspace_id}/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateCategory>,
) -> AppResult<Json<Category>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let category = CategoryRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Category",
            id,
        })?;

    state.event_bus.publish(
        LifecycleEvent::new("category.updated")
            .in_workspace(workspace_id)
            .for_entity("category", category.id)
            .by_user(user.user_id),
    );

    Ok(Json(category))
}

/// DELETE /api/v1/workspaces/{workspace_id}/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = CategoryRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound {
            entity: "Category",
            id,
        }
        .into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("category.archived")
            .in_workspace(workspace_id)
            .for_entity("category", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
