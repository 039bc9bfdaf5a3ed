//! Handlers for the `/workspaces/{workspace_id}/borrowers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::borrower::{Borrower, CreateBorrower, UpdateBorrower};
use attic_db::repositories::BorrowerRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/borrowers
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<Borrower>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let borrowers = BorrowerRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(borrowers))
}

/// GET /api/v1/workspaces/{workspace_id}/borrowers/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Borrower>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let borrower = BorrowerRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Borrower",
            id,
        })?;
    Ok(Json(borrower))
}

/// POST /api/v1/workspaces/{workspace_id}/borrowers
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateBorrower>,
) -> AppResult<(StatusCode, Json<Borrower>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let borrower = BorrowerRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("borrower.created")
            .in_workspace(workspace_id)
            .for_entity("borrower", borrower.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(borrower)))
}

/// PUT /api/v1/workspaces/{workspace_id}/borrowers/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateBorrower>,
) -> AppResult<Json<Borrower>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let borrower = BorrowerRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Borrower",
            id,
        })?;

    state.event_bus.publish(
        LifecycleEvent::new("borrower.updated")
            .in_workspace(workspace_id)
            .for_entity("borrower", borrower.id)
            .by_user(user.user_id),
    );

    Ok(Json(borrower))
}

/// DELETE /api/v1/workspaces/{workspace_id}/borrowers/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = BorrowerRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound {
            entity: "Borrower",
            id,
        }
        .into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("borrower.archived")
            .in_workspace(workspace_id)
            .for_entity("borrower", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
