//! Handlers for the `/workspaces/{workspace_id}/loans` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::loan::{CreateLoan, Loan, UpdateLoan};
use attic_db::repositories::LoanRepo;
use attic_events::LifecycleEvent;

use crate::error::AppResult;
use crate::handlers::{check_payload, require_direct_mutator};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// GET /api/v1/workspaces/{workspace_id}/loans
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<Loan>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let loans = LoanRepo::list(&mut conn, workspace_id).await?;
    Ok(Json(loans))
}

/// GET /api/v1/workspaces/{workspace_id}/loans/{id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Loan>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let mut conn = state.pool.acquire().await?;
    let loan = LoanRepo::find_by_id(&mut conn, workspace_id, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Loan", id })?;
    Ok(Json(loan))
}

/// POST /api/v1/workspaces/{workspace_id}/loans
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let loan = LoanRepo::create(&mut conn, workspace_id, &body).await?;

    state.event_bus.publish(
        LifecycleEvent::new("loan.created")
            .in_workspace(workspace_id)
            .for_entity("loan", loan.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(loan)))
}

/// PUT /api/v1/workspaces/{workspace_id}/loans/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateLoan>,
) -> AppResult<Json<Loan>> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;
    check_payload(&body)?;

    let mut conn = state.pool.acquire().await?;
    let loan = LoanRepo::update(&mut conn, workspace_id, id, &body)
        .await?
        .ok_or(CoreError::NotFound { entity: "Loan", id })?;

    state.event_bus.publish(
        LifecycleEvent::new("loan.updated")
            .in_workspace(workspace_id)
            .for_entity("loan", loan.id)
            .by_user(user.user_id),
    );

    Ok(Json(loan))
}

/// DELETE /api/v1/workspaces/{workspace_id}/loans/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    require_direct_mutator(&ctx)?;

    let mut conn = state.pool.acquire().await?;
    let archived = LoanRepo::archive(&mut conn, workspace_id, id).await?;
    if !archived {
        return Err(CoreError::NotFound { entity: "Loan", id }.into());
    }

    state.event_bus.publish(
        LifecycleEvent::new("loan.archived")
            .in_workspace(workspace_id)
            .for_entity("loan", id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
