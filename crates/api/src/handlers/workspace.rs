//! Handlers for `/workspaces`: tenant creation and membership management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use attic_core::error::CoreError;
use attic_core::roles::{validate_role, ROLE_ADMIN, ROLE_OWNER};
use attic_core::types::DbId;
use attic_db::models::workspace::{AddMember, CreateWorkspace, Workspace, WorkspaceMember, WorkspaceWithRole};
use attic_db::repositories::{UserRepo, WorkspaceRepo};
use attic_events::LifecycleEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::check_payload;
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// POST /api/v1/workspaces
///
/// Create a workspace; the caller becomes its owner.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateWorkspace>,
) -> AppResult<(StatusCode, Json<Workspace>)> {
    check_payload(&body)?;

    let workspace = WorkspaceRepo::create(&state.pool, &body.name, user.user_id).await?;

    state.event_bus.publish(
        LifecycleEvent::new("workspace.created")
            .in_workspace(workspace.id)
            .for_entity("workspace", workspace.id)
            .by_user(user.user_id),
    );

    Ok((StatusCode::CREATED, Json(workspace)))
}

/// GET /api/v1/workspaces
///
/// List the workspaces the caller belongs to.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<WorkspaceWithRole>>> {
    let workspaces = WorkspaceRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(workspaces))
}

/// GET /api/v1/workspaces/{workspace_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<Vec<WorkspaceMember>>> {
    resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    let members = WorkspaceRepo::list_members(&state.pool, workspace_id).await?;
    Ok(Json(members))
}

/// POST /api/v1/workspaces/{workspace_id}/members
///
/// Add a user to the workspace. Owner/admin only; nobody can grant the
/// `owner` role after creation.
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(body): Json<AddMember>,
) -> AppResult<(StatusCode, Json<WorkspaceMember>)> {
    let ctx = resolve_member_context(&state.pool, user.user_id, workspace_id).await?;
    if ctx.role != ROLE_OWNER && ctx.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Owner or admin role required to manage members".into(),
        )));
    }

    validate_role(&body.role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if body.role == ROLE_OWNER {
        return Err(AppError::Core(CoreError::Validation(
            "The owner role is assigned at workspace creation only".into(),
        )));
    }

    // Reject unknown users up front for a clean 404 instead of an FK error.
    UserRepo::find_by_id(&state.pool, body.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: body.user_id,
        })?;

    let member =
        WorkspaceRepo::add_member(&state.pool, workspace_id, body.user_id, &body.role).await?;

    state.event_bus.publish(
        LifecycleEvent::new("workspace.member_added")
            .in_workspace(workspace_id)
            .for_entity("workspace_member", member.id)
            .by_user(user.user_id)
            .with_details(serde_json::json!({ "role": member.role })),
    );

    Ok((StatusCode::CREATED, Json(member)))
}
