//! Workspace permission-context resolution.

use attic_core::context::PermissionContext;
use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::repositories::WorkspaceRepo;
use attic_db::DbPool;

use crate::error::AppError;

/// Resolve the caller's role in a workspace into a [`PermissionContext`].
///
/// Non-members are rejected with `Forbidden`; every workspace-scoped
/// handler and the gate middleware go through this single lookup.
pub async fn resolve_member_context(
    pool: &DbPool,
    user_id: DbId,
    workspace_id: DbId,
) -> Result<PermissionContext, AppError> {
    let role = WorkspaceRepo::find_member_role(pool, workspace_id, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden("Not a member of this workspace".into()))
        })?;
    Ok(PermissionContext::new(user_id, workspace_id, role))
}
