//! The review engine: `pending -> approved | rejected` transitions.
//!
//! Approve runs the apply step and the status flip in one transaction, so
//! an `approved` row whose effect was never materialized cannot exist.
//! The `SELECT ... FOR UPDATE` in [`PendingChangeRepo::lock_for_review`]
//! serializes concurrent reviews of the same row: the second caller
//! observes a terminal status and fails with a conflict.

use attic_core::change::{ChangeAction, STATUS_PENDING};
use attic_core::context::PermissionContext;
use attic_core::entity::EntityType;
use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::pending_change::PendingChange;
use attic_db::repositories::PendingChangeRepo;
use attic_db::DbPool;
use attic_events::{EventBus, LifecycleEvent};

use crate::registry::EntityRegistry;

/// Executes approve/reject transitions with authorization, idempotency,
/// and atomic apply.
pub struct ReviewEngine;

impl ReviewEngine {
    /// Approve a pending change and apply its proposal.
    ///
    /// On any apply failure the transaction rolls back, the row stays
    /// `pending`, and the failure is returned to the reviewer.
    pub async fn approve(
        pool: &DbPool,
        registry: &EntityRegistry,
        bus: &EventBus,
        ctx: &PermissionContext,
        change_id: DbId,
    ) -> Result<PendingChange, CoreError> {
        Self::require_reviewer(ctx)?;

        let mut tx = pool.begin().await.map_err(db_internal)?;

        let row = PendingChangeRepo::lock_for_review(&mut tx, ctx.workspace_id, change_id)
            .await
            .map_err(db_internal)?
            .ok_or(CoreError::NotFound {
                entity: "PendingChange",
                id: change_id,
            })?;

        Self::require_pending(&row)?;

        let (entity_type, action) = Self::decode_row(&row)?;
        let applier = registry.applier_for(entity_type).ok_or_else(|| {
            CoreError::Internal(format!("No applier registered for '{entity_type}'"))
        })?;

        let applied_entity_id = match action {
            ChangeAction::Create => {
                Some(applier.apply_create(&mut tx, row.workspace_id, &row.payload).await?)
            }
            ChangeAction::Update => {
                let entity_id = Self::require_target(&row)?;
                applier
                    .apply_update(&mut tx, row.workspace_id, entity_id, &row.payload)
                    .await?;
                None
            }
            ChangeAction::Delete => {
                let entity_id = Self::require_target(&row)?;
                applier
                    .apply_delete(&mut tx, row.workspace_id, entity_id)
                    .await?;
                None
            }
        };

        let updated =
            PendingChangeRepo::mark_approved(&mut tx, change_id, ctx.user_id, applied_entity_id)
                .await
                .map_err(db_internal)?;

        tx.commit().await.map_err(db_internal)?;

        tracing::info!(
            change_id,
            workspace_id = ctx.workspace_id,
            reviewer_id = ctx.user_id,
            entity_type = %entity_type,
            action = %action,
            "Pending change approved and applied"
        );

        bus.publish(
            LifecycleEvent::new("change.approved")
                .in_workspace(ctx.workspace_id)
                .for_entity("pending_change", change_id)
                .by_user(ctx.user_id)
                .with_details(serde_json::json!({
                    "entity_type": entity_type.as_str(),
                    "action": action.as_str(),
                    "applied_entity_id": updated.applied_entity_id.or(updated.entity_id),
                })),
        );

        Ok(updated)
    }

    /// Reject a pending change with a reason. Domain state is untouched.
    pub async fn reject(
        pool: &DbPool,
        bus: &EventBus,
        ctx: &PermissionContext,
        change_id: DbId,
        reason: Option<&str>,
    ) -> Result<PendingChange, CoreError> {
        Self::require_reviewer(ctx)?;

        let mut tx = pool.begin().await.map_err(db_internal)?;

        let row = PendingChangeRepo::lock_for_review(&mut tx, ctx.workspace_id, change_id)
            .await
            .map_err(db_internal)?
            .ok_or(CoreError::NotFound {
                entity: "PendingChange",
                id: change_id,
            })?;

        Self::require_pending(&row)?;

        let updated = PendingChangeRepo::mark_rejected(&mut tx, change_id, ctx.user_id, reason)
            .await
            .map_err(db_internal)?;

        tx.commit().await.map_err(db_internal)?;

        tracing::info!(
            change_id,
            workspace_id = ctx.workspace_id,
            reviewer_id = ctx.user_id,
            "Pending change rejected"
        );

        bus.publish(
            LifecycleEvent::new("change.rejected")
                .in_workspace(ctx.workspace_id)
                .for_entity("pending_change", change_id)
                .by_user(ctx.user_id)
                .with_details(serde_json::json!({ "reason": reason })),
        );

        Ok(updated)
    }

    fn require_reviewer(ctx: &PermissionContext) -> Result<(), CoreError> {
        if ctx.can_review() {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Owner or admin role required to review changes".to_string(),
            ))
        }
    }

    /// A terminal row admits no further transition: re-review is a
    /// conflict, not a no-op, so the reviewer is never misled into
    /// believing a second action had effect.
    fn require_pending(row: &PendingChange) -> Result<(), CoreError> {
        if row.status == STATUS_PENDING {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Change {} is already {}",
                row.id, row.status
            )))
        }
    }

    fn decode_row(row: &PendingChange) -> Result<(EntityType, ChangeAction), CoreError> {
        let entity_type = EntityType::parse(&row.entity_type).ok_or_else(|| {
            CoreError::Internal(format!("Stored entity type '{}' is unknown", row.entity_type))
        })?;
        let action = ChangeAction::parse(&row.action).ok_or_else(|| {
            CoreError::Internal(format!("Stored action '{}' is unknown", row.action))
        })?;
        Ok((entity_type, action))
    }

    /// update/delete rows always carry a target id (CHECK constraint);
    /// a row without one is corrupt, not malformed input.
    fn require_target(row: &PendingChange) -> Result<DbId, CoreError> {
        row.entity_id.ok_or_else(|| {
            CoreError::Internal(format!("Change {} has no target entity id", row.id))
        })
    }
}

fn db_internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(err.to_string())
}
