//! Per-request gating decision and submission of intercepted mutations.
//!
//! [`classify`] is pure: it takes the resolved permission context, the
//! HTTP method, and the already-split resource path, and decides whether
//! the mutation is gated. The HTTP plumbing (body buffering, response
//! shaping) lives in the api crate's gate middleware.

use attic_core::change::{self, ChangeAction};
use attic_core::context::PermissionContext;
use attic_core::entity::EntityType;
use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_db::models::pending_change::{CreatePendingChange, PendingChange};
use attic_db::repositories::PendingChangeRepo;
use attic_db::DbPool;
use attic_events::{EventBus, LifecycleEvent};

use crate::registry::EntityRegistry;

/// The gating decision for one mutating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not gated: proceed to the normal domain handler untouched.
    PassThrough,
    /// Read-only tier: the mutation is forbidden outright.
    Deny,
    /// Member tier on a registered entity type: buffer the payload and
    /// create a pending change instead of mutating.
    Intercept {
        entity_type: EntityType,
        action: ChangeAction,
        /// Parsed from the path for update/delete; `None` for create or
        /// when the path id is missing/unparsable (the submission is then
        /// rejected as malformed by [`submit`]).
        entity_id: Option<DbId>,
    },
}

/// Decide whether a request must be intercepted.
///
/// `segment` is the resource segment under the workspace path (e.g.
/// `"items"`); `id_segment` is the path segment after it, if any.
pub fn classify(
    registry: &EntityRegistry,
    ctx: &PermissionContext,
    method: &str,
    segment: &str,
    id_segment: Option<&str>,
) -> Classification {
    // Non-mutating methods are never intercepted.
    let Some(action) = ChangeAction::from_method(method) else {
        return Classification::PassThrough;
    };

    // Unregistered segments are not gated; gating an unknown type would
    // silently drop functionality.
    let Some(entry) = registry.resolve_segment(segment) else {
        return Classification::PassThrough;
    };

    if !ctx.can_mutate() {
        return Classification::Deny;
    }
    if ctx.bypasses_review() {
        return Classification::PassThrough;
    }

    let entity_id = match action {
        ChangeAction::Create => None,
        ChangeAction::Update | ChangeAction::Delete => {
            id_segment.and_then(|s| s.parse::<DbId>().ok())
        }
    };

    Classification::Intercept {
        entity_type: entry.entity_type,
        action,
        entity_id,
    }
}

/// Persist an intercepted mutation as a `pending` row and announce it.
///
/// Enforces the construction invariant (create carries no entity id,
/// update/delete must) and that the payload is a JSON object; on any
/// failure no row is created.
pub async fn submit(
    pool: &DbPool,
    bus: &EventBus,
    ctx: &PermissionContext,
    entity_type: EntityType,
    action: ChangeAction,
    entity_id: Option<DbId>,
    payload: serde_json::Value,
) -> Result<PendingChange, CoreError> {
    change::validate_target(action, entity_id).map_err(CoreError::Validation)?;

    if !payload.is_object() {
        return Err(CoreError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    }

    let row = PendingChangeRepo::create(
        pool,
        &CreatePendingChange {
            workspace_id: ctx.workspace_id,
            requester_id: ctx.user_id,
            entity_type: entity_type.as_str().to_string(),
            entity_id,
            action: action.as_str().to_string(),
            payload,
        },
    )
    .await
    .map_err(|e| CoreError::Internal(e.to_string()))?;

    tracing::info!(
        change_id = row.id,
        workspace_id = ctx.workspace_id,
        requester_id = ctx.user_id,
        entity_type = %entity_type,
        action = %action,
        "Mutation intercepted into pending change"
    );

    bus.publish(
        LifecycleEvent::new("change.submitted")
            .in_workspace(ctx.workspace_id)
            .for_entity("pending_change", row.id)
            .by_user(ctx.user_id)
            .with_details(serde_json::json!({
                "entity_type": entity_type.as_str(),
                "action": action.as_str(),
            })),
    );

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use attic_core::roles::{ROLE_ADMIN, ROLE_MEMBER, ROLE_OWNER, ROLE_VIEWER};

    fn ctx(role: &str) -> PermissionContext {
        PermissionContext::new(1, 10, role)
    }

    fn registry() -> EntityRegistry {
        EntityRegistry::with_default_entities()
    }

    #[test]
    fn test_member_post_on_registered_segment_is_intercepted() {
        let decision = classify(&registry(), &ctx(ROLE_MEMBER), "POST", "items", None);
        assert_eq!(
            decision,
            Classification::Intercept {
                entity_type: EntityType::Item,
                action: ChangeAction::Create,
                entity_id: None,
            }
        );
    }

    #[test]
    fn test_member_update_carries_path_entity_id() {
        let decision = classify(&registry(), &ctx(ROLE_MEMBER), "PUT", "locations", Some("17"));
        assert_eq!(
            decision,
            Classification::Intercept {
                entity_type: EntityType::Location,
                action: ChangeAction::Update,
                entity_id: Some(17),
            }
        );
    }

    #[test]
    fn test_member_delete_with_unparsable_id_intercepts_without_id() {
        let decision = classify(
            &registry(),
            &ctx(ROLE_MEMBER),
            "DELETE",
            "borrowers",
            Some("not-a-number"),
        );
        assert_eq!(
            decision,
            Classification::Intercept {
                entity_type: EntityType::Borrower,
                action: ChangeAction::Delete,
                entity_id: None,
            }
        );
    }

    #[test]
    fn test_bypassing_tier_passes_through() {
        for role in [ROLE_OWNER, ROLE_ADMIN] {
            let decision = classify(&registry(), &ctx(role), "POST", "items", None);
            assert_eq!(decision, Classification::PassThrough);
        }
    }

    #[test]
    fn test_viewer_mutation_is_denied() {
        let decision = classify(&registry(), &ctx(ROLE_VIEWER), "DELETE", "items", Some("3"));
        assert_eq!(decision, Classification::Deny);
    }

    #[test]
    fn test_get_is_never_intercepted() {
        let decision = classify(&registry(), &ctx(ROLE_MEMBER), "GET", "items", Some("3"));
        assert_eq!(decision, Classification::PassThrough);
    }

    #[test]
    fn test_unregistered_segment_passes_through_for_member() {
        let decision = classify(&registry(), &ctx(ROLE_MEMBER), "POST", "widgets", None);
        assert_eq!(decision, Classification::PassThrough);
    }
}
