//! Explicit per-request permission context.
//!
//! Resolved once from the membership table by the api crate and passed as a
//! plain function parameter into the classifier and review engine, so
//! authorization inputs are visible in signatures and testable without
//! constructing HTTP requests.

use crate::roles;
use crate::types::DbId;

/// The identity and workspace role a request operates under.
#[derive(Debug, Clone)]
pub struct PermissionContext {
    pub user_id: DbId,
    pub workspace_id: DbId,
    /// The caller's role in `workspace_id` (one of [`roles::VALID_ROLES`]).
    pub role: String,
}

impl PermissionContext {
    pub fn new(user_id: DbId, workspace_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            workspace_id,
            role: role.into(),
        }
    }

    /// Whether this caller's mutations skip the approval pipeline.
    pub fn bypasses_review(&self) -> bool {
        roles::bypasses_review(&self.role)
    }

    /// Whether this caller's mutations are intercepted into pending changes.
    pub fn requires_review(&self) -> bool {
        roles::requires_review(&self.role)
    }

    /// Whether this caller may approve or reject pending changes.
    pub fn can_review(&self) -> bool {
        roles::can_review(&self.role)
    }

    /// Whether this caller may perform any mutation at all.
    pub fn can_mutate(&self) -> bool {
        roles::can_mutate(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_MEMBER, ROLE_VIEWER};

    #[test]
    fn test_context_delegates_to_role_predicates() {
        let admin = PermissionContext::new(1, 10, ROLE_ADMIN);
        assert!(admin.bypasses_review());
        assert!(admin.can_review());
        assert!(!admin.requires_review());

        let member = PermissionContext::new(2, 10, ROLE_MEMBER);
        assert!(member.requires_review());
        assert!(!member.can_review());
        assert!(member.can_mutate());

        let viewer = PermissionContext::new(3, 10, ROLE_VIEWER);
        assert!(!viewer.can_mutate());
        assert!(!viewer.requires_review());
    }
}
