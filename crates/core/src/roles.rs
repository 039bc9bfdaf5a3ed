//! Well-known workspace role names and tier predicates.
//!
//! These must match the CHECK constraint on `workspace_members.role` in
//! `20260701000002_create_workspaces.sql`.

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";
pub const ROLE_VIEWER: &str = "viewer";

/// All valid workspace role names.
pub const VALID_ROLES: &[&str] = &[ROLE_OWNER, ROLE_ADMIN, ROLE_MEMBER, ROLE_VIEWER];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Whether mutations from this role apply immediately, skipping review.
pub fn bypasses_review(role: &str) -> bool {
    role == ROLE_OWNER || role == ROLE_ADMIN
}

/// Whether mutations from this role are intercepted into pending changes.
pub fn requires_review(role: &str) -> bool {
    role == ROLE_MEMBER
}

/// Whether this role may approve or reject pending changes.
pub fn can_review(role: &str) -> bool {
    bypasses_review(role)
}

/// Whether this role may perform any mutation at all.
pub fn can_mutate(role: &str) -> bool {
    role != ROLE_VIEWER && VALID_ROLES.contains(&role)
}
