//! Pending-change lifecycle vocabulary: actions, statuses, and the
//! construction/transition rules the store and review engine enforce.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The mutation a pending change proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl ChangeAction {
    /// The stored/wire name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "create",
            ChangeAction::Update => "update",
            ChangeAction::Delete => "delete",
        }
    }

    /// Parse a stored action name back into its tag.
    pub fn parse(s: &str) -> Option<ChangeAction> {
        match s {
            "create" => Some(ChangeAction::Create),
            "update" => Some(ChangeAction::Update),
            "delete" => Some(ChangeAction::Delete),
            _ => None,
        }
    }

    /// Map an HTTP method to the action it proposes.
    ///
    /// Only POST, PUT, PATCH, and DELETE are mutations; every other method
    /// returns `None` and is never intercepted.
    pub fn from_method(method: &str) -> Option<ChangeAction> {
        match method {
            "POST" => Some(ChangeAction::Create),
            "PUT" | "PATCH" => Some(ChangeAction::Update),
            "DELETE" => Some(ChangeAction::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Initial state of every pending change.
pub const STATUS_PENDING: &str = "pending";

/// Terminal state: the change was applied to domain state.
pub const STATUS_APPROVED: &str = "approved";

/// Terminal state: the change was declined; domain state untouched.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid lifecycle states.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Whether a status admits no further lifecycle transition.
pub fn is_terminal(status: &str) -> bool {
    status == STATUS_APPROVED || status == STATUS_REJECTED
}

// ---------------------------------------------------------------------------
// Construction invariant
// ---------------------------------------------------------------------------

/// Check the action/target coherence rule for a new pending change.
///
/// A `create` proposes an entity that does not exist yet, so it must not
/// carry an entity id; `update` and `delete` target an existing entity, so
/// they must. The same rule is a CHECK constraint on the table.
pub fn validate_target(action: ChangeAction, entity_id: Option<DbId>) -> Result<(), String> {
    match (action, entity_id) {
        (ChangeAction::Create, None) => Ok(()),
        (ChangeAction::Create, Some(_)) => {
            Err("A create proposal must not reference an existing entity".to_string())
        }
        (ChangeAction::Update, Some(_)) | (ChangeAction::Delete, Some(_)) => Ok(()),
        (action, None) => Err(format!("A {action} proposal must reference an entity id")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip() {
        for action in [
            ChangeAction::Create,
            ChangeAction::Update,
            ChangeAction::Delete,
        ] {
            assert_eq!(ChangeAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(ChangeAction::from_method("POST"), Some(ChangeAction::Create));
        assert_eq!(ChangeAction::from_method("PUT"), Some(ChangeAction::Update));
        assert_eq!(
            ChangeAction::from_method("PATCH"),
            Some(ChangeAction::Update)
        );
        assert_eq!(
            ChangeAction::from_method("DELETE"),
            Some(ChangeAction::Delete)
        );
    }

    #[test]
    fn test_non_mutating_methods_map_to_none() {
        assert_eq!(ChangeAction::from_method("GET"), None);
        assert_eq!(ChangeAction::from_method("HEAD"), None);
        assert_eq!(ChangeAction::from_method("OPTIONS"), None);
    }

    #[test]
    fn test_valid_statuses_accepted() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(validate_status("applied").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!is_terminal(STATUS_PENDING));
        assert!(is_terminal(STATUS_APPROVED));
        assert!(is_terminal(STATUS_REJECTED));
    }

    #[test]
    fn test_create_must_not_carry_entity_id() {
        assert!(validate_target(ChangeAction::Create, None).is_ok());
        assert!(validate_target(ChangeAction::Create, Some(1)).is_err());
    }

    #[test]
    fn test_update_and_delete_require_entity_id() {
        assert!(validate_target(ChangeAction::Update, Some(7)).is_ok());
        assert!(validate_target(ChangeAction::Delete, Some(7)).is_ok());
        assert!(validate_target(ChangeAction::Update, None).is_err());
        assert!(validate_target(ChangeAction::Delete, None).is_err());
    }
}
