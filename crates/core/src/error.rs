use crate::types::DbId;

/// Domain-level error type shared by every crate in the workspace.
///
/// The api crate maps each variant onto an HTTP status code; the pipeline
/// crate produces them from review/apply preconditions.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A domain-service rule failed while materializing an approved change.
    /// Carries the offending field so reviewers see what to fix.
    #[error("Apply failed on {field:?}: {message}")]
    Apply {
        field: Option<String>,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
