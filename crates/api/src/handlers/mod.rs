//! HTTP request handlers.

pub mod activity;
pub mod auth;
pub mod borrower;
pub mod category;
pub mod container;
pub mod inventory;
pub mod item;
pub mod loan;
pub mod location;
pub mod pending_change;
pub mod workspace;

use attic_core::context::PermissionContext;
use attic_core::error::CoreError;
use attic_core::validate::first_error;
use validator::Validate;

use crate::error::AppError;

/// Run DTO field rules for a direct mutation, mapping failures to a 400
/// validation error with the offending field in the message.
pub(crate) fn check_payload<T: Validate>(dto: &T) -> Result<(), AppError> {
    dto.validate().map_err(|errors| {
        let (field, message) = first_error(&errors);
        AppError::Core(CoreError::Validation(format!("{field}: {message}")))
    })
}

/// Require the bypassing tier for a direct domain mutation.
///
/// Member-tier requests are intercepted by the gate middleware before they
/// reach a mutation handler; this guard keeps the invariant even if a
/// route is mounted without the gate (as some tests do).
pub(crate) fn require_direct_mutator(ctx: &PermissionContext) -> Result<(), AppError> {
    if ctx.bypasses_review() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' may not mutate directly",
            ctx.role
        ))))
    }
}
