//! HTTP error surface.
//!
//! [`AppError`] is what every handler returns on failure. Domain errors
//! ([`CoreError`]) and database errors are folded into one JSON shape:
//! `{ "error": <message>, "code": <stable machine code> }`, with an extra
//! `"field"` key on apply failures so reviewers see which input to fix.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use attic_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// What one error renders as on the wire.
struct ErrorBody {
    status: StatusCode,
    code: &'static str,
    message: String,
    field: Option<String>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            field: None,
        }
    }

    /// 500 with a sanitized message; the real cause goes to the log only.
    fn internal(cause: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Core(core) => core_body(core),
            AppError::Database(err) => database_body(err),
            AppError::BadRequest(msg) => {
                ErrorBody::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            AppError::InternalError(msg) => ErrorBody::internal(msg),
        };

        let mut json = json!({
            "error": body.message,
            "code": body.code,
        });
        if let Some(field) = body.field {
            json["field"] = json!(field);
        }

        (body.status, axum::Json(json)).into_response()
    }
}

fn core_body(err: &CoreError) -> ErrorBody {
    match err {
        CoreError::NotFound { entity, id } => ErrorBody::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            ErrorBody::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
        }
        CoreError::Conflict(msg) => ErrorBody::new(StatusCode::CONFLICT, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => {
            ErrorBody::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
        }
        CoreError::Forbidden(msg) => ErrorBody::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Apply { field, message } => ErrorBody {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "APPLY_ERROR",
            message: message.clone(),
            field: field.clone(),
        },
        CoreError::Internal(msg) => ErrorBody::internal(msg),
    }
}

/// Map database failures onto client-meaningful statuses where possible.
///
/// Unique violations on our `uq_*` constraints are 409s; foreign-key
/// violations mean the request referenced something that does not exist
/// (400). Everything else is an opaque 500.
fn database_body(err: &sqlx::Error) -> ErrorBody {
    if matches!(err, sqlx::Error::RowNotFound) {
        return ErrorBody::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
    }

    if let sqlx::Error::Database(db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return ErrorBody::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            Some("23503") => {
                return ErrorBody::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "A referenced entity does not exist",
                );
            }
            _ => {}
        }
    }

    ErrorBody::internal(err)
}
