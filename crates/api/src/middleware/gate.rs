//! The mutation gate: Axum middleware implementing the request
//! classifier/interceptor.
//!
//! Layered over the workspace-scoped resource routes. For every mutating
//! request it resolves the caller's workspace role and asks
//! [`attic_pipeline::classify`] for a decision:
//!
//! - bypassing tier (owner/admin) or unregistered resource: the request
//!   proceeds to the normal domain handler, body untouched;
//! - read-only tier: rejected with `Forbidden`;
//! - member tier on a registered resource: the body is buffered and stored
//!   as a pending change, and the caller receives a `202 Accepted`
//!   envelope instead of a domain response.

use axum::body::Body;
use axum::extract::{FromRequestParts, OriginalUri, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use attic_core::change::ChangeAction;
use attic_core::error::CoreError;
use attic_core::types::DbId;
use attic_pipeline::classify::{self, Classification};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::middleware::context::resolve_member_context;
use crate::state::AppState;

/// Largest request body the interceptor will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Gate middleware entry point.
pub async fn gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Non-mutating methods are never intercepted.
    if ChangeAction::from_method(req.method().as_str()).is_none() {
        return Ok(next.run(req).await);
    }

    // This middleware sits inside the `/workspaces/{workspace_id}` nest,
    // where `req.uri()` has the prefix stripped; the full path comes from
    // the `OriginalUri` extension.
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    // Requests outside the workspace resource shape, or for resource
    // segments no applier is registered for, pass through untouched.
    let Some(target) = parse_workspace_path(&path) else {
        return Ok(next.run(req).await);
    };
    if state.registry.resolve_segment(&target.segment).is_none() {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &state).await?;
    let ctx = resolve_member_context(&state.pool, user.user_id, target.workspace_id).await?;

    let decision = classify::classify(
        &state.registry,
        &ctx,
        parts.method.as_str(),
        &target.segment,
        target.id_segment.as_deref(),
    );

    match decision {
        Classification::PassThrough => {
            let req = Request::from_parts(parts, body);
            Ok(next.run(req).await)
        }
        Classification::Deny => Err(AppError::Core(CoreError::Forbidden(format!(
            "Role '{}' may not perform mutations",
            ctx.role
        )))),
        Classification::Intercept {
            entity_type,
            action,
            entity_id,
        } => {
            let payload = buffer_payload(body).await?;
            let row = classify::submit(
                &state.pool,
                &state.event_bus,
                &ctx,
                entity_type,
                action,
                entity_id,
                payload,
            )
            .await?;

            Ok((
                StatusCode::ACCEPTED,
                Json(json!({
                    "pending_change_id": row.id,
                    "status": "pending_approval",
                    "entity_type": row.entity_type,
                    "action": row.action,
                })),
            )
                .into_response())
        }
    }
}

/// The workspace-scoped target a request path points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceTarget {
    pub workspace_id: DbId,
    /// Resource segment directly under the workspace (e.g. `"items"`).
    pub segment: String,
    /// The path segment after the resource, if any (usually an entity id).
    pub id_segment: Option<String>,
}

/// Split a request path of the shape
/// `/api/v1/workspaces/{workspace_id}/{segment}[/{id}...]`.
///
/// Returns `None` when the path does not match that shape, including a
/// non-numeric workspace id (routing will 404 or another extractor will
/// reject it downstream).
pub fn parse_workspace_path(path: &str) -> Option<WorkspaceTarget> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    loop {
        match segments.next() {
            Some("workspaces") => break,
            Some(_) => continue,
            None => return None,
        }
    }

    let workspace_id: DbId = segments.next()?.parse().ok()?;
    let segment = segments.next()?.to_string();
    let id_segment = segments.next().map(str::to_string);

    Some(WorkspaceTarget {
        workspace_id,
        segment,
        id_segment,
    })
}

/// Read and parse the buffered request body.
///
/// An empty body is treated as an empty JSON object; anything else must be
/// well-formed JSON or the submission is rejected before a row is created.
async fn buffer_payload(body: Body) -> Result<serde_json::Value, AppError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::BadRequest("Request body too large or unreadable".into()))?;

    if bytes.is_empty() {
        return Ok(json!({}));
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        AppError::Core(CoreError::Validation(format!(
            "Request body is not valid JSON: {e}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_resource_path() {
        let target =
            parse_workspace_path("/api/v1/workspaces/7/items/42").unwrap();
        assert_eq!(target.workspace_id, 7);
        assert_eq!(target.segment, "items");
        assert_eq!(target.id_segment.as_deref(), Some("42"));
    }

    #[test]
    fn test_parse_collection_path_has_no_id() {
        let target = parse_workspace_path("/api/v1/workspaces/7/items").unwrap();
        assert_eq!(target.id_segment, None);
    }

    #[test]
    fn test_nested_action_path_keeps_first_trailing_segment() {
        let target =
            parse_workspace_path("/api/v1/workspaces/7/pending-changes/3/approve").unwrap();
        assert_eq!(target.segment, "pending-changes");
        assert_eq!(target.id_segment.as_deref(), Some("3"));
    }

    #[test]
    fn test_paths_outside_workspaces_do_not_match() {
        assert_eq!(parse_workspace_path("/api/v1/auth/login"), None);
        assert_eq!(parse_workspace_path("/health"), None);
        assert_eq!(parse_workspace_path("/api/v1/workspaces"), None);
        assert_eq!(parse_workspace_path("/api/v1/workspaces/7"), None);
    }

    #[test]
    fn test_non_numeric_workspace_id_does_not_match() {
        assert_eq!(parse_workspace_path("/api/v1/workspaces/abc/items"), None);
    }
}
