//! Shared harness for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` via
//! [`attic_api::router::build_app_router`] so tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic recovery,
//! and the mutation gate) that production uses. Requests are sent with
//! `tower::ServiceExt::oneshot`; no TCP listener is involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use attic_api::auth::jwt::JwtConfig;
use attic_api::config::ServerConfig;
use attic_api::router::build_app_router;
use attic_api::state::AppState;
use attic_core::roles::{ROLE_MEMBER, ROLE_VIEWER};
use attic_core::types::DbId;
use attic_db::repositories::{UserRepo, WorkspaceRepo};
use attic_events::EventBus;
use attic_pipeline::EntityRegistry;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        registry: Arc::new(EntityRegistry::with_default_entities()),
        event_bus: Arc::new(EventBus::new()),
    };
    build_app_router(state)
}

/// Send a request with an optional bearer token and JSON body.
pub async fn request(
    app: Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

/// Send a request whose body is a raw string (for malformed-JSON cases).
pub async fn request_raw(
    app: Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {}", token.unwrap_or("")))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A seeded workspace with one user per relevant role tier.
pub struct TestTenant {
    pub workspace_id: DbId,
    pub owner_id: DbId,
    pub member_id: DbId,
    pub viewer_id: DbId,
    pub owner_token: String,
    pub member_token: String,
    pub viewer_token: String,
}

/// Seed a workspace with an owner, a member, and a viewer, minting access
/// tokens signed with the test secret.
pub async fn setup_tenant(pool: &PgPool) -> TestTenant {
    let jwt = test_config().jwt;

    let owner = UserRepo::create(pool, "owner@example.com", "hash", "Owner")
        .await
        .unwrap();
    let workspace = WorkspaceRepo::create(pool, "Home", owner.id).await.unwrap();

    let member = UserRepo::create(pool, "member@example.com", "hash", "Member")
        .await
        .unwrap();
    WorkspaceRepo::add_member(pool, workspace.id, member.id, ROLE_MEMBER)
        .await
        .unwrap();

    let viewer = UserRepo::create(pool, "viewer@example.com", "hash", "Viewer")
        .await
        .unwrap();
    WorkspaceRepo::add_member(pool, workspace.id, viewer.id, ROLE_VIEWER)
        .await
        .unwrap();

    TestTenant {
        workspace_id: workspace.id,
        owner_id: owner.id,
        member_id: member.id,
        viewer_id: viewer.id,
        owner_token: jwt.sign(owner.id).unwrap(),
        member_token: jwt.sign(member.id).unwrap(),
        viewer_token: jwt.sign(viewer.id).unwrap(),
    }
}
