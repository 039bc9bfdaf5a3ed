//! HTTP-level integration tests for the direct (bypassing-tier) entity
//! CRUD path and the auth endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, request, setup_tenant};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_then_login(pool: PgPool) {
    let response = request(
        build_test_app(pool.clone()),
        "POST",
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": "new@example.com",
            "password": "long-enough-password",
            "display_name": "New User"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert!(json["user"]["password_hash"].is_null());

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": "new@example.com",
            "password": "long-enough-password"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        build_test_app(pool),
        "POST",
        "/api/v1/auth/login",
        None,
        Some(serde_json::json!({
            "email": "new@example.com",
            "password": "wrong-password"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let response = request(
        build_test_app(pool),
        "POST",
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": "short@example.com",
            "password": "short",
            "display_name": "Shorty"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Direct CRUD (owner tier)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_crud_lifecycle(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/items"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "Drill", "quantity": 2})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = body_json(response).await;
    let id = item["id"].as_i64().unwrap();
    assert_eq!(item["quantity"], 2);

    let response = request(
        build_test_app(pool.clone()),
        "PUT",
        &format!("{base}/items/{id}"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"description": "cordless"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    // Merge semantics: untouched fields keep their values.
    assert_eq!(updated["name"], "Drill");
    assert_eq!(updated["description"], "cordless");

    let response = request(
        build_test_app(pool.clone()),
        "DELETE",
        &format!("{base}/items/{id}"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Archived items disappear from reads.
    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/items/{id}"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_direct_create_validates_fields(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/items"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "", "quantity": -1})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_category_name_conflicts(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/categories"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "Tools"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/categories"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "Tools"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_loan_lifecycle_against_item_and_borrower(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/items"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "Ladder"})),
    )
    .await;
    let item_id = body_json(response).await["id"].as_i64().unwrap();

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/borrowers"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "Sam"})),
    )
    .await;
    let borrower_id = body_json(response).await["id"].as_i64().unwrap();

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/loans"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"item_id": item_id, "borrower_id": borrower_id})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let loan = body_json(response).await;
    assert!(loan["returned_at"].is_null());

    // A loan against a missing item is a validation error (FK).
    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/loans"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"item_id": 999999, "borrower_id": borrower_id})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_endpoint(pool: PgPool) {
    let response = request(build_test_app(pool), "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
