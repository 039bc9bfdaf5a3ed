//! HTTP-level integration tests for the approval pipeline: interception,
//! review-queue listing, and the approve/reject endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, request, request_raw, setup_tenant};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Interception
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_create_is_intercepted_with_acceptance_envelope(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/items"),
        Some(&tenant.member_token),
        Some(serde_json::json!({"name": "Drill", "asset_tag": "DRL-1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "pending_approval");
    assert_eq!(json["entity_type"], "item");
    assert_eq!(json["action"], "create");
    assert!(json["pending_change_id"].is_number());

    // No item exists yet.
    let response = request(
        build_test_app(pool.clone()),
        "GET",
        &format!("{base}/items"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    let items = body_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 0);

    // Exactly one pending row exists.
    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes?status=pending"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_owner_mutation_applies_immediately_without_pending_row(pool: PgPool) {
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
    let category = body_json(response).await;
    assert_eq!(category["name"], "Tools");

    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_mutation_is_forbidden(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/items"),
        Some(&tenant.viewer_token),
        Some(serde_json::json!({"name": "Drill"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_malformed_json_is_rejected_without_a_row(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request_raw(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/items"),
        Some(&tenant.member_token),
        "{not json",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_update_with_unparsable_id_is_malformed(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool.clone()),
        "PUT",
        &format!("{base}/items/not-a-number"),
        Some(&tenant.member_token),
        Some(serde_json::json!({"name": "Renamed"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_requests_without_token_are_unauthorized(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/items"),
        None,
        Some(serde_json::json!({"name": "Drill"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_member_is_forbidden(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;

    // A second workspace the member has no role in.
    let other = setup_other_workspace(&pool).await;

    let response = request(
        build_test_app(pool),
        "GET",
        &format!("/api/v1/workspaces/{other}/items"),
        Some(&tenant.member_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

async fn setup_other_workspace(pool: &PgPool) -> i64 {
    use attic_db::repositories::{UserRepo, WorkspaceRepo};
    let stranger = UserRepo::create(pool, "stranger@example.com", "hash", "Stranger")
        .await
        .unwrap();
    WorkspaceRepo::create(pool, "Elsewhere", stranger.id)
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// Submit a member-tier create and return the pending change id.
async fn submit_member_create(
    pool: &PgPool,
    token: &str,
    workspace_id: i64,
    segment: &str,
    payload: serde_json::Value,
) -> i64 {
    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("/api/v1/workspaces/{workspace_id}/{segment}"),
        Some(token),
        Some(payload),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    body_json(response).await["pending_change_id"]
        .as_i64()
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_applies_and_second_approve_conflicts(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let change_id = submit_member_create(
        &pool,
        &tenant.member_token,
        tenant.workspace_id,
        "items",
        serde_json::json!({"name": "Drill"}),
    )
    .await;

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/pending-changes/{change_id}/approve"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let row = body_json(response).await;
    assert_eq!(row["status"], "approved");

    // The item now exists.
    let response = request(
        build_test_app(pool.clone()),
        "GET",
        &format!("{base}/items"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // Approving again is a conflict.
    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/pending-changes/{change_id}/approve"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_cannot_approve_own_change(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let change_id = submit_member_create(
        &pool,
        &tenant.member_token,
        tenant.workspace_id,
        "borrowers",
        serde_json::json!({"name": "Sam"}),
    )
    .await;

    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/pending-changes/{change_id}/approve"),
        Some(&tenant.member_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_records_reason_and_leaves_domain_untouched(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    // Owner creates a borrower directly, then the member proposes deleting it.
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
        "DELETE",
        &format!("{base}/borrowers/{borrower_id}"),
        Some(&tenant.member_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let change_id = body_json(response).await["pending_change_id"]
        .as_i64()
        .unwrap();

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/pending-changes/{change_id}/reject"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"reason": "has active loan"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let row = body_json(response).await;
    assert_eq!(row["status"], "rejected");
    assert_eq!(row["rejection_reason"], "has active loan");

    // The borrower still exists.
    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/borrowers/{borrower_id}"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_update_of_archived_target_conflicts(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/locations"),
        Some(&tenant.owner_token),
        Some(serde_json::json!({"name": "Garage"})),
    )
    .await;
    let location_id = body_json(response).await["id"].as_i64().unwrap();

    let response = request(
        build_test_app(pool.clone()),
        "PUT",
        &format!("{base}/locations/{location_id}"),
        Some(&tenant.member_token),
        Some(serde_json::json!({"name": "Garage East"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let change_id = body_json(response).await["pending_change_id"]
        .as_i64()
        .unwrap();

    // Another actor archives the location before review.
    let response = request(
        build_test_app(pool.clone()),
        "DELETE",
        &format!("{base}/locations/{location_id}"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/pending-changes/{change_id}/approve"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The row is still pending.
    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes/{change_id}"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_validation_failure_returns_field_detail(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let change_id = submit_member_create(
        &pool,
        &tenant.member_token,
        tenant.workspace_id,
        "containers",
        serde_json::json!({"name": ""}),
    )
    .await;

    let response = request(
        build_test_app(pool.clone()),
        "POST",
        &format!("{base}/pending-changes/{change_id}/approve"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "APPLY_ERROR");
    assert_eq!(json["field"], "name");

    // Still reviewable after the failed apply.
    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes/{change_id}"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_change_id_returns_404(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    let response = request(
        build_test_app(pool),
        "POST",
        &format!("{base}/pending-changes/999999/approve"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mine_filter_returns_only_callers_rows(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    // A second member submits alongside the first.
    use attic_core::roles::ROLE_MEMBER;
    use attic_db::repositories::{UserRepo, WorkspaceRepo};
    let second = UserRepo::create(&pool, "second@example.com", "hash", "Second")
        .await
        .unwrap();
    WorkspaceRepo::add_member(&pool, tenant.workspace_id, second.id, ROLE_MEMBER)
        .await
        .unwrap();
    let second_token = common::test_config().jwt.sign(second.id).unwrap();

    submit_member_create(
        &pool,
        &tenant.member_token,
        tenant.workspace_id,
        "items",
        serde_json::json!({"name": "Drill"}),
    )
    .await;
    submit_member_create(
        &pool,
        &second_token,
        tenant.workspace_id,
        "items",
        serde_json::json!({"name": "Saw"}),
    )
    .await;

    let response = request(
        build_test_app(pool.clone()),
        "GET",
        &format!("{base}/pending-changes?mine=true"),
        Some(&second_token),
        None,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["requester_id"], second.id);

    // Without the filter, both rows are visible.
    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    assert_eq!(body_json(response).await["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_filters_by_entity_type(pool: PgPool) {
    let tenant = setup_tenant(&pool).await;
    let base = format!("/api/v1/workspaces/{}", tenant.workspace_id);

    submit_member_create(
        &pool,
        &tenant.member_token,
        tenant.workspace_id,
        "items",
        serde_json::json!({"name": "Drill"}),
    )
    .await;
    submit_member_create(
        &pool,
        &tenant.member_token,
        tenant.workspace_id,
        "categories",
        serde_json::json!({"name": "Tools"}),
    )
    .await;

    let response = request(
        build_test_app(pool),
        "GET",
        &format!("{base}/pending-changes?entity_type=category"),
        Some(&tenant.owner_token),
        None,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["entity_type"], "category");
}
