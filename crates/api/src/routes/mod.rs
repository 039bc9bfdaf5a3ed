pub mod health;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    activity, auth, borrower, category, container, inventory, item, loan, location,
    pending_change, workspace,
};
use crate::middleware::gate;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                       register (public)
/// /auth/login                                          login (public)
///
/// /workspaces                                          list mine, create
/// /workspaces/{workspace_id}/members                   list, add (owner/admin)
/// /workspaces/{workspace_id}/activity                  audit feed (GET)
///
/// /workspaces/{workspace_id}/pending-changes           review queue (GET)
/// /workspaces/{workspace_id}/pending-changes/{id}      detail (GET)
/// /workspaces/{workspace_id}/pending-changes/{id}/approve   approve (POST)
/// /workspaces/{workspace_id}/pending-changes/{id}/reject    reject (POST)
///
/// /workspaces/{workspace_id}/items                     list, create
/// /workspaces/{workspace_id}/items/{id}                get, update, delete
///   ... and the same shape for locations, containers, categories,
///   borrowers, loans, and inventory.
/// ```
///
/// Everything nested under `/workspaces/{workspace_id}` sits behind the
/// gate middleware: member-tier mutations on registered entity resources
/// are intercepted into pending changes there.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let workspace_scoped = Router::new()
        .route(
            "/members",
            get(workspace::list_members).post(workspace::add_member),
        )
        .route("/activity", get(activity::list))
        .route("/pending-changes", get(pending_change::list))
        .route("/pending-changes/{id}", get(pending_change::get))
        .route("/pending-changes/{id}/approve", post(pending_change::approve))
        .route("/pending-changes/{id}/reject", post(pending_change::reject))
        .merge(entity_routes())
        .layer(from_fn_with_state(state, gate::gate));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/workspaces",
            get(workspace::list_mine).post(workspace::create),
        )
        .nest("/workspaces/{workspace_id}", workspace_scoped)
}

/// CRUD routes for the seven gated entity resources.
fn entity_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(item::list).post(item::create))
        .route(
            "/items/{id}",
            get(item::get)
                .put(item::update)
                .patch(item::update)
                .delete(item::delete),
        )
        .route("/locations", get(location::list).post(location::create))
        .route(
            "/locations/{id}",
            get(location::get)
                .put(location::update)
                .patch(location::update)
                .delete(location::delete),
        )
        .route("/containers", get(container::list).post(container::create))
        .route(
            "/containers/{id}",
            get(container::get)
                .put(container::update)
                .patch(container::update)
                .delete(container::delete),
        )
        .route("/categories", get(category::list).post(category::create))
        .route(
            "/categories/{id}",
            get(category::get)
                .put(category::update)
                .patch(category::update)
                .delete(category::delete),
        )
        .route("/borrowers", get(borrower::list).post(borrower::create))
        .route(
            "/borrowers/{id}",
            get(borrower::get)
                .put(borrower::update)
                .patch(borrower::update)
                .delete(borrower::delete),
        )
        .route("/loans", get(loan::list).post(loan::create))
        .route(
            "/loans/{id}",
            get(loan::get)
                .put(loan::update)
                .patch(loan::update)
                .delete(loan::delete),
        )
        .route("/inventory", get(inventory::list).post(inventory::create))
        .route(
            "/inventory/{id}",
            get(inventory::get)
                .put(inventory::update)
                .patch(inventory::update)
                .delete(inventory::delete),
        )
}
