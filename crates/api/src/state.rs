use std::sync::Arc;

use attic_events::EventBus;
use attic_pipeline::EntityRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: attic_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Gated entity type registry used by the interceptor and the review
    /// engine.
    pub registry: Arc<EntityRegistry>,
    /// Event bus for best-effort audit publishing.
    pub event_bus: Arc<EventBus>,
}
