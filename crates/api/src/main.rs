use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attic_api::config::ServerConfig;
use attic_api::router::build_app_router;
use attic_api::state::AppState;
use attic_events::{EventBus, EventPersistence};
use attic_pipeline::EntityRegistry;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    let pool = connect_database().await;

    // Audit side-channel: every published event ends up in the events
    // table, without ever blocking the operation that produced it.
    let event_bus = Arc::new(EventBus::new());
    let audit_writer = tokio::spawn(EventPersistence::new(pool.clone()).run(event_bus.subscribe()));

    let state = AppState {
        pool,
        config: Arc::new(config),
        registry: Arc::new(EntityRegistry::with_default_entities()),
        event_bus,
    };
    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "attic api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    audit_writer.abort();
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attic_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn connect_database() -> attic_db::DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = attic_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    attic_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    attic_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    pool
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
