use portfolio_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    gate::ApiKeyGate,
    repository::{PostgresRepository, RepositoryState},
    storage::{ImageState, PostgresImageStore},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point: configuration, logging, database, gate, and
/// the HTTP server, initialized in that order.
#[tokio::main]
async fn main() {
    // Configuration loading (fail-fast on missing required variables).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // Log filter: RUST_LOG wins, with sensible development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "portfolio_api=debug,tower_http=info,axum=trace".into());

    // Pretty output for local debugging, JSON for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // Document store: one Postgres pool shared by both collections.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let repo = Arc::new(PostgresRepository::new(pool.clone())) as RepositoryState;
    let images = Arc::new(PostgresImageStore::new(pool)) as ImageState;

    // LOCAL-ONLY: bootstrap the two collections so a fresh database works
    // without a provisioning step.
    if config.env == Env::Local {
        repo.ensure_collection()
            .await
            .expect("FATAL: failed to create projects collection");
        images
            .ensure_collection()
            .await
            .expect("FATAL: failed to create images collection");
    }

    // Access gate, constructed from the injected shared secret.
    let gate = Arc::new(ApiKeyGate::new(config.api_key.clone()));

    // Unified state assembly.
    let app_state = AppState {
        repo,
        images,
        gate,
        config,
    };

    // Router and server startup.
    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:3000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
