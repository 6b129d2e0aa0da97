use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
    routing::get,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;

// Module for routing, organized by resource.
pub mod routes;

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use gate::ApiKeyGate;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{ImageState, InMemoryImageStore, PostgresImageStore};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the
/// application from the `#[utoipa::path]` handler annotations and the
/// `ToSchema` model derives. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_projects, handlers::save_project, handlers::delete_project,
        handlers::validate_key, handlers::reorder_projects,
        handlers::upload_image, handlers::get_image
    ),
    components(schemas(models::Project)),
    tags(
        (name = "portfolio", description = "Personal portfolio API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding all application services and
/// configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Project collection access.
    pub repo: RepositoryState,
    /// Image collection access.
    pub images: ImageState,
    /// Access gate: injected shared secret plus the public-endpoint allowlist.
    pub gate: Arc<ApiKeyGate>,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allow handlers and middleware to selectively pull components from the shared state.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for ImageState {
    fn from_ref(app_state: &AppState) -> ImageState {
        app_state.images.clone()
    }
}

impl FromRef<AppState> for Arc<ApiKeyGate> {
    fn from_ref(app_state: &AppState) -> Arc<ApiKeyGate> {
        app_state.gate.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's routing structure, applies the access gate to
/// the `/api` surface, and wraps everything in the observability and CORS
/// layers.
pub fn create_router(state: AppState) -> Router {
    // CORS: all origins, methods and headers on all paths. The SPA is hosted
    // separately, so the API is deliberately open at this layer; the gate is
    // what protects mutations.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // The business surface. The gate middleware runs ahead of every handler
    // here; its allowlist decides which endpoints pass anonymously.
    let api_routes = routes::projects::project_routes()
        .merge(routes::images::image_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_api_key,
        ));

    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // GET /health
        // Unauthenticated liveness probe for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        .merge(api_routes)
        .with_state(state);

    // Observability layers, applied outermost.
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing spans carrying the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Return the generated x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: extracts the `x-request-id` header
/// and includes it in the span alongside the HTTP method and URI, so every
/// log line of a single request is correlated by one id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
