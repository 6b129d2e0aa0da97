use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Project Router
///
/// The five project operations. `list` and `validate-key` are on the gate's
/// allowlist; `save`, `delete` and `reorder` require the shared secret.
pub fn project_routes() -> Router<AppState> {
    Router::new()
        // GET /api/projects/list
        // Full portfolio, sorted ascending by order index.
        .route("/api/projects/list", get(handlers::list_projects))
        // POST /api/projects/save
        // Upsert of a complete Project record, keyed on its id.
        .route("/api/projects/save", post(handlers::save_project))
        // DELETE /api/projects/delete?id=...
        // Removal by identifier; unknown ids are absorbed silently.
        .route("/api/projects/delete", delete(handlers::delete_project))
        // GET /api/projects/validate-key?key=...
        // Secret check used by the SPA to reveal admin controls.
        .route("/api/projects/validate-key", get(handlers::validate_key))
        // POST /api/projects/reorder
        // Bulk order-index rewrite from an identifier sequence.
        .route("/api/projects/reorder", post(handlers::reorder_projects))
}
