use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Image Router
///
/// Upload requires the shared secret; fetch is public when the identifier is
/// purely numeric (which server-generated identifiers always are). The static
/// `upload` segment wins over the `{id}` capture, so the upload route never
/// shadows a fetch.
pub fn image_routes() -> Router<AppState> {
    Router::new()
        // POST /api/images/upload  (multipart field `image`)
        // Stores the payload and returns the new identifier as plain text.
        .route("/api/images/upload", post(handlers::upload_image))
        // GET /api/images/{id}
        // Raw bytes with the stored content type, 404 for unknown ids.
        .route("/api/images/{id}", get(handlers::get_image))
}
