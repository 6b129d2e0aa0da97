use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

/// Project
///
/// A portfolio entry from the `projects` collection. This is the primary data
/// structure of the application and the only JSON body on the wire.
///
/// The identifier is an opaque string chosen by the client at creation time;
/// saving is an upsert keyed on it, replacing the full record. The wire
/// format is camelCase (`imageId`, `orderIndex`) to match what the SPA
/// produces and consumes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,

    /// Foreign reference to an uploaded image. Purely advisory: nothing
    /// enforces that the referenced image exists.
    pub image_id: Option<String>,

    /// One-line summary shown on the project card.
    pub brief: String,
    /// Full description shown on the detail view.
    pub description: String,
    /// Ordered list of technology tags.
    pub technologies: Vec<String>,

    /// Display position across the whole collection; lower sorts first.
    /// Rewritten in bulk by the reorder operation. Not required to be unique.
    #[serde(default)]
    pub order_index: i32,
}

/// SavedImage
///
/// A binary blob from the `images` collection. Immutable after creation:
/// there is no update operation, only create and fetch. Never serialized as
/// JSON; the payload goes over the wire as a raw body with the stored content
/// type as its `Content-Type` header.
#[derive(Debug, Clone, FromRow)]
pub struct SavedImage {
    /// Server-generated 7-digit decimal string, drawn at upload time.
    pub id: String,
    /// Declared MIME type of the upload, if any. Retrieval falls back to
    /// `application/octet-stream` when absent.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}
