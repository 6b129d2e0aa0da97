use crate::{
    AppState,
    error::AppError,
    models::{Project, SavedImage},
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;

// --- Query Parameter Structs ---

/// Parameters of the delete endpoint (DELETE /api/projects/delete?id=...).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct DeleteParams {
    pub id: String,
}

/// Parameters of the key validation endpoint (GET /api/projects/validate-key?key=...).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ValidateKeyParams {
    pub key: String,
}

// --- Project Handlers ---

/// list_projects
///
/// [Public] Returns every project, sorted ascending by order index. No
/// pagination, no filtering; the whole portfolio is a single page.
///
/// Ties between equal order indices (possible after a partial reorder) are
/// returned in whatever relative order the store yields.
#[utoipa::path(
    get,
    path = "/api/projects/list",
    responses((status = 200, description = "All projects in display order", body = [Project]))
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, AppError> {
    let mut projects = state.repo.list_projects().await?;
    projects.sort_by_key(|project| project.order_index);
    Ok(Json(projects))
}

/// save_project
///
/// [Protected] Upsert keyed on the submitted identifier: insert when new,
/// full-record replacement when existing. There is deliberately no
/// partial-field patch; the client always sends the whole record.
#[utoipa::path(
    post,
    path = "/api/projects/save",
    request_body = Project,
    responses((status = 200, description = "Saved"))
)]
pub async fn save_project(
    State(state): State<AppState>,
    Json(project): Json<Project>,
) -> Result<StatusCode, AppError> {
    state.repo.save_project(&project).await?;
    Ok(StatusCode::OK)
}

/// delete_project
///
/// [Protected] Removes a project by identifier. Unknown identifiers are
/// silently absorbed: the response is 200 either way.
#[utoipa::path(
    delete,
    path = "/api/projects/delete",
    params(DeleteParams),
    responses((status = 200, description = "Deleted (or id was unknown)"))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_project(&params.id).await?;
    Ok(StatusCode::OK)
}

/// validate_key
///
/// [Public] Tells the caller whether the candidate equals the configured
/// shared secret. Pure comparison, no state mutation. Intentionally public:
/// the SPA calls it to decide whether to render admin controls.
#[utoipa::path(
    get,
    path = "/api/projects/validate-key",
    params(ValidateKeyParams),
    responses((status = 200, description = "true iff the candidate matches", body = bool))
)]
pub async fn validate_key(
    State(state): State<AppState>,
    Query(params): Query<ValidateKeyParams>,
) -> Json<bool> {
    Json(state.gate.validate(&params.key))
}

/// reorder_projects
///
/// [Protected] Bulk re-indexing of the display order. For each submitted
/// identifier at position i, the matching project is persisted with order
/// index i; the write is skipped when the index already matches. Submitted
/// identifiers with no matching project are ignored, and projects not named
/// in the sequence keep their prior index untouched.
///
/// A subset sequence therefore gives no global-order guarantee against the
/// unmentioned projects; clients wanting a total order submit the full
/// identifier set. Each save is independent: a failure partway through
/// leaves the earlier writes in place.
#[utoipa::path(
    post,
    path = "/api/projects/reorder",
    request_body = Vec<String>,
    responses((status = 200, description = "Reordered"))
)]
pub async fn reorder_projects(
    State(state): State<AppState>,
    Json(ids): Json<Vec<String>>,
) -> Result<StatusCode, AppError> {
    let current = state.repo.list_projects().await?;
    let by_id: HashMap<&str, &Project> = current
        .iter()
        .map(|project| (project.id.as_str(), project))
        .collect();

    for (index, id) in ids.iter().enumerate() {
        if let Some(&project) = by_id.get(id.as_str()) {
            if project.order_index != index as i32 {
                let mut updated = project.clone();
                updated.order_index = index as i32;
                state.repo.save_project(&updated).await?;
            }
        }
    }

    Ok(StatusCode::OK)
}

// --- Image Handlers ---

/// upload_image
///
/// [Protected] Reads the multipart field `image`, stores payload and declared
/// content type under a freshly drawn random 7-digit decimal identifier, and
/// returns that identifier as plain text.
///
/// The identifier is not checked for collisions; persistence is an upsert, so
/// a later upload drawing the same value overwrites the prior blob.
#[utoipa::path(
    post,
    path = "/api/images/upload",
    responses((status = 200, description = "Identifier of the stored image", body = String))
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, AppError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("unreadable multipart body"))?
    {
        if field.name() == Some("image") {
            let content_type = field.content_type().map(str::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|_| AppError::BadRequest("unreadable image field"))?;
            upload = Some((content_type, data));
        }
    }

    let (content_type, data) =
        upload.ok_or(AppError::BadRequest("missing multipart field 'image'"))?;

    let id = rand::thread_rng().gen_range(1_000_000..=9_999_999).to_string();
    let image = SavedImage {
        id: id.clone(),
        content_type,
        data: data.to_vec(),
    };
    state.images.put_image(&image).await?;

    tracing::info!("stored image {} ({} bytes)", id, image.data.len());
    Ok(id)
}

/// get_image
///
/// [Public for numeric ids] Returns the raw payload with a `Content-Type`
/// header equal to the stored type, `application/octet-stream` when none was
/// recorded at upload. Unknown identifiers yield 404.
#[utoipa::path(
    get,
    path = "/api/images/{id}",
    params(("id" = String, Path, description = "Image identifier")),
    responses(
        (status = 200, description = "Raw image bytes"),
        (status = 404, description = "Unknown identifier")
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let image = state
        .images
        .get_image(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        image
            .content_type
            .as_deref()
            .and_then(|value| HeaderValue::from_str(value).ok())
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );

    Ok((headers, image.data))
}
