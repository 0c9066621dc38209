use axum::{
    extract::{Multipart, State},
    Extension,
};
use uuid::Uuid;

use crate::database::models::{ImageView, NewImage};
use crate::error::ApiError;
use crate::files::{allowed_ext, mime_for, secure_filename};
use crate::handlers::protected::utils::ensure_session_user;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct UploadForm {
    uid: Option<String>,
    pid: Option<String>,
    images: Vec<UploadedFile>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("uid") => form.uid = Some(field.text().await?),
                Some("pid") => form.pid = Some(field.text().await?),
                Some("images") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?.to_vec();
                    form.images.push(UploadedFile {
                        filename,
                        bytes,
                    });
                }
                other => {
                    tracing::debug!("Ignoring upload form field {:?}", other);
                }
            }
        }

        Ok(form)
    }
}

fn required_uuid(value: Option<String>, field: &str) -> Result<Uuid, ApiError> {
    let value = value.ok_or_else(|| ApiError::bad_request(format!("Missing field: {}", field)))?;
    Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::bad_request(format!("Invalid UUID in field: {}", field)))
}

/**
 * POST /api/projects/upload - Upload images into a project
 *
 * Multipart form fields: `uid`, `pid`, and one or more `images` files.
 *
 * Files without an accepted extension (png, jpg, jpeg) are skipped and left
 * out of the response. An empty filename aborts with 400; images stored
 * before it stay stored.
 *
 * Expected Output (201):
 * ```json
 * [{ "pid": "...", "uid": "...", "fnu": "token.cat.png", "url": "/api/image/token.cat.png", "coords": [] }]
 * ```
 */
pub async fn project_upload(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Vec<ImageView>> {
    let form = UploadForm::read(multipart).await?;

    let user_id = required_uuid(form.uid, "uid")?;
    let project_id = required_uuid(form.pid, "pid")?;
    ensure_session_user(&auth, user_id)?;

    match state.store.get_project_by_id(project_id).await? {
        Some(project) if project.created_by == user_id => {}
        _ => return Err(ApiError::not_found("Project not found.")),
    }

    let mut views = Vec::with_capacity(form.images.len());
    for file in form.images {
        if file.filename.is_empty() {
            return Err(ApiError::bad_request("Empty filename detected."));
        }

        if !allowed_ext(&file.filename) {
            tracing::warn!(
                "Skipping upload '{}' for project {}: extension not allowed",
                file.filename,
                project_id
            );
            continue;
        }

        let filename = secure_filename(&file.filename);
        if filename.is_empty() {
            return Err(ApiError::bad_request("Empty filename detected."));
        }

        // The client's part Content-Type is ignored
        let mimetype = mime_for(&filename)
            .ok_or_else(|| ApiError::bad_request("Invalid filename."))?
            .to_string();

        let image = state
            .store
            .add_image(NewImage {
                bytes: file.bytes,
                filename,
                mimetype,
                user_id,
                project_id,
            })
            .await?;

        tracing::info!("Stored image {} in project {}", image.file_unique, project_id);
        views.push(ImageView::from(&image));
    }

    Ok(ApiResponse::created(views))
}
