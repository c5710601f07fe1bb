use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::identity::AuthUser;
use crate::models::stream_deck_key::StreamDeckKey;
use crate::models::DataResponse;
use crate::ports::UploadFile;
use crate::services::{ensure_sound_quota, new_id, ImportedSound, UploadRequest};
use crate::state::AppState;
use crate::storage::{is_allowed_audio_type, is_owned_object, is_shared_object, object_path_in_bucket};

const FILE_FIELD: &str = "file";

pub async fn list_sounds(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let sounds = state.sounds.list_by_user(&auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": sounds })))
}

pub async fn upload_sound(
    state: State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("file part has no file name".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        if let Some(ref ct) = content_type {
            if !is_allowed_audio_type(ct) {
                return Err(AppError::Validation(format!("unsupported audio type: {ct}")));
            }
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read file part: {e}")))?;

        file = Some(UploadFile {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let file = file.ok_or_else(|| AppError::BadRequest("missing file field".to_string()))?;
    let outcome = state
        .upload_sound()
        .execute(UploadRequest::File {
            user_id: auth.user_id,
            file,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": outcome })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ImportSound {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    pub duration: f64,
}

/// Registers a clip whose file is already hosted. The owner is always the
/// caller, and bucket URLs must point at the caller's or the shared namespace.
pub async fn import_sound(
    state: State<AppState>,
    auth: AuthUser,
    Json(input): Json<ImportSound>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if let Ok(Some(object_path)) = object_path_in_bucket(&input.url, &state.bucket) {
        if !is_shared_object(&object_path) && !is_owned_object(&object_path, &auth.user_id) {
            return Err(AppError::Unauthorized(
                "not allowed to import another user's file".to_string(),
            ));
        }
    }
    ensure_sound_quota(state.sounds.as_ref(), &auth.user_id).await?;

    let outcome = state
        .upload_sound()
        .execute(UploadRequest::Record(ImportedSound {
            id: input.id.filter(|id| !id.is_empty()).unwrap_or_else(new_id),
            user_id: auth.user_id,
            name: input.name,
            url: input.url,
            duration: input.duration,
        }))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": outcome })),
    ))
}

pub async fn delete_sound(
    state: State<AppState>,
    Path(sound_id): Path<String>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let report = state.remove_sound().execute(&sound_id, &auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": report })))
}

pub async fn ensure_key(
    state: State<AppState>,
    Path(sound_id): Path<String>,
    auth: AuthUser,
) -> Result<Json<DataResponse<StreamDeckKey>>, AppError> {
    let key = state.ensure_key().execute(&auth.user_id, &sound_id).await?;
    Ok(Json(DataResponse::new(key)))
}
