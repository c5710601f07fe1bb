use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::identity::AuthUser;
use crate::services::KeyUpdate;
use crate::state::AppState;

pub async fn list_keys(
    state: State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let keys = state.keys.list_by_user(&auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": keys })))
}

#[derive(Debug, Deserialize)]
pub struct KeyPosition {
    pub id: String,
    pub position: i64,
}

/// Persists a new grid order. Every id must name one of the caller's keys.
pub async fn reorder_keys(
    state: State<AppState>,
    auth: AuthUser,
    Json(input): Json<Vec<KeyPosition>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let current = state.keys.list_by_user(&auth.user_id).await?;

    let moved = input
        .iter()
        .map(|entry| {
            current
                .iter()
                .find(|k| k.id() == entry.id)
                .ok_or_else(|| AppError::NotFound("unknown_key".to_string()))
                .and_then(|k| k.with_position(entry.position))
        })
        .collect::<Result<Vec<_>, _>>()?;

    state.keys.upsert_batch(&moved).await?;
    tracing::debug!(user_id = %auth.user_id, keys = moved.len(), "reordered keys");

    let keys = state.keys.list_by_user(&auth.user_id).await?;
    Ok(Json(serde_json::json!({ "data": keys })))
}

pub async fn update_key(
    state: State<AppState>,
    Path(key_id): Path<String>,
    auth: AuthUser,
    Json(input): Json<KeyUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let key = state
        .update_key()
        .execute(&auth.user_id, &key_id, input)
        .await?;
    Ok(Json(serde_json::json!({ "data": key })))
}
