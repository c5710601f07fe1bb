use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::middleware::identity::AuthUser;
use crate::seed::provision_starter_pack;
use crate::state::AppState;

/// Gives the caller the starter pack. Hidden unless seeding is enabled.
pub async fn seed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.seed_enabled {
        return Err(AppError::NotFound("not found".to_string()));
    }

    let provisioned = provision_starter_pack(
        state.sounds.clone(),
        state.keys.clone(),
        &state.public_url,
        &state.bucket,
        &auth.user_id,
    )
    .await?;

    Ok(Json(serde_json::json!({ "data": provisioned })))
}
