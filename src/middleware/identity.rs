use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Header carrying the signed-in user's id, set by the identity proxy in
/// front of the server.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Rejection type for when no identity is present.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": "unauthorized",
                "message": "missing user identity"
            }
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn user_id_from(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        user_id_from(parts)
            .map(|user_id| AuthUser { user_id })
            .ok_or(AuthRejection)
    }
}
