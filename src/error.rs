use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Internal(String),
    BadRequest(String),
    /// An entity field broke its invariant at construction.
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    QuotaExceeded(String),
    PayloadTooLarge(String),
}

impl AppError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "internal_error",
            AppError::Internal(_) => "internal_error",
            AppError::BadRequest(_) => "invalid_request",
            AppError::Validation(_) => "validation_failed",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::QuotaExceeded(_) => "quota_exceeded",
            AppError::PayloadTooLarge(_) => "payload_too_large",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::QuotaExceeded(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("database error: {e}");
                "internal database error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "database error: {e}"),
            AppError::Internal(msg)
            | AppError::BadRequest(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::QuotaExceeded(msg)
            | AppError::PayloadTooLarge(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        });

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::NotFound("resource not found".to_string()),
            _ => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_distinguish_domain_failures() {
        let quota = AppError::QuotaExceeded("limit".into());
        let size = AppError::PayloadTooLarge("big".into());
        let auth = AppError::Unauthorized("nope".into());
        let missing = AppError::NotFound("gone".into());
        let codes = [quota.code(), size.code(), auth.code(), missing.code()];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_display_is_the_message() {
        let err = AppError::QuotaExceeded("you have reached the limit of 9 sounds".into());
        assert_eq!(err.to_string(), "you have reached the limit of 9 sounds");
    }
}
