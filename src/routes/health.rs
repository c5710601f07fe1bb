use axum::Json;

pub async fn health() -> &'static str {
    "ok"
}

/// Build info for deploy checks.
pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "git_sha": env!("GIT_SHA"),
    }))
}
