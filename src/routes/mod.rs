mod health;
mod keys;
mod seed;
mod sounds;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::storage::PUBLIC_OBJECT_PREFIX;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let objects = ServeDir::new(&state.storage_path);

    Router::new()
        .route("/health", get(health::health))
        .route("/version", get(health::version))
        .nest_service(PUBLIC_OBJECT_PREFIX, objects)
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Sounds
        .route(
            "/sounds",
            get(sounds::list_sounds).post(sounds::upload_sound),
        )
        .route("/sounds/import", post(sounds::import_sound))
        .route("/sounds/{sound_id}", delete(sounds::delete_sound))
        .route("/sounds/{sound_id}/key", post(sounds::ensure_key))
        // Keys
        .route("/keys", get(keys::list_keys).patch(keys::reorder_keys))
        .route("/keys/{key_id}", patch(keys::update_key))
        // Seed
        .route("/seed", post(seed::seed))
}
