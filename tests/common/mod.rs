#![allow(dead_code)]

use axum::body::Body;
use http::{Method, Request};

use vsdeck::config::{Config, DEFAULT_BUCKET};
use vsdeck::db;
use vsdeck::routes;
use vsdeck::state::AppState;
use vsdeck::storage::{self, LocalSoundStorage};

pub const PUBLIC_URL: &str = "http://localhost:39100";
pub const MAX_SOUND_BYTES: usize = 4096;

/// Test server that owns an in-memory SQLite pool, a fresh storage
/// directory and the full AppState. Each instance is isolated.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_seed(true).await
    }

    pub async fn with_seed(seed_enabled: bool) -> Self {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("failed to create test pool");

        let config = Config {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            storage_path: temp_storage_path(),
            public_url: PUBLIC_URL.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            max_sound_bytes: MAX_SOUND_BYTES,
            seed_enabled,
        };

        LocalSoundStorage::new(&config.storage_path, &config.bucket, &config.public_url)
            .ensure_layout()
            .await
            .expect("failed to prepare test storage");

        Self {
            state: AppState::new(pool, &config),
        }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    /// Full path on disk of an object addressed by its public URL.
    pub fn object_file(&self, public_url: &str) -> std::path::PathBuf {
        let prefix = format!("{PUBLIC_URL}{}/", storage::PUBLIC_OBJECT_PREFIX);
        let relative = public_url
            .strip_prefix(&prefix)
            .expect("url outside the public object prefix");
        self.state.storage_path.join(relative)
    }
}

/// Fresh storage directory under the system temp dir.
pub fn temp_storage_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("vsdeck-test-{}", uuid::Uuid::new_v4()))
}

// ---------------------------------------------------------------------------
// Request builder helpers
// ---------------------------------------------------------------------------

pub fn user_request(method: Method, uri: &str, user_id: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-User-Id", user_id)
        .body(Body::empty())
        .unwrap()
}

pub fn user_json_request(
    method: Method,
    uri: &str,
    user_id: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-User-Id", user_id)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

const BOUNDARY: &str = "vsdeck-test-boundary";

/// Multipart upload with a single `file` part.
pub fn upload_request(
    user_id: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/sounds")
        .header("X-User-Id", user_id)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Parse a response body into a `serde_json::Value`.
pub async fn parse_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Minimal mono 16-bit PCM WAV of `frames` silent samples.
pub fn wav_bytes(sample_rate: u32, frames: u32) -> Vec<u8> {
    let data_len = frames * 2;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}
