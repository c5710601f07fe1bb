use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 39100;
pub const DEFAULT_BUCKET: &str = "vsd-bucket";
pub const DEFAULT_MAX_SOUND_BYTES: usize = 1024 * 1024; // 1 MB

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub storage_path: PathBuf,
    /// Base used when publishing object URLs, e.g. `https://deck.example.com`.
    pub public_url: String,
    pub bucket: String,
    pub max_sound_bytes: usize,
    pub seed_enabled: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let public_url = std::env::var("VSD_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Self {
            port,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:vsdeck.db?mode=rwc".to_string()),
            storage_path: std::env::var("VSD_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storage")),
            public_url,
            bucket: std::env::var("VSD_BUCKET")
                .ok()
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            max_sound_bytes: std::env::var("VSD_MAX_SOUND_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SOUND_BYTES),
            seed_enabled: std::env::var("VSD_SEED_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
