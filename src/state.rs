use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{SqliteSoundRepository, SqliteStreamDeckKeyRepository};
use crate::ports::{DurationProbe, SoundRepository, SoundStorage, StreamDeckKeyRepository};
use crate::probe::MetadataDurationProbe;
use crate::services::{
    EnsureStreamDeckKeyForSound, RemoveSound, UpdateStreamDeckKey, UploadSound,
};
use crate::storage::LocalSoundStorage;

#[derive(Clone)]
pub struct AppState {
    pub sounds: Arc<dyn SoundRepository>,
    pub keys: Arc<dyn StreamDeckKeyRepository>,
    pub storage: Arc<dyn SoundStorage>,
    pub probe: Arc<dyn DurationProbe>,
    pub storage_path: PathBuf,
    pub public_url: String,
    pub bucket: String,
    pub max_sound_bytes: usize,
    pub seed_enabled: bool,
}

impl AppState {
    /// SQLite repositories and local bucket storage for `config`.
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        let storage = LocalSoundStorage::new(&config.storage_path, &config.bucket, &config.public_url);
        Self {
            sounds: Arc::new(SqliteSoundRepository::new(db.clone())),
            keys: Arc::new(SqliteStreamDeckKeyRepository::new(db.clone())),
            storage: Arc::new(storage),
            probe: Arc::new(MetadataDurationProbe),
            storage_path: config.storage_path.clone(),
            public_url: config.public_url.clone(),
            bucket: config.bucket.clone(),
            max_sound_bytes: config.max_sound_bytes,
            seed_enabled: config.seed_enabled,
        }
    }

    pub fn upload_sound(&self) -> UploadSound {
        UploadSound::new(self.sounds.clone(), self.keys.clone())
            .with_storage(self.storage.clone())
            .with_probe(self.probe.clone())
            .with_max_file_bytes(self.max_sound_bytes)
    }

    pub fn remove_sound(&self) -> RemoveSound {
        RemoveSound::new(
            self.sounds.clone(),
            self.keys.clone(),
            self.storage.clone(),
            &self.bucket,
        )
    }

    pub fn ensure_key(&self) -> EnsureStreamDeckKeyForSound {
        EnsureStreamDeckKeyForSound::new(self.sounds.clone(), self.keys.clone())
    }

    pub fn update_key(&self) -> UpdateStreamDeckKey {
        UpdateStreamDeckKey::new(self.sounds.clone(), self.keys.clone())
    }
}
