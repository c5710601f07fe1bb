use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_SOUND_BYTES;
use crate::error::AppError;
use crate::models::sound::{NewSound, Sound};
use crate::models::stream_deck_key::StreamDeckKey;
use crate::ports::{DurationProbe, SoundRepository, SoundStorage, StreamDeckKeyRepository, UploadFile};
use crate::services::naming::capitalize_and_remove_extension;
use crate::services::{ensure_sound_quota, new_id, provision_key, HotkeyPolicy};

/// Duration recorded when the file's metadata can't be read.
pub const FALLBACK_DURATION: f64 = 1.0;
const MIN_PROBED_DURATION: f64 = 0.001;

/// A clip whose file already lives somewhere reachable, e.g. seeded content.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedSound {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub url: String,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub enum UploadRequest {
    Record(ImportedSound),
    File { user_id: String, file: UploadFile },
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub sound: Sound,
    pub key: StreamDeckKey,
}

pub struct UploadSound {
    sounds: Arc<dyn SoundRepository>,
    keys: Arc<dyn StreamDeckKeyRepository>,
    storage: Option<Arc<dyn SoundStorage>>,
    probe: Option<Arc<dyn DurationProbe>>,
    max_file_bytes: usize,
}

impl UploadSound {
    pub fn new(sounds: Arc<dyn SoundRepository>, keys: Arc<dyn StreamDeckKeyRepository>) -> Self {
        Self {
            sounds,
            keys,
            storage: None,
            probe: None,
            max_file_bytes: DEFAULT_MAX_SOUND_BYTES,
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn SoundStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn DurationProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub async fn execute(&self, request: UploadRequest) -> Result<UploadOutcome, AppError> {
        match request {
            UploadRequest::Record(record) => self.import(record).await,
            UploadRequest::File { user_id, file } => self.upload(&user_id, &file).await,
        }
    }

    async fn import(&self, record: ImportedSound) -> Result<UploadOutcome, AppError> {
        let sound = Sound::create(NewSound {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            url: record.url,
            duration: record.duration,
            created_at: None,
        })?;

        self.sounds.add(&sound).await?;
        let key = self.key_for(&sound, None).await?;
        tracing::info!(user_id = sound.user_id(), sound_id = sound.id(), "imported sound");
        Ok(UploadOutcome { sound, key })
    }

    async fn upload(&self, user_id: &str, file: &UploadFile) -> Result<UploadOutcome, AppError> {
        if file.size() > self.max_file_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "file is too large, maximum is {}",
                describe_size(self.max_file_bytes)
            )));
        }

        ensure_sound_quota(self.sounds.as_ref(), user_id).await?;

        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| AppError::Internal("storage unavailable for upload".to_string()))?;

        let public_url = storage.upload_and_get_public_url(user_id, file).await?;

        let sound = match self.record_upload(user_id, file, &public_url).await {
            Ok(sound) => sound,
            Err(e) => {
                tracing::warn!(user_id, url = %public_url, "sound record failed, removing stored object: {e}");
                if let Err(undo) = storage.remove_by_public_url(&public_url).await {
                    tracing::warn!(url = %public_url, "failed to roll back stored object: {undo}");
                }
                return Err(e);
            }
        };

        let key = self.key_for(&sound, Some(storage.as_ref())).await?;
        tracing::info!(
            user_id,
            sound_id = sound.id(),
            position = key.position(),
            "uploaded sound"
        );
        Ok(UploadOutcome { sound, key })
    }

    async fn record_upload(
        &self,
        user_id: &str,
        file: &UploadFile,
        public_url: &str,
    ) -> Result<Sound, AppError> {
        let sound = Sound::create(NewSound {
            id: new_id(),
            user_id: user_id.to_string(),
            name: capitalize_and_remove_extension(&file.name),
            url: public_url.to_string(),
            duration: self.duration_of(file),
            created_at: None,
        })?;
        self.sounds.add(&sound).await?;
        Ok(sound)
    }

    fn duration_of(&self, file: &UploadFile) -> f64 {
        self.probe
            .as_ref()
            .and_then(|probe| probe.probe(file))
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.max(MIN_PROBED_DURATION))
            .unwrap_or(FALLBACK_DURATION)
    }

    /// Provisions the key for a freshly stored sound. If that fails the
    /// sound record is deleted again, along with the uploaded object when
    /// there is one, and the key error is returned.
    async fn key_for(
        &self,
        sound: &Sound,
        uploaded_to: Option<&dyn SoundStorage>,
    ) -> Result<StreamDeckKey, AppError> {
        let label = Some(sound.name().to_string());
        match provision_key(
            self.keys.as_ref(),
            sound.user_id(),
            sound.id(),
            label,
            HotkeyPolicy::Sequential,
        )
        .await
        {
            Ok(key) => Ok(key),
            Err(e) => {
                tracing::warn!(sound_id = sound.id(), "key creation failed, rolling back sound: {e}");
                if let Err(undo) = self.sounds.remove(sound.id(), sound.user_id()).await {
                    tracing::error!(sound_id = sound.id(), "failed to roll back sound record: {undo}");
                }
                if let Some(storage) = uploaded_to {
                    if let Err(undo) = storage.remove_by_public_url(sound.url()).await {
                        tracing::warn!(url = sound.url(), "failed to roll back stored object: {undo}");
                    }
                }
                Err(e)
            }
        }
    }
}

fn describe_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MB", bytes / (1024 * 1024))
    } else {
        format!("{} KB", bytes / 1024)
    }
}
