//! Contracts the services consume. Every call may fail; adapters report
//! failures to the caller and never swallow them.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::sound::Sound;
use crate::models::stream_deck_key::StreamDeckKey;

#[async_trait]
pub trait SoundRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Sound>, AppError>;
    /// No ordering guarantee.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Sound>, AppError>;
    async fn add(&self, sound: &Sound) -> Result<(), AppError>;
    async fn remove(&self, id: &str, user_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait StreamDeckKeyRepository: Send + Sync {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<StreamDeckKey>, AppError>;
    async fn add(&self, key: &StreamDeckKey) -> Result<(), AppError>;
    /// Replaces a stored key. `NotFound` when the user has no key with that id.
    async fn update(&self, key: &StreamDeckKey) -> Result<(), AppError>;
    /// Inserts or replaces every key in one batch.
    async fn upsert_batch(&self, keys: &[StreamDeckKey]) -> Result<(), AppError>;
    /// Returns how many keys were removed.
    async fn remove_by_sound_id(&self, user_id: &str, sound_id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait SoundStorage: Send + Sync {
    /// Stores the file under the user's namespace and returns its public URL.
    async fn upload_and_get_public_url(
        &self,
        user_id: &str,
        file: &UploadFile,
    ) -> Result<String, AppError>;
    async fn remove_by_public_url(&self, public_url: &str) -> Result<(), AppError>;
}

/// Reads the playing time of an uploaded file. `None` when it can't tell.
pub trait DurationProbe: Send + Sync {
    fn probe(&self, file: &UploadFile) -> Option<f64>;
}

/// Raw file as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
