use std::sync::Arc;

use serde::Serialize;

use crate::error::AppError;
use crate::models::sound::Sound;
use crate::ports::{SoundRepository, SoundStorage, StreamDeckKeyRepository};
use crate::storage::{is_owned_object, is_shared_object, object_path_in_bucket};

/// What happened to the stored object after the records were deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Removed,
    /// Lives in the shared namespace and is kept.
    SkippedShared,
    /// URL doesn't point into the managed bucket.
    SkippedUnmanaged,
    /// Lives in another user's namespace and is kept.
    SkippedForeign,
    /// Malformed URL or storage error. Not propagated.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovalReport {
    pub sound: Sound,
    pub keys_removed: u64,
    pub cleanup: CleanupOutcome,
}

pub struct RemoveSound {
    sounds: Arc<dyn SoundRepository>,
    keys: Arc<dyn StreamDeckKeyRepository>,
    storage: Arc<dyn SoundStorage>,
    bucket: String,
}

impl RemoveSound {
    pub fn new(
        sounds: Arc<dyn SoundRepository>,
        keys: Arc<dyn StreamDeckKeyRepository>,
        storage: Arc<dyn SoundStorage>,
        bucket: &str,
    ) -> Self {
        Self {
            sounds,
            keys,
            storage,
            bucket: bucket.to_string(),
        }
    }

    pub async fn execute(&self, sound_id: &str, user_id: &str) -> Result<RemovalReport, AppError> {
        let sound = self
            .sounds
            .find_by_id(sound_id)
            .await?
            .ok_or_else(|| AppError::NotFound("sound not found".to_string()))?;

        if !sound.is_owned_by(user_id) {
            return Err(AppError::Unauthorized(
                "not allowed to remove this sound".to_string(),
            ));
        }

        self.sounds.remove(sound_id, user_id).await?;
        let keys_removed = self.keys.remove_by_sound_id(user_id, sound_id).await?;

        let cleanup = self.clean_up_storage(sound.url(), user_id).await;
        match &cleanup {
            CleanupOutcome::Failed(reason) => {
                tracing::warn!(sound_id, url = sound.url(), "storage cleanup failed: {reason}")
            }
            outcome => tracing::debug!(sound_id, ?outcome, "storage cleanup"),
        }

        tracing::info!(user_id, sound_id, keys_removed, "removed sound");
        Ok(RemovalReport {
            sound,
            keys_removed,
            cleanup,
        })
    }

    async fn clean_up_storage(&self, url: &str, user_id: &str) -> CleanupOutcome {
        let object_path = match object_path_in_bucket(url, &self.bucket) {
            Ok(Some(path)) => path,
            Ok(None) => return CleanupOutcome::SkippedUnmanaged,
            Err(e) => return CleanupOutcome::Failed(e.to_string()),
        };

        if is_shared_object(&object_path) {
            return CleanupOutcome::SkippedShared;
        }

        if !is_owned_object(&object_path, user_id) {
            return CleanupOutcome::SkippedForeign;
        }

        match self.storage.remove_by_public_url(url).await {
            Ok(()) => CleanupOutcome::Removed,
            Err(e) => CleanupOutcome::Failed(e.to_string()),
        }
    }
}
