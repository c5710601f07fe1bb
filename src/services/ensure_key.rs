use std::sync::Arc;

use crate::error::AppError;
use crate::models::stream_deck_key::StreamDeckKey;
use crate::ports::{SoundRepository, StreamDeckKeyRepository};
use crate::services::{provision_key, HotkeyPolicy};

/// Get-or-create the key bound to a sound. Repeated calls for the same
/// `(user, sound)` return the existing key without writing anything.
pub struct EnsureStreamDeckKeyForSound {
    sounds: Arc<dyn SoundRepository>,
    keys: Arc<dyn StreamDeckKeyRepository>,
}

impl EnsureStreamDeckKeyForSound {
    pub fn new(sounds: Arc<dyn SoundRepository>, keys: Arc<dyn StreamDeckKeyRepository>) -> Self {
        Self { sounds, keys }
    }

    pub async fn execute(&self, user_id: &str, sound_id: &str) -> Result<StreamDeckKey, AppError> {
        let existing = self.keys.list_by_user(user_id).await?;
        if let Some(key) = existing.into_iter().find(|k| k.is_bound_to(sound_id)) {
            tracing::debug!(user_id, sound_id, key_id = key.id(), "key already exists");
            return Ok(key);
        }

        // Only the caller's own sound names the key; otherwise it stays unlabelled.
        let label = self
            .sounds
            .find_by_id(sound_id)
            .await?
            .filter(|sound| sound.is_owned_by(user_id))
            .map(|sound| sound.name().to_string());

        provision_key(
            self.keys.as_ref(),
            user_id,
            sound_id,
            label,
            HotkeyPolicy::Unassigned,
        )
        .await
    }
}
