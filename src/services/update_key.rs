use std::sync::Arc;

use serde::Deserialize;

use crate::engine::hotkeys::normalize_combo;
use crate::error::AppError;
use crate::models::stream_deck_key::{NewStreamDeckKey, StreamDeckKey};
use crate::ports::{SoundRepository, StreamDeckKeyRepository};

/// New values for a key's editable fields. The key is replaced as a whole:
/// `None` clears a field, except `color`, where it keeps the current one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyUpdate {
    #[serde(default)]
    pub sound_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub hotkey: Option<String>,
}

pub struct UpdateStreamDeckKey {
    sounds: Arc<dyn SoundRepository>,
    keys: Arc<dyn StreamDeckKeyRepository>,
}

impl UpdateStreamDeckKey {
    pub fn new(sounds: Arc<dyn SoundRepository>, keys: Arc<dyn StreamDeckKeyRepository>) -> Self {
        Self { sounds, keys }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        key_id: &str,
        update: KeyUpdate,
    ) -> Result<StreamDeckKey, AppError> {
        let current = self
            .keys
            .list_by_user(user_id)
            .await?
            .into_iter()
            .find(|k| k.id() == key_id)
            .ok_or_else(|| AppError::NotFound("unknown_key".to_string()))?;

        if let Some(ref sound_id) = update.sound_id {
            let sound = self
                .sounds
                .find_by_id(sound_id)
                .await?
                .ok_or_else(|| AppError::NotFound("unknown_sound".to_string()))?;
            if !sound.is_owned_by(user_id) {
                return Err(AppError::Unauthorized(
                    "cannot bind a sound you don't own".to_string(),
                ));
            }
        }

        let base = current.to_new();
        let key = StreamDeckKey::create(NewStreamDeckKey {
            sound_id: update.sound_id,
            label: update.label.filter(|l| !l.trim().is_empty()),
            color: update.color.or(base.color.clone()),
            icon: update.icon,
            hotkey: update.hotkey.as_deref().and_then(normalize_combo),
            ..base
        })?;

        self.keys.update(&key).await?;
        tracing::info!(user_id, key_id, "updated stream deck key");
        Ok(key)
    }
}
