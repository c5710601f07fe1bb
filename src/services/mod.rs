//! Application services. Each one exposes a single `execute` and runs its
//! side effects strictly in the documented order.

pub mod ensure_key;
pub mod naming;
pub mod remove_sound;
pub mod update_key;
pub mod upload_sound;

pub use ensure_key::EnsureStreamDeckKeyForSound;
pub use remove_sound::{CleanupOutcome, RemovalReport, RemoveSound};
pub use update_key::{KeyUpdate, UpdateStreamDeckKey};
pub use upload_sound::{ImportedSound, UploadOutcome, UploadRequest, UploadSound};

use crate::error::AppError;
use crate::models::stream_deck_key::{NewStreamDeckKey, StreamDeckKey};
use crate::ports::{SoundRepository, StreamDeckKeyRepository};

/// Clips a single user may own.
pub const MAX_SOUNDS_PER_USER: usize = 9;

/// Color of keys created by the services.
pub const PROVISIONED_KEY_COLOR: &str = "#FF5733";

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One past the highest occupied position, `0` on an empty grid.
pub fn next_position(keys: &[StreamDeckKey]) -> i64 {
    keys.iter().map(|k| k.position()).max().unwrap_or(-1) + 1
}

/// Shortcut handed to the key at `position`: `ctrl+1` for the first slot.
pub fn hotkey_for_position(position: i64) -> String {
    format!("ctrl+{}", position + 1).to_lowercase()
}

/// Fails with `QuotaExceeded` once `user_id` owns `MAX_SOUNDS_PER_USER` clips.
pub async fn ensure_sound_quota(sounds: &dyn SoundRepository, user_id: &str) -> Result<(), AppError> {
    let existing = sounds.list_by_user(user_id).await?;
    if existing.len() >= MAX_SOUNDS_PER_USER {
        return Err(AppError::QuotaExceeded(format!(
            "you have reached the limit of {MAX_SOUNDS_PER_USER} sounds"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HotkeyPolicy {
    Sequential,
    Unassigned,
}

/// Appends a key bound to `sound_id` after the user's last key.
pub(crate) async fn provision_key(
    keys: &dyn StreamDeckKeyRepository,
    user_id: &str,
    sound_id: &str,
    label: Option<String>,
    hotkey: HotkeyPolicy,
) -> Result<StreamDeckKey, AppError> {
    let existing = keys.list_by_user(user_id).await?;
    let position = next_position(&existing);

    let key = StreamDeckKey::create(NewStreamDeckKey {
        id: new_id(),
        user_id: user_id.to_string(),
        sound_id: Some(sound_id.to_string()),
        position,
        label,
        color: Some(PROVISIONED_KEY_COLOR.to_string()),
        icon: None,
        hotkey: match hotkey {
            HotkeyPolicy::Sequential => Some(hotkey_for_position(position)),
            HotkeyPolicy::Unassigned => None,
        },
        created_at: None,
    })?;

    keys.add(&key).await?;
    tracing::debug!(user_id, sound_id, position, "provisioned stream deck key");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_at(position: i64) -> StreamDeckKey {
        StreamDeckKey::create(NewStreamDeckKey {
            id: format!("k{position}"),
            user_id: "u1".to_string(),
            position,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_next_position() {
        assert_eq!(next_position(&[]), 0);
        assert_eq!(next_position(&[key_at(0), key_at(2)]), 3);
        assert_eq!(next_position(&[key_at(5)]), 6);
    }

    #[test]
    fn test_hotkey_for_position() {
        assert_eq!(hotkey_for_position(0), "ctrl+1");
        assert_eq!(hotkey_for_position(8), "ctrl+9");
    }
}
