use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::sound::{SoundId, UserId};

pub type KeyId = String;

/// Color given to a key when none is supplied.
pub const DEFAULT_KEY_COLOR: &str = "#00ffff";

/// One slot of a user's grid, optionally bound to a sound and a shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NewStreamDeckKey")]
pub struct StreamDeckKey {
    id: KeyId,
    user_id: UserId,
    sound_id: Option<SoundId>,
    position: i64,
    label: Option<String>,
    color: String,
    icon: Option<String>,
    hotkey: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStreamDeckKey {
    pub id: KeyId,
    pub user_id: UserId,
    #[serde(default)]
    pub sound_id: Option<SoundId>,
    pub position: i64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub hotkey: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl StreamDeckKey {
    pub fn create(input: NewStreamDeckKey) -> Result<Self, AppError> {
        if input.position < 0 {
            return Err(AppError::Validation(format!(
                "position must be >= 0, got {}",
                input.position
            )));
        }

        Ok(Self {
            id: input.id,
            user_id: input.user_id,
            sound_id: input.sound_id,
            position: input.position,
            label: input.label,
            color: input
                .color
                .unwrap_or_else(|| DEFAULT_KEY_COLOR.to_string()),
            icon: input.icon,
            hotkey: input.hotkey,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        })
    }

    /// Field-for-field copy, used as the base when rebuilding a key.
    pub fn to_new(&self) -> NewStreamDeckKey {
        NewStreamDeckKey {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            sound_id: self.sound_id.clone(),
            position: self.position,
            label: self.label.clone(),
            color: Some(self.color.clone()),
            icon: self.icon.clone(),
            hotkey: self.hotkey.clone(),
            created_at: Some(self.created_at),
        }
    }

    /// Same key at another grid position.
    pub fn with_position(&self, position: i64) -> Result<Self, AppError> {
        Self::create(NewStreamDeckKey {
            position,
            ..self.to_new()
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn sound_id(&self) -> Option<&str> {
        self.sound_id.as_deref()
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn hotkey(&self) -> Option<&str> {
        self.hotkey.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_bound_to(&self, sound_id: &str) -> bool {
        self.sound_id.as_deref() == Some(sound_id)
    }
}

impl TryFrom<NewStreamDeckKey> for StreamDeckKey {
    type Error = AppError;

    fn try_from(input: NewStreamDeckKey) -> Result<Self, Self::Error> {
        StreamDeckKey::create(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_key(position: i64) -> NewStreamDeckKey {
        NewStreamDeckKey {
            id: "k1".to_string(),
            user_id: "u1".to_string(),
            position,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let key = StreamDeckKey::create(new_key(0)).unwrap();
        assert_eq!(key.position(), 0);
        assert_eq!(key.color(), DEFAULT_KEY_COLOR);
        assert!(key.sound_id().is_none());
        assert!(key.label().is_none());
        assert!(key.icon().is_none());
        assert!(key.hotkey().is_none());
    }

    #[test]
    fn test_rejects_negative_position() {
        for p in [-1, -42, i64::MIN] {
            let err = StreamDeckKey::create(new_key(p)).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "position {p}");
        }
    }

    #[test]
    fn test_with_position_keeps_other_fields() {
        let key = StreamDeckKey::create(NewStreamDeckKey {
            sound_id: Some("s1".to_string()),
            label: Some("Airhorn".to_string()),
            color: Some("#FF5733".to_string()),
            hotkey: Some("ctrl+1".to_string()),
            ..new_key(3)
        })
        .unwrap();

        let moved = key.with_position(0).unwrap();
        assert_eq!(moved.position(), 0);
        assert_eq!(moved.id(), key.id());
        assert_eq!(moved.label(), Some("Airhorn"));
        assert_eq!(moved.color(), "#FF5733");
        assert_eq!(moved.hotkey(), Some("ctrl+1"));
        assert_eq!(moved.created_at(), key.created_at());
        assert!(moved.is_bound_to("s1"));

        assert!(key.with_position(-1).is_err());
    }

    #[test]
    fn test_deserialize_rejects_negative_position() {
        let res = serde_json::from_value::<StreamDeckKey>(serde_json::json!({
            "id": "k1",
            "user_id": "u1",
            "position": -3
        }));
        assert!(res.is_err());
    }
}
