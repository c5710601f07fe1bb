use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub type SoundId = String;
pub type UserId = String;

/// One uploaded audio clip. Fields are fixed at construction; a changed clip
/// is a new `Sound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NewSound")]
pub struct Sound {
    id: SoundId,
    user_id: UserId,
    name: String,
    url: String,
    duration: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSound {
    pub id: SoundId,
    pub user_id: UserId,
    pub name: String,
    pub url: String,
    pub duration: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Sound {
    pub fn create(input: NewSound) -> Result<Self, AppError> {
        // Written so NaN is rejected too.
        if !(input.duration > 0.0) {
            return Err(AppError::Validation(format!(
                "duration must be > 0, got {}",
                input.duration
            )));
        }

        Ok(Self {
            id: input.id,
            user_id: input.user_id,
            name: input.name,
            url: input.url,
            duration: input.duration,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Length in seconds, always positive.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl TryFrom<NewSound> for Sound {
    type Error = AppError;

    fn try_from(input: NewSound) -> Result<Self, Self::Error> {
        Sound::create(input)
    }
}
