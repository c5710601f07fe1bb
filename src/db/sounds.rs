use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{format_timestamp, parse_timestamp};
use crate::error::AppError;
use crate::models::sound::{NewSound, Sound};
use crate::ports::SoundRepository;

type SoundRow = (String, String, String, String, f64, String);

fn row_to_sound(row: SoundRow) -> Result<Sound, AppError> {
    Sound::create(NewSound {
        id: row.0,
        user_id: row.1,
        name: row.2,
        url: row.3,
        duration: row.4,
        created_at: Some(parse_timestamp(&row.5)?),
    })
}

const SELECT_SOUNDS: &str = "SELECT id, user_id, name, url, duration, created_at FROM sounds";

pub async fn get_sound(pool: &SqlitePool, sound_id: &str) -> Result<Option<Sound>, AppError> {
    let row = sqlx::query_as::<_, SoundRow>(&format!("{SELECT_SOUNDS} WHERE id = ?"))
        .bind(sound_id)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_sound).transpose()
}

/// Newest first.
pub async fn list_sounds(pool: &SqlitePool, user_id: &str) -> Result<Vec<Sound>, AppError> {
    let rows = sqlx::query_as::<_, SoundRow>(&format!(
        "{SELECT_SOUNDS} WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_sound).collect()
}

pub async fn insert_sound(pool: &SqlitePool, sound: &Sound) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO sounds (id, user_id, name, url, duration, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(sound.id())
    .bind(sound.user_id())
    .bind(sound.name())
    .bind(sound.url())
    .bind(sound.duration())
    .bind(format_timestamp(sound.created_at()))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_sound(pool: &SqlitePool, sound_id: &str, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sounds WHERE id = ? AND user_id = ?")
        .bind(sound_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[derive(Clone)]
pub struct SqliteSoundRepository {
    pool: SqlitePool,
}

impl SqliteSoundRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SoundRepository for SqliteSoundRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Sound>, AppError> {
        get_sound(&self.pool, id).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Sound>, AppError> {
        list_sounds(&self.pool, user_id).await
    }

    async fn add(&self, sound: &Sound) -> Result<(), AppError> {
        insert_sound(&self.pool, sound).await
    }

    async fn remove(&self, id: &str, user_id: &str) -> Result<(), AppError> {
        delete_sound(&self.pool, id, user_id).await
    }
}
