use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{format_timestamp, parse_timestamp};
use crate::error::AppError;
use crate::models::stream_deck_key::{NewStreamDeckKey, StreamDeckKey};
use crate::ports::StreamDeckKeyRepository;

type KeyRow = (
    String,
    String,
    Option<String>,
    i64,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
    String,
);

fn row_to_key(row: KeyRow) -> Result<StreamDeckKey, AppError> {
    StreamDeckKey::create(NewStreamDeckKey {
        id: row.0,
        user_id: row.1,
        sound_id: row.2,
        position: row.3,
        label: row.4,
        color: Some(row.5),
        icon: row.6,
        hotkey: row.7,
        created_at: Some(parse_timestamp(&row.8)?),
    })
}

const SELECT_KEYS: &str = "SELECT id, user_id, sound_id, position, label, color, icon, hotkey, created_at FROM stream_deck_keys";

const UPSERT_KEY: &str = "INSERT INTO stream_deck_keys (id, user_id, sound_id, position, label, color, icon, hotkey, created_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
     ON CONFLICT (id) DO UPDATE SET sound_id = excluded.sound_id, position = excluded.position, \
     label = excluded.label, color = excluded.color, icon = excluded.icon, hotkey = excluded.hotkey \
     WHERE stream_deck_keys.user_id = excluded.user_id";

/// Ordered by position.
pub async fn list_keys(pool: &SqlitePool, user_id: &str) -> Result<Vec<StreamDeckKey>, AppError> {
    let rows = sqlx::query_as::<_, KeyRow>(&format!(
        "{SELECT_KEYS} WHERE user_id = ? ORDER BY position ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_key).collect()
}

pub async fn insert_key(pool: &SqlitePool, key: &StreamDeckKey) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO stream_deck_keys (id, user_id, sound_id, position, label, color, icon, hotkey, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(key.id())
    .bind(key.user_id())
    .bind(key.sound_id())
    .bind(key.position())
    .bind(key.label())
    .bind(key.color())
    .bind(key.icon())
    .bind(key.hotkey())
    .bind(format_timestamp(key.created_at()))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_key(pool: &SqlitePool, key: &StreamDeckKey) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE stream_deck_keys SET sound_id = ?, position = ?, label = ?, color = ?, icon = ?, hotkey = ? WHERE id = ? AND user_id = ?",
    )
    .bind(key.sound_id())
    .bind(key.position())
    .bind(key.label())
    .bind(key.color())
    .bind(key.icon())
    .bind(key.hotkey())
    .bind(key.id())
    .bind(key.user_id())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("unknown_key".to_string()));
    }
    Ok(())
}

/// All-or-nothing: either every key is written or none is.
pub async fn upsert_keys(pool: &SqlitePool, keys: &[StreamDeckKey]) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for key in keys {
        sqlx::query(UPSERT_KEY)
            .bind(key.id())
            .bind(key.user_id())
            .bind(key.sound_id())
            .bind(key.position())
            .bind(key.label())
            .bind(key.color())
            .bind(key.icon())
            .bind(key.hotkey())
            .bind(format_timestamp(key.created_at()))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn delete_keys_for_sound(
    pool: &SqlitePool,
    user_id: &str,
    sound_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM stream_deck_keys WHERE user_id = ? AND sound_id = ?")
        .bind(user_id)
        .bind(sound_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[derive(Clone)]
pub struct SqliteStreamDeckKeyRepository {
    pool: SqlitePool,
}

impl SqliteStreamDeckKeyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StreamDeckKeyRepository for SqliteStreamDeckKeyRepository {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<StreamDeckKey>, AppError> {
        list_keys(&self.pool, user_id).await
    }

    async fn add(&self, key: &StreamDeckKey) -> Result<(), AppError> {
        insert_key(&self.pool, key).await
    }

    async fn update(&self, key: &StreamDeckKey) -> Result<(), AppError> {
        update_key(&self.pool, key).await
    }

    async fn upsert_batch(&self, keys: &[StreamDeckKey]) -> Result<(), AppError> {
        upsert_keys(&self.pool, keys).await
    }

    async fn remove_by_sound_id(&self, user_id: &str, sound_id: &str) -> Result<u64, AppError> {
        delete_keys_for_sound(&self.pool, user_id, sound_id).await
    }
}
