//! Process-local adapters for every port. Used by the test suites and for
//! throwaway runs; each one can be told to fail so error paths are reachable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::sound::Sound;
use crate::models::stream_deck_key::StreamDeckKey;
use crate::ports::{SoundRepository, SoundStorage, StreamDeckKeyRepository, UploadFile};

fn injected(what: &str) -> AppError {
    AppError::Internal(format!("injected failure: {what}"))
}

#[derive(Default)]
pub struct InMemorySoundRepository {
    items: DashMap<String, Sound>,
    writes: AtomicUsize,
    fail_add: AtomicBool,
}

impl InMemorySoundRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `add`/`remove` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn fail_add(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SoundRepository for InMemorySoundRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Sound>, AppError> {
        Ok(self.items.get(id).map(|s| s.value().clone()))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Sound>, AppError> {
        Ok(self
            .items
            .iter()
            .filter(|s| s.is_owned_by(user_id))
            .map(|s| s.value().clone())
            .collect())
    }

    async fn add(&self, sound: &Sound) -> Result<(), AppError> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(injected("sound add"));
        }
        self.items.insert(sound.id().to_string(), sound.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, id: &str, user_id: &str) -> Result<(), AppError> {
        // Someone else's clip is left alone.
        let removed = self.items.remove_if(id, |_, s| s.is_owned_by(user_id));
        if removed.is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStreamDeckKeyRepository {
    items: DashMap<String, StreamDeckKey>,
    add_calls: AtomicUsize,
    writes: AtomicUsize,
    fail_add: AtomicBool,
    fail_upsert: AtomicBool,
}

impl InMemoryStreamDeckKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `add` calls, failed ones included.
    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    /// Number of successful mutating calls of any kind.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_add(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upsert(&self, fail: bool) {
        self.fail_upsert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StreamDeckKeyRepository for InMemoryStreamDeckKeyRepository {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<StreamDeckKey>, AppError> {
        let mut keys: Vec<StreamDeckKey> = self
            .items
            .iter()
            .filter(|k| k.user_id() == user_id)
            .map(|k| k.value().clone())
            .collect();
        keys.sort_by_key(|k| k.position());
        Ok(keys)
    }

    async fn add(&self, key: &StreamDeckKey) -> Result<(), AppError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(injected("key add"));
        }
        self.items.insert(key.id().to_string(), key.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, key: &StreamDeckKey) -> Result<(), AppError> {
        match self.items.get_mut(key.id()) {
            Some(mut slot) if slot.user_id() == key.user_id() => {
                *slot = key.clone();
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            _ => Err(AppError::NotFound("unknown_key".to_string())),
        }
    }

    async fn upsert_batch(&self, keys: &[StreamDeckKey]) -> Result<(), AppError> {
        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(injected("key upsert"));
        }
        for key in keys {
            self.items.insert(key.id().to_string(), key.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_by_sound_id(&self, user_id: &str, sound_id: &str) -> Result<u64, AppError> {
        let before = self.items.len();
        self.items
            .retain(|_, k| !(k.user_id() == user_id && k.is_bound_to(sound_id)));
        let removed = (before - self.items.len()) as u64;
        if removed > 0 {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}

/// Hands out `https://storage.test/...` URLs following the public-bucket
/// layout and records every call.
pub struct InMemorySoundStorage {
    bucket: String,
    uploads: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
    fail_remove: AtomicBool,
}

impl InMemorySoundStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            uploads: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            fail_remove: AtomicBool::new(false),
        }
    }

    pub async fn uploads(&self) -> Vec<String> {
        self.uploads.lock().await.clone()
    }

    pub async fn removed(&self) -> Vec<String> {
        self.removed.lock().await.clone()
    }

    pub fn fail_remove(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemorySoundStorage {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BUCKET)
    }
}

#[async_trait]
impl SoundStorage for InMemorySoundStorage {
    async fn upload_and_get_public_url(
        &self,
        user_id: &str,
        file: &UploadFile,
    ) -> Result<String, AppError> {
        let url = format!(
            "https://storage.test/storage/v1/object/public/{}/{}/{}",
            self.bucket, user_id, file.name
        );
        self.uploads.lock().await.push(url.clone());
        Ok(url)
    }

    async fn remove_by_public_url(&self, public_url: &str) -> Result<(), AppError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(injected("storage remove"));
        }
        self.removed.lock().await.push(public_url.to_string());
        Ok(())
    }
}
