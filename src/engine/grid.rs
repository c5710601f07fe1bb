use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::stream_deck_key::StreamDeckKey;

/// Shared, position-ordered snapshot of the user's keys. Clones point at the
/// same snapshot; locks are never held across an await.
#[derive(Clone, Default)]
pub struct GridStore {
    keys: Arc<RwLock<Vec<StreamDeckKey>>>,
}

impl GridStore {
    pub fn new(keys: Vec<StreamDeckKey>) -> Self {
        let store = Self::default();
        store.replace(keys);
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<StreamDeckKey>> {
        self.keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<StreamDeckKey>> {
        self.keys.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<StreamDeckKey> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn replace(&self, mut keys: Vec<StreamDeckKey>) {
        keys.sort_by_key(|k| k.position());
        *self.write() = keys;
    }

    pub fn push(&self, key: StreamDeckKey) {
        self.upsert(key);
    }

    /// Insert `key`, or replace the key with the same id.
    pub fn upsert(&self, key: StreamDeckKey) {
        let mut keys = self.write();
        match keys.iter_mut().find(|k| k.id() == key.id()) {
            Some(slot) => *slot = key,
            None => keys.push(key),
        }
        keys.sort_by_key(|k| k.position());
    }

    /// Drop every key bound to `sound_id`. Returns how many went.
    pub fn remove_for_sound(&self, sound_id: &str) -> usize {
        let mut keys = self.write();
        let before = keys.len();
        keys.retain(|k| !k.is_bound_to(sound_id));
        before - keys.len()
    }

    pub fn find_by_sound(&self, sound_id: &str) -> Option<StreamDeckKey> {
        self.read().iter().find(|k| k.is_bound_to(sound_id)).cloned()
    }
}
