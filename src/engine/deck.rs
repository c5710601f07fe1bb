use std::sync::Arc;

use crate::engine::grid::GridStore;
use crate::engine::hotkeys::{HotkeyDispatcher, HotkeyListener};
use crate::engine::library::Library;
use crate::engine::playback::AudioBackend;
use crate::engine::reorder::ReorderCoordinator;
use crate::error::AppError;
use crate::models::sound::Sound;
use crate::models::stream_deck_key::StreamDeckKey;
use crate::ports::StreamDeckKeyRepository;
use crate::services::{RemovalReport, UploadOutcome};

/// Client-side state for one signed-in user: the clip library with its
/// playback, the key grid and the hotkeys derived from it. Service results
/// are folded in through the `apply_*` methods.
pub struct Deck {
    library: Library,
    grid: GridStore,
    hotkeys: HotkeyDispatcher,
    reorder: ReorderCoordinator,
}

impl Deck {
    pub fn new(backend: Arc<dyn AudioBackend>, keys: Arc<dyn StreamDeckKeyRepository>) -> Self {
        Self {
            library: Library::new(backend),
            grid: GridStore::default(),
            hotkeys: HotkeyDispatcher::new(),
            reorder: ReorderCoordinator::new(keys),
        }
    }

    pub fn with_hotkey_listener(mut self, listener: Box<dyn HotkeyListener>) -> Self {
        self.hotkeys = HotkeyDispatcher::with_listener(listener);
        self.refresh_hotkeys();
        self
    }

    pub fn load(&mut self, sounds: Vec<Sound>, keys: Vec<StreamDeckKey>) {
        self.library.set_sounds(sounds);
        self.grid.replace(keys);
        self.refresh_hotkeys();
    }

    pub fn apply_upload(&mut self, outcome: &UploadOutcome) {
        self.library.add_sound(outcome.sound.clone());
        self.grid.push(outcome.key.clone());
        self.refresh_hotkeys();
    }

    pub fn apply_removal(&mut self, report: &RemovalReport) {
        let sound_id = report.sound.id();
        self.library.remove_sound(sound_id);
        self.grid.remove_for_sound(sound_id);
        self.refresh_hotkeys();
    }

    /// Fold in a created or edited key.
    pub fn apply_key(&mut self, key: StreamDeckKey) {
        self.grid.upsert(key);
        self.refresh_hotkeys();
    }

    pub fn play(&mut self, sound_id: &str) -> bool {
        self.library.playback_mut().play(sound_id)
    }

    pub fn stop(&mut self, sound_id: &str) {
        self.library.playback_mut().stop(sound_id);
    }

    pub fn stop_all(&mut self) {
        self.library.playback_mut().stop_all();
    }

    /// A physical key combination was pressed.
    pub fn press(&mut self, combo: &str) -> Option<String> {
        self.hotkeys.dispatch(combo, self.library.playback_mut())
    }

    pub async fn move_key(&mut self, from: usize, to: usize) -> Result<bool, AppError> {
        let result = self.reorder.move_key(&self.grid, from, to).await;
        self.refresh_hotkeys();
        result
    }

    pub async fn reorder(&mut self, new_sequence: Vec<StreamDeckKey>) -> Result<(), AppError> {
        let result = self.reorder.reorder(&self.grid, new_sequence).await;
        self.refresh_hotkeys();
        result
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn hotkeys(&self) -> &HotkeyDispatcher {
        &self.hotkeys
    }

    fn refresh_hotkeys(&mut self) {
        let keys = self.grid.snapshot();
        self.hotkeys.sync(&keys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::playback::testing::{sound, FakeBackend};
    use crate::memory::InMemoryStreamDeckKeyRepository;
    use crate::models::stream_deck_key::NewStreamDeckKey;
    use crate::services::CleanupOutcome;

    fn bound_key(id: &str, position: i64, sound_id: &str) -> StreamDeckKey {
        StreamDeckKey::create(NewStreamDeckKey {
            id: id.to_string(),
            user_id: "u1".to_string(),
            sound_id: Some(sound_id.to_string()),
            position,
            hotkey: Some(format!("ctrl+{}", position + 1)),
            ..Default::default()
        })
        .unwrap()
    }

    fn deck() -> (Arc<FakeBackend>, Deck) {
        let backend = Arc::new(FakeBackend::default());
        let keys = Arc::new(InMemoryStreamDeckKeyRepository::new());
        let mut deck = Deck::new(backend.clone(), keys);
        deck.load(
            vec![sound("a"), sound("b")],
            vec![bound_key("ka", 0, "a"), bound_key("kb", 1, "b")],
        );
        (backend, deck)
    }

    #[test]
    fn test_press_plays_exclusively() {
        let (backend, mut deck) = deck();
        assert_eq!(deck.press("ctrl+1").as_deref(), Some("a"));
        assert_eq!(deck.press("Ctrl+2").as_deref(), Some("b"));
        assert!(!backend.is_playing("a"));
        assert!(backend.is_playing("b"));
        assert_eq!(deck.library().playback().currently_playing().as_deref(), Some("b"));
    }

    #[test]
    fn test_apply_upload_and_removal() {
        let (_backend, mut deck) = deck();
        deck.apply_upload(&UploadOutcome {
            sound: sound("c"),
            key: bound_key("kc", 2, "c"),
        });
        assert_eq!(deck.press("ctrl+3").as_deref(), Some("c"));

        deck.apply_removal(&RemovalReport {
            sound: sound("c"),
            keys_removed: 1,
            cleanup: CleanupOutcome::Removed,
        });
        assert!(deck.library().get("c").is_none());
        assert!(deck.grid().find_by_sound("c").is_none());
        assert_eq!(deck.press("ctrl+3"), None);
        assert_eq!(deck.library().playback().currently_playing(), None);
    }

    #[tokio::test]
    async fn test_move_key_keeps_hotkeys_in_sync() {
        let (_backend, mut deck) = deck();
        let rebinds = deck.hotkeys().rebind_count();
        assert!(deck.move_key(0, 1).await.unwrap());
        let order: Vec<String> = deck
            .grid()
            .snapshot()
            .iter()
            .map(|k| k.id().to_string())
            .collect();
        assert_eq!(order, ["kb", "ka"]);
        // Order of the bound pairs changed, so the listener is refreshed.
        assert_eq!(deck.hotkeys().rebind_count(), rebinds + 1);
        assert_eq!(deck.press("ctrl+1").as_deref(), Some("a"));
    }
}
