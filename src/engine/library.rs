use std::sync::Arc;

use crate::engine::playback::{AudioBackend, PlaybackEngine};
use crate::models::sound::Sound;

/// The user's clips plus one playback handle per clip. Handles follow the
/// snapshot: every add acquires, every removal disposes.
pub struct Library {
    sounds: Vec<Sound>,
    playback: PlaybackEngine,
}

impl Library {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            sounds: Vec::new(),
            playback: PlaybackEngine::new(backend),
        }
    }

    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn get(&self, sound_id: &str) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id() == sound_id)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Swap in a whole new snapshot. All previous handles go first.
    pub fn set_sounds(&mut self, sounds: Vec<Sound>) {
        self.playback.dispose_all();
        for sound in &sounds {
            self.playback.acquire(sound);
        }
        self.sounds = sounds;
    }

    pub fn add_sound(&mut self, sound: Sound) {
        self.playback.acquire(&sound);
        self.sounds.retain(|s| s.id() != sound.id());
        self.sounds.push(sound);
    }

    pub fn remove_sound(&mut self, sound_id: &str) -> Option<Sound> {
        self.playback.dispose(sound_id);
        let index = self.sounds.iter().position(|s| s.id() == sound_id)?;
        Some(self.sounds.remove(index))
    }

    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackEngine {
        &mut self.playback
    }
}
