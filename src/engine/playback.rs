//! Exclusive playback: at most one clip sounds at any time.
//!
//! The engine owns one [`AudioHandle`] per clip in the library, created by an
//! [`AudioBackend`]. `play` stops every competing handle before starting its
//! own, so exclusivity holds without any outside lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::sound::Sound;

/// Invoked once when a clip reaches its natural end.
pub type EndCallback = Box<dyn FnOnce() + Send + 'static>;

/// A loaded, playable clip.
pub trait AudioHandle: Send {
    /// Start from the beginning. `on_end` fires once on natural end; a `stop`
    /// or a later `play` discards it unfired.
    fn play(&mut self, on_end: EndCallback);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    /// Release the underlying resources. The handle is not used afterwards.
    fn unload(&mut self);
}

pub trait AudioBackend: Send + Sync {
    fn load(&self, sound: &Sound) -> Box<dyn AudioHandle>;
}

pub struct PlaybackEngine {
    backend: Arc<dyn AudioBackend>,
    handles: HashMap<String, Box<dyn AudioHandle>>,
    playing: Arc<watch::Sender<Option<String>>>,
}

impl PlaybackEngine {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            backend,
            handles: HashMap::new(),
            playing: Arc::new(tx),
        }
    }

    /// Create the handle for `sound`, replacing any previous one.
    pub fn acquire(&mut self, sound: &Sound) {
        self.dispose(sound.id());
        let handle = self.backend.load(sound);
        self.handles.insert(sound.id().to_string(), handle);
        tracing::debug!(sound_id = sound.id(), "acquired audio handle");
    }

    pub fn dispose(&mut self, sound_id: &str) {
        if let Some(mut handle) = self.handles.remove(sound_id) {
            handle.stop();
            handle.unload();
            self.clear_marker_if(sound_id);
            tracing::debug!(sound_id, "disposed audio handle");
        }
    }

    pub fn dispose_all(&mut self) {
        for (_, mut handle) in self.handles.drain() {
            handle.stop();
            handle.unload();
        }
        self.playing.send_replace(None);
    }

    pub fn has_handle(&self, sound_id: &str) -> bool {
        self.handles.contains_key(sound_id)
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Returns `false`, and plays nothing, when `sound_id` has no handle.
    pub fn play(&mut self, sound_id: &str) -> bool {
        if !self.handles.contains_key(sound_id) {
            tracing::warn!(sound_id, "no audio handle for sound");
            return false;
        }

        for (id, handle) in self.handles.iter_mut() {
            if id != sound_id && handle.is_playing() {
                handle.stop();
            }
        }

        // Marker first: a clip that ends immediately must still clear it.
        self.playing.send_replace(Some(sound_id.to_string()));

        let marker = Arc::clone(&self.playing);
        let ended = sound_id.to_string();
        let on_end: EndCallback = Box::new(move || {
            marker.send_if_modified(|current| {
                if current.as_deref() == Some(ended.as_str()) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        });

        if let Some(handle) = self.handles.get_mut(sound_id) {
            if handle.is_playing() {
                handle.stop();
            }
            handle.play(on_end);
        }
        true
    }

    pub fn stop(&mut self, sound_id: &str) {
        if let Some(handle) = self.handles.get_mut(sound_id) {
            if handle.is_playing() {
                handle.stop();
            }
            self.clear_marker_if(sound_id);
        }
    }

    pub fn stop_all(&mut self) {
        for handle in self.handles.values_mut() {
            handle.stop();
        }
        self.playing.send_replace(None);
    }

    pub fn currently_playing(&self) -> Option<String> {
        self.playing.borrow().clone()
    }

    /// Follow the currently playing id as it changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.playing.subscribe()
    }

    pub fn playing_count(&self) -> usize {
        self.handles.values().filter(|h| h.is_playing()).count()
    }

    fn clear_marker_if(&self, sound_id: &str) {
        self.playing.send_if_modified(|current| {
            if current.as_deref() == Some(sound_id) {
                *current = None;
                true
            } else {
                false
            }
        });
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::{AudioBackend, AudioHandle, EndCallback};
    use crate::models::sound::Sound;

    #[derive(Default)]
    pub struct FakeState {
        pub playing: bool,
        pub plays: usize,
        pub unloaded: bool,
        pub on_end: Option<EndCallback>,
    }

    /// Backend whose handles only flip flags; tests drive natural ends.
    #[derive(Default)]
    pub struct FakeBackend {
        pub states: Mutex<HashMap<String, Arc<Mutex<FakeState>>>>,
    }

    impl FakeBackend {
        pub fn state(&self, sound_id: &str) -> Arc<Mutex<FakeState>> {
            Arc::clone(&self.states.lock().unwrap()[sound_id])
        }

        pub fn is_playing(&self, sound_id: &str) -> bool {
            self.state(sound_id).lock().unwrap().playing
        }

        /// Let the clip run out.
        pub fn finish(&self, sound_id: &str) {
            let state = self.state(sound_id);
            let callback = {
                let mut s = state.lock().unwrap();
                s.playing = false;
                s.on_end.take()
            };
            if let Some(cb) = callback {
                cb();
            }
        }
    }

    struct FakeHandle(Arc<Mutex<FakeState>>);

    impl AudioHandle for FakeHandle {
        fn play(&mut self, on_end: EndCallback) {
            let mut s = self.0.lock().unwrap();
            s.playing = true;
            s.plays += 1;
            s.on_end = Some(on_end);
        }

        fn stop(&mut self) {
            let mut s = self.0.lock().unwrap();
            s.playing = false;
            s.on_end = None;
        }

        fn is_playing(&self) -> bool {
            self.0.lock().unwrap().playing
        }

        fn unload(&mut self) {
            self.0.lock().unwrap().unloaded = true;
        }
    }

    impl AudioBackend for FakeBackend {
        fn load(&self, sound: &Sound) -> Box<dyn AudioHandle> {
            let state = Arc::new(Mutex::new(FakeState::default()));
            self.states
                .lock()
                .unwrap()
                .insert(sound.id().to_string(), Arc::clone(&state));
            Box::new(FakeHandle(state))
        }
    }

    pub fn sound(id: &str) -> Sound {
        Sound::create(crate::models::sound::NewSound {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: id.to_uppercase(),
            url: format!("https://storage.test/{id}.mp3"),
            duration: 1.0,
            created_at: None,
        })
        .unwrap()
    }
}
