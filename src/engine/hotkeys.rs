//! Keyboard shortcuts bound to clips.
//!
//! The binding table is derived from the grid: keys that carry both a hotkey
//! and a sound. It is rebuilt, and the listener rebound, only when that
//! derived content changes. When two keys share a combination the one met
//! last in grid order (the higher position) wins.

use std::collections::HashMap;

use crate::engine::playback::PlaybackEngine;
use crate::models::stream_deck_key::StreamDeckKey;

/// Canonical form of a shortcut: lowercase, no surrounding whitespace, no
/// spaces around `+`. Blank input means "no shortcut".
pub fn normalize_combo(raw: &str) -> Option<String> {
    let combo = raw
        .split('+')
        .map(|part| part.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("+");
    let combo = combo.trim().to_string();
    if combo.is_empty() {
        None
    } else {
        Some(combo)
    }
}

/// Whatever actually listens for key presses (a window, a global hook).
pub trait HotkeyListener: Send {
    /// Replace the set of combinations being listened for.
    fn rebind(&mut self, combos: &[String]);
}

#[derive(Default)]
pub struct HotkeyDispatcher {
    bindings: HashMap<String, String>,
    bound: Vec<(String, String)>,
    listener: Option<Box<dyn HotkeyListener>>,
    rebinds: usize,
}

impl HotkeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: Box<dyn HotkeyListener>) -> Self {
        Self {
            listener: Some(listener),
            ..Self::default()
        }
    }

    /// Bring the table in line with `keys` (in grid order). Returns whether
    /// anything was rebound.
    pub fn sync(&mut self, keys: &[StreamDeckKey]) -> bool {
        let bound: Vec<(String, String)> = keys
            .iter()
            .filter_map(|k| {
                let combo = normalize_combo(k.hotkey()?)?;
                Some((combo, k.sound_id()?.to_string()))
            })
            .collect();

        if bound == self.bound {
            return false;
        }

        let mut bindings = HashMap::with_capacity(bound.len());
        for (combo, sound_id) in &bound {
            if let Some(previous) = bindings.insert(combo.clone(), sound_id.clone()) {
                if previous != *sound_id {
                    tracing::warn!(
                        combo = %combo,
                        replaced = %previous,
                        sound_id = %sound_id,
                        "hotkey bound twice, later key wins"
                    );
                }
            }
        }

        self.bindings = bindings;
        self.bound = bound;
        self.rebinds += 1;

        if let Some(listener) = self.listener.as_mut() {
            let mut combos: Vec<String> = self.bindings.keys().cloned().collect();
            combos.sort();
            listener.rebind(&combos);
        }
        tracing::debug!(bindings = self.bindings.len(), "hotkeys rebound");
        true
    }

    pub fn bindings(&self) -> &HashMap<String, String> {
        &self.bindings
    }

    pub fn rebind_count(&self) -> usize {
        self.rebinds
    }

    pub fn sound_for(&self, combo: &str) -> Option<&str> {
        let combo = normalize_combo(combo)?;
        self.bindings.get(&combo).map(String::as_str)
    }

    /// Play whatever `combo` is bound to. Returns the sound id it resolved to.
    pub fn dispatch(&self, combo: &str, playback: &mut PlaybackEngine) -> Option<String> {
        let sound_id = self.sound_for(combo)?.to_string();
        playback.play(&sound_id);
        Some(sound_id)
    }
}
