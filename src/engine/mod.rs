//! Client runtime: playback, hotkeys and grid ordering over in-memory
//! snapshots. Nothing in here talks to persistence except the reorder
//! coordinator, through the key repository port.

pub mod deck;
pub mod grid;
pub mod hotkeys;
pub mod library;
pub mod playback;
pub mod reorder;

pub use deck::Deck;
pub use grid::GridStore;
pub use hotkeys::{normalize_combo, HotkeyDispatcher, HotkeyListener};
pub use library::Library;
pub use playback::{AudioBackend, AudioHandle, EndCallback, PlaybackEngine};
pub use reorder::ReorderCoordinator;
