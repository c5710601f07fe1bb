//! Optimistic grid reordering.
//!
//! The new order is written to the grid before it is persisted. If the batch
//! write fails the grid goes back to the order it had before the move and
//! the error is returned for the caller to show.

use std::sync::Arc;

use crate::engine::grid::GridStore;
use crate::error::AppError;
use crate::models::stream_deck_key::StreamDeckKey;
use crate::ports::StreamDeckKeyRepository;

/// Moves the element at `from` to `to`. `None` when nothing would change or
/// either index is out of range.
pub fn move_in_sequence(
    keys: &[StreamDeckKey],
    from: usize,
    to: usize,
) -> Option<Vec<StreamDeckKey>> {
    if from == to || from >= keys.len() || to >= keys.len() {
        return None;
    }
    let mut moved = keys.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

/// Gives every key its index as position.
pub fn renumber(keys: Vec<StreamDeckKey>) -> Result<Vec<StreamDeckKey>, AppError> {
    keys.iter()
        .enumerate()
        .map(|(index, key)| key.with_position(index as i64))
        .collect()
}

pub struct ReorderCoordinator {
    keys: Arc<dyn StreamDeckKeyRepository>,
}

impl ReorderCoordinator {
    pub fn new(keys: Arc<dyn StreamDeckKeyRepository>) -> Self {
        Self { keys }
    }

    /// Apply `new_sequence` (renumbered) to `grid`, then persist it.
    pub async fn reorder(
        &self,
        grid: &GridStore,
        new_sequence: Vec<StreamDeckKey>,
    ) -> Result<(), AppError> {
        let previous = grid.snapshot();
        let renumbered = renumber(new_sequence)?;

        grid.replace(renumbered.clone());

        if let Err(e) = self.keys.upsert_batch(&renumbered).await {
            tracing::warn!(keys = renumbered.len(), "failed to save key positions, reverting: {e}");
            grid.replace(previous);
            return Err(e);
        }

        tracing::debug!(keys = renumbered.len(), "saved key positions");
        Ok(())
    }

    /// Drag-end entry point. Returns `false` when the move was a no-op.
    pub async fn move_key(&self, grid: &GridStore, from: usize, to: usize) -> Result<bool, AppError> {
        let current = grid.snapshot();
        let Some(sequence) = move_in_sequence(&current, from, to) else {
            return Ok(false);
        };
        self.reorder(grid, sequence).await?;
        Ok(true)
    }
}
