//! Add Queue
//!
//! Staging set for ids requested for addition to the selection. Duplicates
//! are rejected against both the queue and the committed selection; the
//! whole queue is folded into a staged selection update on drain.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::domain::ItemId;

use super::selection_store::SelectionStore;

/// Result of one enqueue call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnqueueOutcome {
    /// Newly queued ids, in input order
    pub accepted: Vec<ItemId>,
    /// Number of ids dropped as duplicates
    pub skipped: usize,
}

/// Ids waiting for the next drain, kept in arrival order
#[derive(Debug, Default)]
pub struct AddQueue {
    queued: IndexSet<ItemId>,
}

impl AddQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Queue every id not already queued and not in `selected`.
    ///
    /// `selected` is the committed membership read once by the caller; the
    /// queue itself is checked live, so repeats within `ids` are accepted once.
    pub fn enqueue(&mut self, ids: &[ItemId], selected: &HashSet<ItemId>) -> EnqueueOutcome {
        let mut outcome = EnqueueOutcome::default();

        for &id in ids {
            if !selected.contains(&id) && self.queued.insert(id) {
                outcome.accepted.push(id);
            } else {
                outcome.skipped += 1;
            }
        }

        outcome
    }

    /// Remove and return the whole queue, or `None` if it is empty
    pub fn take_batch(&mut self) -> Option<Vec<ItemId>> {
        if self.queued.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.queued).into_iter().collect())
    }

    /// Merge the whole queue into the committed selection and stage the result.
    ///
    /// Returns the drained batch, or `None` when there was nothing to drain.
    pub fn drain_into(&mut self, selection: &mut SelectionStore) -> Option<Vec<ItemId>> {
        let batch = self.take_batch()?;
        let update = selection.read().merged_with(&batch);
        selection.stage(update);
        Some(batch)
    }
}
