//! Selection Store
//!
//! Holds the committed selection and a single pending-update slot. Staged
//! updates become visible only on `commit`; removals apply to the committed
//! selection right away.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::domain::{ItemId, RemovalOutcome, Selection};

#[derive(Debug, Default)]
pub struct SelectionStore {
    committed: Selection,
    pending: Option<Selection>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the committed selection
    pub fn read(&self) -> Selection {
        self.committed.clone()
    }

    /// Membership set of the committed selection
    pub fn selected_set(&self) -> HashSet<ItemId> {
        self.committed.selected_ids.iter().copied().collect()
    }

    pub fn pending(&self) -> Option<&Selection> {
        self.pending.as_ref()
    }

    /// Stage `update` for the next commit, replacing any earlier staged one.
    ///
    /// Returns true if an uncommitted update was overwritten.
    pub fn stage(&mut self, update: Selection) -> bool {
        self.pending.replace(update).is_some()
    }

    /// Overwrite the committed selection without going through staging
    pub fn write(&mut self, selection: Selection) {
        self.committed = selection;
    }

    /// Promote the pending update, if any; returns the newly committed state
    pub fn commit(&mut self) -> Option<&Selection> {
        let update = self.pending.take()?;
        self.committed = update;
        Some(&self.committed)
    }

    /// Filter `ids` out of both lists of the committed selection.
    ///
    /// The pending slot is left as is.
    pub fn remove(&mut self, ids: &[ItemId]) -> RemovalOutcome {
        let members = self.selected_set();
        let removed: IndexSet<ItemId> = ids
            .iter()
            .copied()
            .filter(|id| members.contains(id))
            .collect();

        let targets: HashSet<ItemId> = ids.iter().copied().collect();
        self.committed.selected_ids.retain(|id| !targets.contains(id));
        self.committed.order.retain(|id| !targets.contains(id));

        RemovalOutcome {
            removed: removed.into_iter().collect(),
            selection: self.read(),
        }
    }
}
