//! Memory Store
//!
//! The single state object handed to the scheduler and the HTTP layer.
//! Catalog, selection and add queue live behind one mutex, so every
//! operation below runs to completion before the next one starts.

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{DomainResult, Item, ItemId, RemovalOutcome, Selection};

use super::add_queue::AddQueue;
use super::catalog::{ItemPage, ListQuery, MemoryCatalog};
use super::selection_store::SelectionStore;
use super::traits::ItemCatalog;

/// Summary of one add-queue drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Ids merged into the staged update
    pub batch: usize,
    /// Out-of-range ids newly registered in the catalog
    pub appended: usize,
}

/// Summary of one selection commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub selected: usize,
    pub ordered: usize,
}

#[derive(Debug)]
struct StoreState<C> {
    catalog: C,
    selection: SelectionStore,
    queue: AddQueue,
}

/// Shared in-memory state
#[derive(Debug)]
pub struct MemoryStore<C = MemoryCatalog> {
    state: Mutex<StoreState<C>>,
}

impl MemoryStore<MemoryCatalog> {
    /// Store over a synthetic catalog of `total_items` items
    pub fn new(total_items: u64) -> DomainResult<Self> {
        Ok(Self::with_catalog(MemoryCatalog::new(total_items)?))
    }
}

impl<C: ItemCatalog> MemoryStore<C> {
    pub fn with_catalog(catalog: C) -> Self {
        Self {
            state: Mutex::new(StoreState {
                catalog,
                selection: SelectionStore::new(),
                queue: AddQueue::new(),
            }),
        }
    }

    // ========================
    // Catalog
    // ========================

    pub async fn total_items(&self) -> u64 {
        self.state.lock().await.catalog.total()
    }

    pub async fn list_items(&self, query: &ListQuery) -> ItemPage {
        self.state.lock().await.catalog.list(query)
    }

    pub async fn get_items_by_ids(&self, ids: &[ItemId]) -> Vec<Item> {
        self.state.lock().await.catalog.get_by_ids(ids)
    }

    pub async fn append_items(&self, ids: &[ItemId]) -> Vec<ItemId> {
        self.state.lock().await.catalog.append_items(ids)
    }

    // ========================
    // Add queue
    // ========================

    /// Queue ids for addition; returns the ids actually accepted
    pub async fn enqueue_add(&self, ids: &[ItemId]) -> Vec<ItemId> {
        let mut state = self.state.lock().await;
        let selected = state.selection.selected_set();
        let outcome = state.queue.enqueue(ids, &selected);

        if !outcome.accepted.is_empty() {
            info!(accepted = outcome.accepted.len(), "Added items to queue");
        }
        if outcome.skipped > 0 {
            debug!(skipped = outcome.skipped, "Skipped duplicates");
        }

        outcome.accepted
    }

    pub async fn queue_size(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Fold the add queue into a staged selection update
    pub async fn drain_add_queue(&self) -> Option<DrainReport> {
        let mut state = self.state.lock().await;
        let StoreState {
            catalog,
            selection,
            queue,
        } = &mut *state;

        let batch = queue.drain_into(selection)?;
        let appended = catalog.append_items(&batch).len();

        let report = DrainReport {
            batch: batch.len(),
            appended,
        };
        info!(batch = report.batch, appended = report.appended, "Processed add queue");
        Some(report)
    }

    // ========================
    // Selection
    // ========================

    /// Committed selection
    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection.read()
    }

    pub async fn pending_selection(&self) -> Option<Selection> {
        self.state.lock().await.selection.pending().cloned()
    }

    /// Stage a full selection replacement for the next commit tick
    pub async fn stage_selection(&self, update: Selection) {
        let replaced = self.state.lock().await.selection.stage(update);
        if replaced {
            debug!("Replaced uncommitted selection update");
        }
    }

    /// Replace the committed selection immediately
    pub async fn write_selection(&self, selection: Selection) {
        self.state.lock().await.selection.write(selection);
    }

    /// Promote the pending update, if any
    pub async fn commit_selection(&self) -> Option<CommitReport> {
        let mut state = self.state.lock().await;
        let committed = state.selection.commit()?;

        let report = CommitReport {
            selected: committed.selected_ids.len(),
            ordered: committed.order.len(),
        };
        info!(selected = report.selected, "Committed selection update");
        Some(report)
    }

    /// Remove ids from the committed selection, bypassing staging
    pub async fn remove_from_selection(&self, ids: &[ItemId]) -> RemovalOutcome {
        let outcome = self.state.lock().await.selection.remove(ids);
        info!(
            requested = ids.len(),
            removed = outcome.removed.len(),
            "Removed items from selection"
        );
        outcome
    }
}
