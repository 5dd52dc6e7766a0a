//! Repository Layer
//!
//! In-memory state: the item catalog, the committed selection with its
//! pending-update slot, and the add queue, gathered in `MemoryStore`.

mod add_queue;
mod catalog;
mod selection_store;
mod store;
mod traits;

#[cfg(test)]
mod tests;

pub use add_queue::{AddQueue, EnqueueOutcome};
pub use catalog::{ItemPage, ListQuery, MemoryCatalog, DEFAULT_TOTAL_ITEMS};
pub use selection_store::SelectionStore;
pub use store::{CommitReport, DrainReport, MemoryStore};
pub use traits::ItemCatalog;
