//! Repository Layer - Core Traits
//!
//! Defines the abstract interface the store uses to reach the item catalog.
//! The in-memory catalog is the only implementation; tests may supply others.

use crate::domain::{Item, ItemId};

use super::catalog::{ItemPage, ListQuery};

/// Read and append access to the item space
pub trait ItemCatalog: Send + Sync {
    /// Size of the synthetic range `[1, total]`
    fn total(&self) -> u64;

    /// Filtered, paginated listing over the synthetic range
    fn list(&mut self, query: &ListQuery) -> ItemPage;

    /// Look up items by id, omitting unknown ids
    fn get_by_ids(&mut self, ids: &[ItemId]) -> Vec<Item>;

    /// Register out-of-range ids as items; returns the ids newly created
    fn append_items(&mut self, ids: &[ItemId]) -> Vec<ItemId>;
}
