//! In-Memory Item Catalog
//!
//! A virtual range `[1, N]` of synthetic items plus an overlay of items
//! appended explicitly with ids outside that range.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, Entity, Item, ItemId};

use super::traits::ItemCatalog;

/// Default number of synthetic items
pub const DEFAULT_TOTAL_ITEMS: u64 = 1_000_000;

/// Listing parameters, already validated by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Substring the decimal form of an id must contain
    pub filter: Option<String>,
    /// Matches to skip before collecting
    pub offset: u64,
    /// Maximum number of items returned
    pub limit: usize,
    /// Ids left out of both the listing and the total
    pub exclude: HashSet<ItemId>,
}

impl ListQuery {
    pub fn page(offset: u64, limit: usize) -> Self {
        Self {
            offset,
            limit,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = ItemId>) -> Self {
        self.exclude.extend(ids);
        self
    }
}

/// One page of the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemPage {
    /// Number of ids matching the query, ignoring pagination
    pub total: u64,
    pub items: Vec<Item>,
}

/// Catalog backed by in-process maps
#[derive(Debug)]
pub struct MemoryCatalog {
    total: ItemId,
    /// In-range items materialized so far, so `created_at` stays stable
    synthesized: HashMap<ItemId, Item>,
    /// Out-of-range items added through `append_items`
    appended: HashMap<ItemId, Item>,
}

impl MemoryCatalog {
    pub fn new(total: u64) -> DomainResult<Self> {
        let total = ItemId::try_from(total).map_err(|_| {
            DomainError::InvalidInput(format!("catalog size {} exceeds the id range", total))
        })?;

        Ok(Self {
            total,
            synthesized: HashMap::new(),
            appended: HashMap::new(),
        })
    }

    fn in_range(&self, id: ItemId) -> bool {
        (1..=self.total).contains(&id)
    }

    fn materialize(&mut self, id: ItemId) -> Item {
        self.synthesized
            .entry(id)
            .or_insert_with(|| Item::new(id))
            .clone()
    }

    /// Contiguous page without filtering or exclusions
    fn list_range(&mut self, offset: u64, limit: usize) -> Vec<Item> {
        let first = offset.saturating_add(1);
        let last = offset.saturating_add(limit as u64).min(self.total as u64);
        if first > last {
            return Vec::new();
        }
        // Both bounds are within [1, total], which fits in ItemId
        (first as ItemId..=last as ItemId)
            .map(|id| self.materialize(id))
            .collect()
    }

    /// Full scan applying exclusions, then the substring filter
    fn scan(&mut self, query: &ListQuery) -> ItemPage {
        let mut total = 0u64;
        let mut skipped = 0u64;
        let mut hits = Vec::with_capacity(query.limit.min(1024));
        let mut digits = String::with_capacity(20);

        for id in 1..=self.total {
            if query.exclude.contains(&id) {
                continue;
            }
            if let Some(filter) = &query.filter {
                digits.clear();
                let _ = write!(digits, "{}", id);
                if !digits.contains(filter.as_str()) {
                    continue;
                }
            }

            total += 1;
            if skipped < query.offset {
                skipped += 1;
                continue;
            }
            if hits.len() < query.limit {
                hits.push(id);
            }
        }

        let items = hits.into_iter().map(|id| self.materialize(id)).collect();
        ItemPage { total, items }
    }
}

impl ItemCatalog for MemoryCatalog {
    fn total(&self) -> u64 {
        self.total as u64
    }

    fn list(&mut self, query: &ListQuery) -> ItemPage {
        if query.filter.is_none() && query.exclude.is_empty() {
            return ItemPage {
                total: self.total(),
                items: self.list_range(query.offset, query.limit),
            };
        }
        self.scan(query)
    }

    fn get_by_ids(&mut self, ids: &[ItemId]) -> Vec<Item> {
        ids.iter()
            .filter_map(|&id| {
                if self.in_range(id) {
                    Some(self.materialize(id))
                } else {
                    self.appended.get(&id).cloned()
                }
            })
            .collect()
    }

    fn append_items(&mut self, ids: &[ItemId]) -> Vec<ItemId> {
        let now = Utc::now();
        let mut created = Vec::new();

        for &id in ids {
            if self.in_range(id) || self.appended.contains_key(&id) {
                continue;
            }
            let item = Item::with_created_at(id, now);
            self.appended.insert(item.id(), item);
            created.push(id);
        }

        created
    }
}
