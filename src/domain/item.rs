//! Item Entity
//!
//! A catalog entry. Synthetic items are identified by their id alone; the
//! creation timestamp is stamped when the item is first materialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Identifier of a catalog item
pub type ItemId = i64;

/// A catalog item as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// When the item was first materialized
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Create an item stamped with the current time
    pub fn new(id: ItemId) -> Self {
        Self::with_created_at(id, Utc::now())
    }

    /// Create an item with an explicit creation time
    pub fn with_created_at(id: ItemId, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
