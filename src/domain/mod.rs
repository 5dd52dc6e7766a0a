//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO dependencies on the storage or HTTP layers.

mod entity;
mod item;
mod selection;

pub use entity::{DomainError, DomainResult, Entity};
pub use item::{Item, ItemId};
pub use selection::{RemovalOutcome, Selection};
