//! Batching Layer
//!
//! Timer-driven promotion of queued additions and staged selection updates.

mod scheduler;

pub use scheduler::{
    BatchIntervals, BatchScheduler, DEFAULT_ADD_BATCH_INTERVAL, DEFAULT_COMMIT_INTERVAL,
};
