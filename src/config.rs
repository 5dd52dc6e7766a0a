//! Server configuration using Clap.
//!
//! Every flag can also be supplied through the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::batching::BatchIntervals;

/// Dual-pane item selection backend
#[derive(Parser, Debug, Clone)]
#[command(name = "dual-pane")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    // === Network ===
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    // === Catalog ===
    /// Number of synthetic items in the catalog
    #[arg(long, env = "TOTAL_ITEMS", default_value_t = 1_000_000)]
    pub total_items: u64,

    // === Batching ===
    /// Period of the add-queue drain, in milliseconds
    #[arg(long, env = "ADD_BATCH_INTERVAL_MS", default_value_t = 10_000)]
    pub add_batch_interval_ms: u64,

    /// Period of the selection commit, in milliseconds
    #[arg(long, env = "COMMIT_INTERVAL_MS", default_value_t = 1_000)]
    pub commit_interval_ms: u64,

    // === Static files & logs ===
    /// Built frontend bundle to serve at `/`
    #[arg(long, env = "FRONTEND_DIST")]
    pub frontend_dist: Option<PathBuf>,

    /// Directory for rolling log files (stderr only when unset)
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("host must not be empty");
        }
        if self.total_items == 0 {
            bail!("total-items must be at least 1");
        }
        if self.add_batch_interval_ms == 0 || self.commit_interval_ms == 0 {
            bail!("batch intervals must be non-zero");
        }
        if self.commit_interval_ms >= self.add_batch_interval_ms {
            bail!(
                "commit interval ({}ms) must be shorter than the add-batch interval ({}ms)",
                self.commit_interval_ms,
                self.add_batch_interval_ms
            );
        }
        Ok(())
    }

    /// Host and port for `TcpListener::bind`; hostnames are resolved there
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn intervals(&self) -> BatchIntervals {
        BatchIntervals {
            add_batch: Duration::from_millis(self.add_batch_interval_ms),
            commit: Duration::from_millis(self.commit_interval_ms),
        }
    }
}
