//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes to stderr and,
//! optionally, to a size-rotated file set in a log directory.

mod rolling_file;

use std::fmt;
use std::path::PathBuf;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use rolling_file::{RollingFile, RollingWriter};

/// Default size of one log file before it rolls
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
/// Default number of rolled files kept next to the live one
pub const DEFAULT_MAX_FILES: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Application name, used as the log file stem
    pub app_name: String,
    /// Directory for log files; `None` logs to stderr only
    pub log_dir: Option<PathBuf>,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl LoggerConfig {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            log_dir: None,
            default_filter: "info".to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

/// Wall-clock timestamps in local time, millisecond precision
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_timer(LocalTime)
        .with_writer(std::io::stderr);

    let file_layer = match &config.log_dir {
        Some(dir) => {
            let file = RollingFile::open(
                dir,
                &config.app_name,
                config.max_file_bytes,
                config.max_files,
            )?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_timer(LocalTime)
                    .with_ansi(false)
                    .with_writer(RollingWriter::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))
}
