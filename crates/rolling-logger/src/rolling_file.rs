//! Size-rotated log file
//!
//! `<dir>/<name>.log` is the live file. When a write would push it past
//! `max_bytes` it is renamed to `<name>.1.log`, older files shift up by one,
//! and anything beyond `max_files` is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// A log file that rolls over once it grows past a byte limit
#[derive(Debug)]
pub struct RollingFile {
    dir: PathBuf,
    name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingFile {
    /// Open (or create) `<dir>/<name>.log`, appending to any existing content
    pub fn open(
        dir: impl AsRef<Path>,
        name: &str,
        max_bytes: u64,
        max_files: usize,
    ) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let path = live_path(&dir, name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            dir,
            name: name.to_string(),
            max_bytes,
            max_files,
            file,
            written,
        })
    }

    /// Path of the file currently being written
    pub fn path(&self) -> PathBuf {
        live_path(&self.dir, &self.name)
    }

    /// Path of the `index`-th rolled file (1 = most recent)
    pub fn rolled_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.name, index))
    }

    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_files == 0 {
            // No history kept: just truncate the live file
            self.file = File::create(self.path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rolled_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files).rev() {
            let from = self.rolled_path(index);
            if from.exists() {
                fs::rename(&from, self.rolled_path(index + 1))?;
            }
        }
        fs::rename(self.path(), self.rolled_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.roll()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn live_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.log", name))
}

/// Cloneable handle that lets several writers share one `RollingFile`
#[derive(Debug, Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingWriter {
    pub fn new(file: RollingFile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        // Formatted events arrive whole; keep each one in a single file
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
