//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only file sink
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_ring_logger::sinks::FileSink;
    ///
    /// let sink = FileSink::open("/var/log/app.log").unwrap();
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, timestamp: &str, message: &[u8]) -> io::Result<()> {
        self.writer.write_all(timestamp.as_bytes())?;
        self.writer.write_all(b" ")?;
        self.writer.write_all(message)
    }

    fn error(&self, e: io::Error) -> LoggerError {
        LoggerError::file_sink(self.path.display().to_string(), e.to_string())
    }
}

impl Sink for FileSink {
    fn write_record(&mut self, timestamp: &str, message: &[u8]) -> Result<()> {
        self.write_line(timestamp, message).map_err(|e| self.error(e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| self.error(e))
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
