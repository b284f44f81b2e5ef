//! In-memory sink
//!
//! Keeps rendered lines in a shared vector. Clones share the same storage,
//! so a test can keep one handle and give the other to the logger.

use crate::core::{Result, Sink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    flushes: Arc<AtomicUsize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, `"<timestamp> <message>"` without the newline
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Messages without their timestamp prefix
    pub fn messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .map(|line| match line.split_once(' ') {
                Some((_, message)) => message.to_string(),
                None => String::new(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl Sink for MemorySink {
    fn write_record(&mut self, timestamp: &str, message: &[u8]) -> Result<()> {
        let message = message.strip_suffix(b"\n").unwrap_or(message);
        let line = format!("{} {}", timestamp, String::from_utf8_lossy(message));
        self.lines.lock().push(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
