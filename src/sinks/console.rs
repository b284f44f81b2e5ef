//! Console sink implementation

use crate::core::{Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes records to stdout
pub struct ConsoleSink {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
        }
    }

    /// Dim the timestamp prefix when the `console` feature is enabled
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn write_timestamp(&self, out: &mut impl Write, timestamp: &str) -> std::io::Result<()> {
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                return write!(out, "{} ", timestamp.dimmed());
            }
        }
        write!(out, "{} ", timestamp)
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_record(&mut self, timestamp: &str, message: &[u8]) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.write_timestamp(&mut out, timestamp)?;
        out.write_all(message)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_timestamp() {
        let sink = ConsoleSink::with_colors(false);
        let mut out = Vec::new();
        sink.write_timestamp(&mut out, "12:00:00.000000").expect("write");
        assert_eq!(out, b"12:00:00.000000 ");
    }

    #[test]
    fn test_write_record() {
        let mut sink = ConsoleSink::with_colors(false);
        sink.write_record("12:00:00.000000", b"console sink test\n")
            .expect("write");
        sink.flush().expect("flush");
        assert_eq!(sink.name(), "console");
    }
}
