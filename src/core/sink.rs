//! Sink trait for rendered output

use super::error::Result;

/// Destination for rendered records
///
/// A sink is owned by the consumer thread once handed to the logger; no
/// other thread touches it, so implementations need `Send` but not `Sync`.
pub trait Sink: Send {
    /// Write one record. `message` already ends with a newline.
    fn write_record(&mut self, timestamp: &str, message: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
