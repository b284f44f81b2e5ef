//! Construction-time configuration
//!
//! Every capacity in the core is fixed when the logger is built; nothing
//! here can change while records are in flight.

use super::{
    error::{LoggerError, Result},
    overflow_policy::{ArgumentOverflow, OverflowPolicy},
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest accepted ring exponent (16M slots)
pub const MAX_CAPACITY_LOG2: u32 = 24;

/// Upper bound on the record storage the ring pre-allocates (1 GiB)
pub const MAX_POOL_BYTES: usize = 1 << 30;

/// Sizes and policies of one logger instance
///
/// Defaults mirror an 8 KiB record: 66 argument cells of 108 bytes and
/// whatever remains for the template.
///
/// # Example
///
/// ```
/// use rust_ring_logger::LoggerConfig;
///
/// let config = LoggerConfig::from_json(r#"{ "capacity_log2": 4 }"#).unwrap();
/// assert_eq!(config.capacity(), 16);
/// assert_eq!(config.max_arguments, 66);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Ring holds `2^capacity_log2` slots
    pub capacity_log2: u32,
    /// Consumer sleep between drain passes
    pub poll_interval: Duration,
    /// Minimum time between two sink flushes
    pub flush_interval: Duration,
    /// Template buffer size per slot, in bytes
    pub max_template_len: usize,
    /// Argument cells per slot
    pub max_arguments: usize,
    /// Text storage per argument cell, in bytes
    pub max_argument_size: usize,
    pub overflow_policy: OverflowPolicy,
    pub argument_overflow: ArgumentOverflow,
    pub timestamp_format: TimestampFormat,
    /// Escape `\n`, `\r` and `\t` inside text arguments; off by default,
    /// so text is copied as given
    pub sanitize_arguments: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        const RECORD_BYTES: usize = 1 << 13;
        const MAX_ARGS: usize = 66;
        const MAX_ARG_SIZE: usize = 108;
        Self {
            capacity_log2: 10,
            poll_interval: Duration::from_millis(10),
            flush_interval: Duration::from_millis(20),
            max_template_len: RECORD_BYTES - MAX_ARGS * MAX_ARG_SIZE,
            max_arguments: MAX_ARGS,
            max_argument_size: MAX_ARG_SIZE,
            overflow_policy: OverflowPolicy::default(),
            argument_overflow: ArgumentOverflow::default(),
            timestamp_format: TimestampFormat::default(),
            sanitize_arguments: false,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of slots in the ring
    #[inline]
    pub fn capacity(&self) -> usize {
        1usize << self.capacity_log2
    }

    /// Bytes of record storage one slot carries
    ///
    /// `None` if the product overflows `usize`.
    pub fn slot_bytes(&self) -> Option<usize> {
        self.max_arguments
            .checked_mul(self.max_argument_size)?
            .checked_add(self.max_template_len)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity_log2 == 0 || self.capacity_log2 > MAX_CAPACITY_LOG2 {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!(
                    "capacity_log2 must be in 1..={}, got {}",
                    MAX_CAPACITY_LOG2, self.capacity_log2
                ),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(LoggerError::config(
                "LoggerConfig",
                "poll_interval must be greater than zero",
            ));
        }
        if self.max_template_len == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "max_template_len must be greater than zero",
            ));
        }
        if self.max_argument_size == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "max_argument_size must be greater than zero",
            ));
        }
        let pool_bytes = self
            .slot_bytes()
            .and_then(|bytes| bytes.checked_mul(self.capacity()));
        match pool_bytes {
            Some(bytes) if bytes <= MAX_POOL_BYTES => {}
            _ => {
                return Err(LoggerError::config(
                    "LoggerConfig",
                    format!(
                        "{} slots of {} + {} x {} bytes exceed the {} byte pool limit",
                        self.capacity(),
                        self.max_template_len,
                        self.max_arguments,
                        self.max_argument_size,
                        MAX_POOL_BYTES
                    ),
                ));
            }
        }
        if !self.timestamp_format.is_valid() {
            return Err(LoggerError::config(
                "TimestampFormat",
                "custom format contains an unsupported specifier",
            ));
        }
        Ok(())
    }
}
