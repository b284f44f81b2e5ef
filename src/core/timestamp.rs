//! Timestamp formatting for record prefixes
//!
//! The default prefix is wall-clock time of day with microseconds,
//! `HH:MM:SS.uuuuuu`, in local time.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::time::SystemTime;

/// Timestamp format options for the record prefix
///
/// # Examples
///
/// ```
/// use rust_ring_logger::core::TimestampFormat;
/// use std::time::SystemTime;
///
/// let mut out = String::new();
/// TimestampFormat::ClockUtc
///     .write_to(&mut out, SystemTime::now())
///     .unwrap();
/// // e.g. "10:30:45.123456"
/// assert_eq!(out.len(), 15);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time of day with microseconds: `10:30:45.123456`
    #[default]
    Clock,

    /// UTC time of day with microseconds: `10:30:45.123456`
    ClockUtc,

    /// ISO 8601 UTC with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// Custom strftime format, rendered in local time
    ///
    /// ```
    /// use rust_ring_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%Y-%m-%d %H:%M:%S%.6f".to_string());
    /// assert!(format.is_valid());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Write the formatted timestamp into `out`
    pub fn write_to<W: Write>(&self, out: &mut W, timestamp: SystemTime) -> fmt::Result {
        match self {
            TimestampFormat::Clock => {
                let datetime: DateTime<Local> = timestamp.into();
                write!(out, "{}", datetime.format("%H:%M:%S%.6f"))
            }
            TimestampFormat::ClockUtc => {
                let datetime: DateTime<Utc> = timestamp.into();
                write!(out, "{}", datetime.format("%H:%M:%S%.6f"))
            }
            TimestampFormat::Iso8601Micros => {
                let datetime: DateTime<Utc> = timestamp.into();
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
            }
            TimestampFormat::Custom(format_str) => {
                let datetime: DateTime<Local> = timestamp.into();
                write!(out, "{}", datetime.format(format_str))
            }
        }
    }

    /// Format into an owned string
    #[must_use]
    pub fn format(&self, timestamp: SystemTime) -> String {
        let mut out = String::with_capacity(32);
        match self.write_to(&mut out, timestamp) {
            Ok(()) => out,
            Err(_) => String::new(),
        }
    }

    /// False if a custom format contains a specifier chrono cannot render
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            TimestampFormat::Custom(format_str) => {
                !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Clock => "Local time of day with microseconds (10:30:45.123456)",
            TimestampFormat::ClockUtc => "UTC time of day with microseconds (10:30:45.123456)",
            TimestampFormat::Iso8601Micros => {
                "ISO 8601 with microseconds (2025-01-08T10:30:45.123456Z)"
            }
            TimestampFormat::Custom(_) => "Custom strftime format",
        }
    }
}
