//! Logging macros for ergonomic call sites.
//!
//! [`log_write!`](crate::log_write) converts each argument with
//! [`Arg::from`](crate::Arg) so call sites can pass plain Rust values.
//!
//! # Examples
//!
//! ```
//! use rust_ring_logger::prelude::*;
//! use rust_ring_logger::log_write;
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
//!
//! // No arguments
//! log_write!(logger, "Server started\n").unwrap();
//!
//! // Typed arguments
//! let port: u16 = 8080;
//! log_write!(logger, "listening on port %u\n", port).unwrap();
//!
//! let user = "alice";
//! log_write!(logger, "user %s performed %s\n", user, "login").unwrap();
//! ```

/// Write one record, converting every argument with `Arg::from`.
///
/// Expands to [`Logger::write`](crate::Logger::write) and returns its result.
///
/// # Examples
///
/// ```
/// # use rust_ring_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use rust_ring_logger::log_write;
/// log_write!(logger, "x=%\n", 5).unwrap();
/// log_write!(logger, "%d-%s\n", 42, "ok").unwrap();
/// ```
#[macro_export]
macro_rules! log_write {
    ($logger:expr, $template:expr $(,)?) => {
        $logger.write($template, &[])
    };
    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.write($template, &[$($crate::Arg::from($arg)),+])
    };
}
