//! # Rust Ring Logger
//!
//! A low-latency asynchronous logging core. Producers copy a template and
//! its typed arguments into a pre-allocated slot ring; one consumer thread
//! renders the records and writes them to a sink.
//!
//! ## Features
//!
//! - **No I/O on the caller**: a log call is a slot claim and a few copies
//! - **Fixed memory**: every slot is allocated once, at construction
//! - **Typed arguments**: placeholders are checked against argument kinds
//! - **Explicit overflow policy**: drop and count, block, or block with timeout
//!
//! ## Example
//!
//! ```
//! use rust_ring_logger::prelude::*;
//! use rust_ring_logger::log_write;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).build().unwrap();
//!
//! log_write!(logger, "request %d took %f ms\n", 7, 1.5f64).unwrap();
//! logger.close();
//!
//! assert_eq!(sink.messages(), vec!["request 7 took 1.500000 ms"]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Arg, ArgKind, ArgumentOverflow, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, LoggerState, OverflowCallback, OverflowPolicy, RecordBuilder, Result, Sink,
        TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
}

pub use crate::core::{
    Arg, ArgKind, ArgumentOverflow, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, LoggerState, OverflowCallback, OverflowPolicy, RecordBuilder, Result, Sink,
    TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink};
