//! Core logger types and traits

pub mod argument;
pub mod config;
pub mod consumer;
pub mod encoder;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod pool;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use argument::{Arg, ArgCell, ArgKind, ArgValue};
pub use config::{LoggerConfig, MAX_CAPACITY_LOG2, MAX_POOL_BYTES};
pub use consumer::LoggerState;
pub use encoder::{RecordLimits, SlotRecord};
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{ArgumentOverflow, OverflowCallback, OverflowPolicy};
pub use pool::{ClaimedSlot, DrainCursor, ReadySlot, SlotPool};
pub use record::RecordBuilder;
pub use sink::Sink;
pub use timestamp::TimestampFormat;
