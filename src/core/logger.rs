//! Main logger implementation

use super::{
    argument::Arg,
    config::LoggerConfig,
    consumer::{Command, Consumer, LoggerState, Shared},
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    overflow_policy::{ArgumentOverflow, OverflowCallback, OverflowPolicy},
    pool::{ClaimedSlot, SlotPool},
    record::RecordBuilder,
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::sinks::FileSink;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use crossbeam_utils::Backoff;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used by [`Logger::close`] and when the logger is dropped.
/// For custom timeout control, use [`Logger::shutdown`] instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const CONSUMER_THREAD_NAME: &str = "ring-logger-consumer";

/// Sleep between claim attempts once spinning and yielding are exhausted
const BLOCKED_CLAIM_SLEEP: Duration = Duration::from_micros(50);

/// Asynchronous logger over a fixed slot ring
///
/// Producers on any thread call [`write`](Logger::write) or
/// [`record`](Logger::record); both only copy into a slot. A single
/// consumer thread renders the records and writes them to the sink.
///
/// `Logger` is `Sync`; share it by reference or behind an `Arc`.
pub struct Logger {
    pool: Arc<SlotPool>,
    shared: Arc<Shared>,
    control: Sender<Command>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    config: LoggerConfig,
    /// Optional callback for overflow notifications
    on_overflow: Option<OverflowCallback>,
}

impl Logger {
    /// Start a logger with no sink; records are discarded until one is set
    pub fn new(config: LoggerConfig) -> Result<Self> {
        Self::start(config, None, None)
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_ring_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .capacity_log2(8)
    ///     .sink(MemorySink::new())
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn start(
        config: LoggerConfig,
        sink: Option<Box<dyn Sink>>,
        on_overflow: Option<OverflowCallback>,
    ) -> Result<Self> {
        config.validate()?;

        let pool = Arc::new(SlotPool::with_config(&config));
        let cursor = pool
            .drain_cursor()
            .ok_or_else(|| LoggerError::other("slot pool already has a consumer"))?;
        let shared = Arc::new(Shared::new());
        let (control, commands) = crossbeam_channel::unbounded();

        let consumer = Consumer::new(cursor, sink, commands, Arc::clone(&shared), &config);
        let handle = thread::Builder::new()
            .name(CONSUMER_THREAD_NAME.to_string())
            .spawn(move || consumer.run())
            .map_err(|e| {
                LoggerError::io_operation("spawning consumer thread", CONSUMER_THREAD_NAME, e)
            })?;

        Ok(Self {
            pool,
            shared,
            control,
            worker: Mutex::new(Some(handle)),
            config,
            on_overflow,
        })
    }

    /// Log one record
    ///
    /// Copies the template and arguments into a slot and returns; no I/O
    /// happens on the calling thread. A record dropped because the ring is
    /// full is not an error: it is counted in [`metrics`](Logger::metrics).
    ///
    /// Each `%` takes the next argument. When the text right after it
    /// starts with a conversion spelling (`d`, `i`, `u`, `ld`, `li`, `lu`,
    /// `c`, `x`, `X`, `02x`, `02X`, `f`, `lf`, `s`, `.*s`, `p`) that
    /// spelling is part of the marker: it is consumed if it belongs to the
    /// argument's kind and is a [`LoggerError::TypeMismatch`] otherwise. So
    /// a bare `%` must not be followed by one of those letters:
    /// `"count=%items"` with an int renders `count=5tems`, and `"took %us"`
    /// with an int is a type mismatch. Write `"count=% items"` or use the
    /// matching spelling (`"count=%d items"`). `%%` renders a single `%`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_ring_logger::prelude::*;
    ///
    /// let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
    /// logger.write("%d-%s\n", &[Arg::Int(42), Arg::CString("ok")]).unwrap();
    /// ```
    pub fn write(&self, template: &str, args: &[Arg<'_>]) -> Result<()> {
        self.record(template).args(args).commit()
    }

    /// Like [`write`](Logger::write) but never waits and never drops silently
    ///
    /// Returns [`LoggerError::PoolFull`] when no slot is free, whatever the
    /// configured overflow policy.
    pub fn try_write(&self, template: &str, args: &[Arg<'_>]) -> Result<()> {
        let metrics = &self.shared.metrics;
        if let Err(e) = self.check_accepting(template) {
            return RecordBuilder::failed(metrics, e).commit();
        }
        match self.pool.try_claim() {
            Some(claim) => self.begin(claim, template).args(args).commit(),
            None => {
                metrics.record_queue_full();
                Err(LoggerError::pool_full(self.pool.capacity()))
            }
        }
    }

    /// Start a record to be filled with typed appends and finished by
    /// [`RecordBuilder::commit`]
    pub fn record(&self, template: &str) -> RecordBuilder<'_> {
        let metrics = &self.shared.metrics;
        if let Err(e) = self.check_accepting(template) {
            return RecordBuilder::failed(metrics, e);
        }
        match self.claim() {
            Ok(Some(claim)) => self.begin(claim, template),
            Ok(None) => RecordBuilder::dropped(metrics),
            Err(e) => RecordBuilder::failed(metrics, e),
        }
    }

    fn check_accepting(&self, template: &str) -> Result<()> {
        if self.shared.stop_requested() {
            return Err(LoggerError::LoggerStopped);
        }
        if template.len() > self.config.max_template_len {
            return Err(LoggerError::TemplateTooLong {
                len: template.len(),
                max: self.config.max_template_len,
            });
        }
        Ok(())
    }

    fn begin<'a>(&'a self, mut claim: ClaimedSlot<'a>, template: &str) -> RecordBuilder<'a> {
        let metrics = &self.shared.metrics;
        match claim.record().begin(template, SystemTime::now()) {
            Ok(()) => RecordBuilder::claimed(metrics, claim),
            Err(e) => {
                claim.discard();
                RecordBuilder::failed(metrics, e)
            }
        }
    }

    /// Claim a slot, applying the overflow policy when the ring is full
    ///
    /// `Ok(None)` means the record was dropped and counted.
    fn claim(&self) -> Result<Option<ClaimedSlot<'_>>> {
        if let Some(claim) = self.pool.try_claim() {
            return Ok(Some(claim));
        }
        self.shared.metrics.record_queue_full();

        let deadline = match self.config.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.alert_and_drop();
                return Ok(None);
            }
            OverflowPolicy::Block => None,
            OverflowPolicy::BlockWithTimeout(timeout) => Some(Instant::now() + timeout),
        };

        self.shared.metrics.record_block();
        let backoff = Backoff::new();
        loop {
            if let Some(claim) = self.pool.try_claim() {
                return Ok(Some(claim));
            }
            if self.shared.stop_requested() || self.shared.state() == LoggerState::Stopped {
                return Err(LoggerError::LoggerStopped);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                self.alert_and_drop();
                return Ok(None);
            }
            if backoff.is_completed() {
                thread::sleep(BLOCKED_CLAIM_SLEEP);
            } else {
                backoff.snooze();
            }
        }
    }

    /// Drop a record with alert notification
    fn alert_and_drop(&self) {
        let dropped_count = self.shared.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;

        if should_alert {
            eprintln!(
                "[LOGGER WARNING] Slot ring full ({} slots), {} records dropped. \
                 Consider a larger capacity_log2 or a blocking overflow policy.",
                self.pool.capacity(),
                dropped_count + 1
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    /// Open `path` in append mode and make it the sink
    ///
    /// The file is opened on the calling thread so failures are returned
    /// here. Records written after this returns go to the new file.
    pub fn open(&self, path: impl Into<PathBuf>) -> Result<()> {
        let sink = FileSink::open(path)?;
        self.set_sink(Box::new(sink))
    }

    /// Replace the sink; the previous one is flushed and dropped
    ///
    /// Returns once the consumer has switched over.
    pub fn set_sink(&self, sink: Box<dyn Sink>) -> Result<()> {
        self.request("sink replacement", |ack| Command::SetSink(sink, ack))
    }

    /// Flush and drop the current sink; later records are discarded
    pub fn close_sink(&self) -> Result<()> {
        self.request("sink close", Command::CloseSink)
    }

    /// Drain every published record and flush the sink
    ///
    /// A no-op once the logger is closed.
    pub fn flush(&self) -> Result<()> {
        if self.shared.stop_requested() {
            return Ok(());
        }
        self.request("flush", Command::Flush)
    }

    /// Send a command and wait for the consumer to acknowledge it
    ///
    /// Waits for at most [`DEFAULT_SHUTDOWN_TIMEOUT`].
    fn request(&self, what: &str, command: impl FnOnce(Sender<()>) -> Command) -> Result<()> {
        if self.shared.stop_requested() {
            return Err(LoggerError::LoggerStopped);
        }
        let (ack, done) = bounded(1);
        self.control
            .send(command(ack))
            .map_err(|_| LoggerError::LoggerStopped)?;

        match done.recv_timeout(DEFAULT_SHUTDOWN_TIMEOUT) {
            Ok(()) => Ok(()),
            Err(RecvTimeoutError::Disconnected) => Err(LoggerError::LoggerStopped),
            Err(RecvTimeoutError::Timeout) => Err(LoggerError::other(format!(
                "consumer did not acknowledge {} within {:?}",
                what, DEFAULT_SHUTDOWN_TIMEOUT
            ))),
        }
    }

    /// Flush, drain and stop the consumer; safe to call more than once
    pub fn close(&self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// Every record published before this call is written and the sink is
    /// flushed. Records still being built on other threads are forfeit.
    ///
    /// # Returns
    ///
    /// `true` if the consumer finished within `timeout` (or had already
    /// finished), `false` otherwise. A timed-out shutdown can be retried.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_ring_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::new(LoggerConfig::default()).unwrap();
    /// logger.open("/tmp/app.log").unwrap();
    /// logger.write("starting\n", &[]).unwrap();
    ///
    /// if !logger.shutdown(Duration::from_secs(10)) {
    ///     eprintln!("Warning: Logger shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.shared.request_stop();
        // cut the consumer's current sleep short
        let _ = self.control.send(Command::Wake);

        let mut worker = self.worker.lock();
        let start = Instant::now();

        loop {
            let finished = match worker.as_ref() {
                None => return true,
                Some(handle) => handle.is_finished(),
            };

            if finished {
                if let Some(handle) = worker.take() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Consumer thread panicked during shutdown: {:?}",
                            e
                        );
                        return false;
                    }
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Consumer thread did not finish within {:?} timeout. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn state(&self) -> LoggerState {
        self.shared.state()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_ring_logger::prelude::*;
    ///
    /// let logger = Logger::new(LoggerConfig::default()).unwrap();
    ///
    /// // After logging operations...
    /// let metrics = logger.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Total logged: {}", metrics.total_logged());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Records dropped because the ring was full
    pub fn dropped_count(&self) -> u64 {
        self.shared.metrics.dropped_count()
    }

    /// Number of slots in the ring
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

        // Report any dropped records
        let metrics = &self.shared.metrics;
        let dropped = metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped records (drop rate: {:.2}%)",
                dropped,
                metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_ring_logger::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .capacity_log2(12)
///     .poll_interval(Duration::from_millis(5))
///     .overflow_policy(OverflowPolicy::DropNewest)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} records dropped", count);
///     }))
///     .sink(ConsoleSink::new())
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Box<dyn Sink>>,
    on_overflow: Option<OverflowCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
            on_overflow: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Ring holds `2^capacity_log2` slots
    #[must_use = "builder methods return a new value"]
    pub fn capacity_log2(mut self, capacity_log2: u32) -> Self {
        self.config.capacity_log2 = capacity_log2;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_template_len(mut self, len: usize) -> Self {
        self.config.max_template_len = len;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_arguments(mut self, count: usize) -> Self {
        self.config.max_arguments = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_argument_size(mut self, size: usize) -> Self {
        self.config.max_argument_size = size;
        self
    }

    /// Set the overflow policy
    ///
    /// Determines what a producer does when every slot is pending.
    /// Default is `DropNewest`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_ring_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn argument_overflow(mut self, policy: ArgumentOverflow) -> Self {
        self.config.argument_overflow = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Escape `\n`, `\r` and `\t` inside text arguments (off by default)
    #[must_use = "builder methods return a new value"]
    pub fn sanitize_arguments(mut self, enabled: bool) -> Self {
        self.config.sanitize_arguments = enabled;
        self
    }

    /// Sink installed before the consumer starts
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// The callback is invoked when records are dropped because the ring is
    /// full. The parameter is the total count of dropped records.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_ring_logger::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let logger = Logger::builder()
    ///     .on_overflow(Arc::new(|count| {
    ///         eprintln!("Warning: {} records dropped", count);
    ///     }))
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Validate the configuration and start the consumer
    pub fn build(self) -> Result<Logger> {
        Logger::start(self.config, self.sink, self.on_overflow)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn quiet_logger(capacity_log2: u32, policy: OverflowPolicy) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .capacity_log2(capacity_log2)
            // long poll so nothing drains before close()
            .poll_interval(Duration::from_secs(2))
            .overflow_policy(policy)
            .sink(sink.clone())
            .build()
            .expect("logger");
        (logger, sink)
    }

    #[test]
    fn test_builder_default() {
        let logger = LoggerBuilder::default().build().expect("logger");
        assert_eq!(logger.capacity(), 1024);
        assert_eq!(logger.dropped_count(), 0);
        assert_eq!(logger.config().overflow_policy, OverflowPolicy::DropNewest);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = Logger::builder().capacity_log2(0).build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_state_transitions() {
        let logger = Logger::new(LoggerConfig::default()).expect("logger");
        let deadline = Instant::now() + Duration::from_secs(2);
        while logger.state() == LoggerState::Created && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(logger.state(), LoggerState::Running);

        assert!(logger.shutdown(Duration::from_secs(2)));
        assert_eq!(logger.state(), LoggerState::Stopped);
    }

    #[test]
    fn test_drop_newest_counts_and_alerts() {
        let alerts = Arc::new(AtomicU64::new(0));
        let alerts_clone = Arc::clone(&alerts);
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .capacity_log2(1)
            .poll_interval(Duration::from_secs(2))
            .on_overflow(Arc::new(move |count| {
                alerts_clone.store(count, Ordering::Relaxed);
            }))
            .sink(sink.clone())
            .build()
            .expect("logger");

        for i in 0..3 {
            logger.write("n=%d\n", &[Arg::Int(i)]).expect("drop is not an error");
        }
        assert_eq!(logger.dropped_count(), 1);
        assert_eq!(logger.metrics().queue_full_events(), 1);
        assert_eq!(alerts.load(Ordering::Relaxed), 1);

        logger.close();
        assert_eq!(sink.messages(), vec!["n=0", "n=1"]);
    }

    #[test]
    fn test_try_write_reports_pool_full() {
        let (logger, _sink) = quiet_logger(1, OverflowPolicy::Block);
        logger.try_write("a\n", &[]).expect("first");
        logger.try_write("b\n", &[]).expect("second");

        let err = logger.try_write("c\n", &[]).expect_err("ring is full");
        assert!(matches!(err, LoggerError::PoolFull { capacity: 2 }));
        assert_eq!(logger.dropped_count(), 0);
    }

    #[test]
    fn test_block_with_timeout_gives_up() {
        let (logger, sink) = quiet_logger(
            1,
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(20)),
        );
        logger.write("a\n", &[]).expect("a");
        logger.write("b\n", &[]).expect("b");

        let start = Instant::now();
        logger.write("c\n", &[]).expect("timeout drops, not an error");
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(logger.dropped_count(), 1);
        assert_eq!(logger.metrics().block_events(), 1);

        logger.close();
        assert_eq!(sink.messages(), vec!["a", "b"]);
    }

    #[test]
    fn test_write_after_close() {
        let (logger, _sink) = quiet_logger(2, OverflowPolicy::DropNewest);
        logger.close();
        logger.close();

        assert!(matches!(
            logger.write("late\n", &[]),
            Err(LoggerError::LoggerStopped)
        ));
        assert!(matches!(
            logger.set_sink(Box::new(MemorySink::new())),
            Err(LoggerError::LoggerStopped)
        ));
        logger.flush().expect("flush after close is a no-op");
    }

    #[test]
    fn test_template_too_long_does_not_claim() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .capacity_log2(1)
            .max_template_len(8)
            .sink(sink.clone())
            .build()
            .expect("logger");

        let err = logger
            .write("this template is too long\n", &[])
            .expect_err("too long");
        assert!(matches!(err, LoggerError::TemplateTooLong { max: 8, .. }));
        assert_eq!(logger.metrics().malformed_count(), 1);
        // both slots still free
        logger.try_write("a\n", &[]).expect("a");
        logger.try_write("b\n", &[]).expect("b");
    }

    #[test]
    fn test_close_sink_discards_later_records() {
        let (logger, sink) = quiet_logger(4, OverflowPolicy::DropNewest);
        logger.write("kept\n", &[]).expect("write");
        logger.flush().expect("flush");
        logger.close_sink().expect("close sink");
        logger.write("lost\n", &[]).expect("write");
        logger.close();

        assert_eq!(sink.messages(), vec!["kept"]);
        assert_eq!(logger.metrics().discarded_without_sink(), 1);
    }

    #[test]
    fn test_spelling_letters_after_bare_marker() {
        let (logger, sink) = quiet_logger(4, OverflowPolicy::DropNewest);

        // `i` spells an int conversion, so it belongs to the marker
        logger.write("count=%items\n", &[Arg::Int(5)]).expect("write");
        logger.write("count=% items\n", &[Arg::Int(5)]).expect("write");

        // `u` spells an unsigned conversion, which an int cannot take
        let err = logger
            .write("took %us\n", &[Arg::Int(7)])
            .expect_err("type mismatch");
        assert!(matches!(
            err,
            LoggerError::TypeMismatch { index: 0, ref directive, .. } if directive == "u"
        ));
        assert_eq!(logger.metrics().malformed_count(), 1);

        logger.close();
        assert_eq!(sink.messages(), vec!["count=5tems", "count=5 items"]);
    }

    #[test]
    fn test_flush_drains_immediately() {
        let (logger, sink) = quiet_logger(4, OverflowPolicy::DropNewest);
        logger.write("flushed %s\n", &[Arg::CString("now")]).expect("write");
        logger.flush().expect("flush");
        assert_eq!(sink.messages(), vec!["flushed now"]);
        assert!(sink.flush_count() >= 1);
    }
}
