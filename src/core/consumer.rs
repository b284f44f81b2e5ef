//! Background drain worker
//!
//! One thread per logger. It sleeps a fixed poll interval, drains the
//! slots that were ready when the pass began in claim order, writes each
//! rendered record to the sink and flushes on a timer. Producers never wake it; the control channel only
//! carries adapter-level requests (sink replacement, flush, stop).

use super::{
    config::LoggerConfig,
    encoder::SlotRecord,
    error::LoggerError,
    metrics::LoggerMetrics,
    pool::DrainCursor,
    sink::Sink,
    timestamp::TimestampFormat,
};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lifecycle of the consumer worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LoggerState {
    Created = 0,
    Running = 1,
    Draining = 2,
    Stopped = 3,
}

impl LoggerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoggerState::Created,
            1 => LoggerState::Running,
            2 => LoggerState::Draining,
            _ => LoggerState::Stopped,
        }
    }
}

impl fmt::Display for LoggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerState::Created => write!(f, "Created"),
            LoggerState::Running => write!(f, "Running"),
            LoggerState::Draining => write!(f, "Draining"),
            LoggerState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// State shared between the logger handle and its worker
#[derive(Debug)]
pub(crate) struct Shared {
    pub metrics: LoggerMetrics,
    state: AtomicU8,
    stop_requested: AtomicBool,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            metrics: LoggerMetrics::new(),
            state: AtomicU8::new(LoggerState::Created as u8),
            stop_requested: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn state(&self) -> LoggerState {
        LoggerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: LoggerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

/// Requests from the adapter layer to the worker
pub(crate) enum Command {
    /// Replace the sink, flushing the old one first, then acknowledge
    SetSink(Box<dyn Sink>, Sender<()>),
    /// Flush and drop the current sink, then acknowledge
    CloseSink(Sender<()>),
    /// Drain now, flush the sink, then acknowledge
    Flush(Sender<()>),
    /// Cut the current sleep short; the stop flag is already set
    Wake,
}

/// Renders drained records and owns the sink
struct SinkWriter {
    sink: Option<Box<dyn Sink>>,
    shared: Arc<Shared>,
    timestamp_format: TimestampFormat,
    flush_interval: Duration,
    last_flush: Instant,
    dirty: bool,
    message: Vec<u8>,
    timestamp: String,
}

impl SinkWriter {
    fn emit(&mut self, record: &mut SlotRecord) {
        if record.is_discarded() {
            record.clear();
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            record.clear();
            self.shared.metrics.record_discarded_without_sink();
            return;
        };

        self.message.clear();
        if let Err(e) = record.render(&mut self.message) {
            record.clear();
            let previous = self.shared.metrics.record_malformed();
            alert(previous, "[LOGGER ERROR] Dropping record that failed to render", &e);
            return;
        }
        if self.message.last() != Some(&b'\n') {
            self.message.push(b'\n');
        }

        self.timestamp.clear();
        if self
            .timestamp_format
            .write_to(&mut self.timestamp, record.timestamp())
            .is_err()
        {
            self.timestamp.clear();
        }

        let (timestamp, message) = (&self.timestamp, &self.message);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            sink.write_record(timestamp, message)
        }));
        match result {
            Ok(Ok(())) => {
                self.shared.metrics.record_logged();
                self.dirty = true;
            }
            Ok(Err(e)) => {
                let previous = self.shared.metrics.record_sink_error();
                alert(
                    previous,
                    &format!("[LOGGER ERROR] Sink '{}' write failed", sink.name()),
                    &e,
                );
            }
            Err(panic_info) => {
                let previous = self.shared.metrics.record_sink_error();
                alert(
                    previous,
                    &format!("[LOGGER CRITICAL] Sink '{}' panicked", sink.name()),
                    &LoggerError::writer(panic_message(panic_info)),
                );
            }
        }
    }

    fn flush(&mut self, force: bool) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if !self.dirty && !force {
            return;
        }
        if !force && self.last_flush.elapsed() < self.flush_interval {
            return;
        }
        if let Err(e) = sink.flush() {
            let previous = self.shared.metrics.record_sink_error();
            alert(
                previous,
                &format!("[LOGGER ERROR] Sink '{}' flush failed", sink.name()),
                &e,
            );
        }
        self.last_flush = Instant::now();
        self.dirty = false;
    }

    fn replace(&mut self, sink: Option<Box<dyn Sink>>) {
        self.flush(true);
        self.sink = sink;
        self.last_flush = Instant::now();
    }
}

fn panic_message(panic_info: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Report the first failure and every 1000th after it
fn alert(previous: u64, context: &str, error: &LoggerError) {
    if previous == 0 || (previous + 1) % 1000 == 0 {
        eprintln!("{} ({} so far): {}", context, previous + 1, error);
    }
}

/// The drain loop; runs on its own thread until stopped
pub(crate) struct Consumer {
    cursor: DrainCursor,
    writer: SinkWriter,
    control: Receiver<Command>,
    poll_interval: Duration,
}

impl Consumer {
    pub fn new(
        cursor: DrainCursor,
        sink: Option<Box<dyn Sink>>,
        control: Receiver<Command>,
        shared: Arc<Shared>,
        config: &LoggerConfig,
    ) -> Self {
        Self {
            cursor,
            writer: SinkWriter {
                sink,
                shared,
                timestamp_format: config.timestamp_format.clone(),
                flush_interval: config.flush_interval,
                last_flush: Instant::now(),
                dirty: false,
                message: Vec::with_capacity(config.max_template_len * 2),
                timestamp: String::with_capacity(32),
            },
            control,
            poll_interval: config.poll_interval,
        }
    }

    pub fn run(mut self) {
        let shared = Arc::clone(&self.writer.shared);
        shared.set_state(LoggerState::Running);

        loop {
            match self.control.recv_timeout(self.poll_interval) {
                Ok(command) => self.apply(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => shared.request_stop(),
            }
            while let Ok(command) = self.control.try_recv() {
                self.apply(command);
            }
            if shared.stop_requested() {
                break;
            }
            self.drain_pass();
            self.writer.flush(false);
        }

        shared.set_state(LoggerState::Draining);
        while let Ok(command) = self.control.try_recv() {
            self.apply(command);
        }
        self.drain_pass();
        self.writer.flush(true);
        shared.set_state(LoggerState::Stopped);
    }

    /// Drain ready slots in claim order; returns how many were taken
    ///
    /// Stops at the producer position seen on entry, so producers that
    /// keep the ring busy cannot hold the loop away from its timed flush.
    fn drain_pass(&mut self) -> usize {
        let end = self.cursor.pool().producer_position();
        let mut drained = 0;
        while self.cursor.position() < end {
            let Some(mut ready) = self.cursor.poll() else {
                break;
            };
            self.writer.emit(ready.record());
            drained += 1;
        }
        drained
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetSink(sink, ack) => {
                self.writer.replace(Some(sink));
                let _ = ack.send(());
            }
            Command::CloseSink(ack) => {
                self.writer.replace(None);
                let _ = ack.send(());
            }
            Command::Flush(ack) => {
                self.drain_pass();
                self.writer.flush(true);
                let _ = ack.send(());
            }
            Command::Wake => {}
        }
    }
}
