//! Typed, incremental record construction
//!
//! [`Logger::record`](super::Logger::record) claims a slot and returns a
//! [`RecordBuilder`]. Each typed append stores one argument directly into the
//! slot; [`commit`](RecordBuilder::commit) checks the template against the
//! stored arguments and publishes the slot.
//!
//! ```
//! use rust_ring_logger::prelude::*;
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
//! logger
//!     .record("user %s logged in from %d.%d.%d.%d\n")
//!     .str("alice")
//!     .int(10)
//!     .int(0)
//!     .int(0)
//!     .int(1)
//!     .commit()
//!     .unwrap();
//! ```

use super::argument::Arg;
use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::pool::ClaimedSlot;

/// A record under construction
///
/// Dropping a builder without calling [`commit`](Self::commit) discards the
/// record and counts it as malformed.
#[must_use = "a record is only logged once commit() is called"]
pub struct RecordBuilder<'a> {
    metrics: &'a LoggerMetrics,
    claim: Option<ClaimedSlot<'a>>,
    error: Option<LoggerError>,
    committed: bool,
}

impl<'a> RecordBuilder<'a> {
    /// A builder writing into a claimed slot whose template is already set
    pub(crate) fn claimed(metrics: &'a LoggerMetrics, claim: ClaimedSlot<'a>) -> Self {
        Self {
            metrics,
            claim: Some(claim),
            error: None,
            committed: false,
        }
    }

    /// A builder whose record was dropped by the overflow policy
    ///
    /// Appends are accepted and ignored; commit succeeds.
    pub(crate) fn dropped(metrics: &'a LoggerMetrics) -> Self {
        Self {
            metrics,
            claim: None,
            error: None,
            committed: false,
        }
    }

    /// A builder that will report `error` from commit
    pub(crate) fn failed(metrics: &'a LoggerMetrics, error: LoggerError) -> Self {
        Self {
            metrics,
            claim: None,
            error: Some(error),
            committed: false,
        }
    }

    /// True if the record holds a slot and no error so far
    pub fn is_active(&self) -> bool {
        self.claim.is_some() && self.error.is_none()
    }

    /// Append any argument
    pub fn arg<'b>(mut self, arg: impl Into<Arg<'b>>) -> Self {
        self.push(arg.into());
        self
    }

    /// Append every argument in order
    pub fn args(mut self, args: &[Arg<'_>]) -> Self {
        for arg in args {
            if !self.is_active() {
                break;
            }
            self.push(*arg);
        }
        self
    }

    pub fn int(self, value: i32) -> Self {
        self.arg(Arg::Int(value))
    }

    pub fn uint(self, value: u32) -> Self {
        self.arg(Arg::UnsignedInt(value))
    }

    pub fn long(self, value: i64) -> Self {
        self.arg(Arg::Long(value))
    }

    pub fn ulong(self, value: u64) -> Self {
        self.arg(Arg::UnsignedLong(value))
    }

    /// A single byte rendered as itself
    pub fn char(self, value: u8) -> Self {
        self.arg(Arg::Char(value))
    }

    /// A single byte rendered as two hex digits
    pub fn uchar(self, value: u8) -> Self {
        self.arg(Arg::UnsignedChar(value))
    }

    pub fn float(self, value: f32) -> Self {
        self.arg(Arg::Float(value))
    }

    pub fn double(self, value: f64) -> Self {
        self.arg(Arg::Double(value))
    }

    pub fn str(self, value: &str) -> Self {
        self.arg(Arg::CString(value))
    }

    pub fn bytes(self, value: &[u8]) -> Self {
        self.arg(Arg::ByteBuffer(value))
    }

    pub fn ptr<T: ?Sized>(self, value: *const T) -> Self {
        self.arg(Arg::pointer(value))
    }

    fn push(&mut self, arg: Arg<'_>) {
        if self.error.is_some() {
            return;
        }
        let Some(claim) = self.claim.as_mut() else {
            return;
        };
        match claim.record().push(arg) {
            Ok(true) => {
                self.metrics.record_truncated();
            }
            Ok(false) => {}
            Err(e) => self.error = Some(e),
        }
    }

    /// Validate and publish the record
    ///
    /// Returns `Ok(())` for a record dropped by the overflow policy. On a
    /// contract error the slot is published as discarded and the error is
    /// returned.
    pub fn commit(mut self) -> Result<()> {
        self.committed = true;

        let outcome = match (self.error.take(), self.claim.take()) {
            (Some(e), claim) => {
                if let Some(claim) = claim {
                    claim.discard();
                }
                Err(e)
            }
            (None, Some(mut claim)) => match claim.record().finish() {
                Ok(()) => {
                    claim.publish();
                    Ok(())
                }
                Err(e) => {
                    claim.discard();
                    Err(e)
                }
            },
            (None, None) => Ok(()),
        };

        if let Err(ref e) = outcome {
            if e.is_contract_violation() {
                self.metrics.record_malformed();
            }
        }
        outcome
    }
}

impl Drop for RecordBuilder<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Some(claim) = self.claim.take() {
            claim.discard();
            let previous = self.metrics.record_malformed();
            if previous == 0 || (previous + 1) % 1000 == 0 {
                eprintln!(
                    "[LOGGER ERROR] {} ({} malformed records so far)",
                    LoggerError::UnterminatedRecord,
                    previous + 1
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::RecordLimits;
    use crate::core::pool::SlotPool;
    use crate::core::ArgumentOverflow;
    use std::sync::Arc;
    use std::time::SystemTime;

    fn pool() -> Arc<SlotPool> {
        let limits = RecordLimits {
            max_template_len: 64,
            max_arguments: 4,
            max_argument_size: 8,
            ..RecordLimits::default()
        };
        Arc::new(SlotPool::new(2, limits))
    }

    fn begin<'a>(pool: &'a SlotPool, metrics: &'a LoggerMetrics, template: &str) -> RecordBuilder<'a> {
        let mut claim = pool.try_claim().expect("free slot");
        claim
            .record()
            .begin(template, SystemTime::now())
            .expect("template fits");
        RecordBuilder::claimed(metrics, claim)
    }

    fn drain_one(pool: &Arc<SlotPool>) -> (bool, Vec<u8>) {
        let mut cursor = pool.drain_cursor().expect("cursor");
        let mut ready = cursor.poll().expect("published");
        let record = ready.record();
        let discarded = record.is_discarded();
        let mut out = Vec::new();
        if !discarded {
            record.render(&mut out).expect("render");
        }
        (discarded, out)
    }

    #[test]
    fn test_typed_appends_commit() {
        let pool = pool();
        let metrics = LoggerMetrics::new();
        begin(&pool, &metrics, "%d %u %ld %02x\n")
            .int(-1)
            .uint(2)
            .long(3)
            .uchar(0xab)
            .commit()
            .expect("commit");

        let (discarded, out) = drain_one(&pool);
        assert!(!discarded);
        assert_eq!(out, b"-1 2 3 ab\n");
        assert_eq!(metrics.malformed_count(), 0);
    }

    #[test]
    fn test_missing_argument_is_count_mismatch() {
        let pool = pool();
        let metrics = LoggerMetrics::new();
        let err = begin(&pool, &metrics, "%d %d\n")
            .int(1)
            .commit()
            .expect_err("one placeholder short");
        assert!(matches!(
            err,
            LoggerError::ArgumentCountMismatch { placeholders: 2, arguments: 1 }
        ));
    }

    #[test]
    fn test_type_mismatch_discards_slot() {
        let pool = pool();
        let metrics = LoggerMetrics::new();
        let err = begin(&pool, &metrics, "%s\n")
            .int(7)
            .commit()
            .expect_err("mismatch");

        assert!(matches!(err, LoggerError::TypeMismatch { index: 0, .. }));
        assert_eq!(metrics.malformed_count(), 1);
        let (discarded, _) = drain_one(&pool);
        assert!(discarded);
    }

    #[test]
    fn test_too_many_arguments() {
        let pool = pool();
        let metrics = LoggerMetrics::new();
        let err = begin(&pool, &metrics, "%d%d%d%d%d")
            .args(&[Arg::Int(1), Arg::Int(2), Arg::Int(3), Arg::Int(4), Arg::Int(5)])
            .commit()
            .expect_err("five arguments in four cells");
        assert!(matches!(err, LoggerError::TooManyArguments { max: 4 }));
    }

    #[test]
    fn test_truncation_is_counted() {
        let pool = pool();
        let metrics = LoggerMetrics::new();
        begin(&pool, &metrics, "%s\n")
            .str("longer than eight")
            .commit()
            .expect("truncate is the default");
        assert_eq!(metrics.truncated_arguments(), 1);
        let (_, out) = drain_one(&pool);
        assert_eq!(out, b"longer t\n");
    }

    #[test]
    fn test_reject_oversized_argument() {
        let limits = RecordLimits {
            max_template_len: 64,
            max_arguments: 4,
            max_argument_size: 8,
            argument_overflow: ArgumentOverflow::Reject,
            ..RecordLimits::default()
        };
        let pool = Arc::new(SlotPool::new(2, limits));
        let metrics = LoggerMetrics::new();
        let err = begin(&pool, &metrics, "%s\n")
            .str("longer than eight")
            .commit()
            .expect_err("reject");
        assert!(matches!(err, LoggerError::ArgumentTooLarge { index: 0, .. }));
        assert_eq!(metrics.malformed_count(), 1);
    }

    #[test]
    fn test_drop_without_commit() {
        let pool = pool();
        let metrics = LoggerMetrics::new();
        {
            let _builder = begin(&pool, &metrics, "%d\n").int(1);
        }
        assert_eq!(metrics.malformed_count(), 1);
        let (discarded, _) = drain_one(&pool);
        assert!(discarded);
    }

    #[test]
    fn test_dropped_builder_is_inert() {
        let metrics = LoggerMetrics::new();
        let builder = RecordBuilder::dropped(&metrics).int(1).str("ignored");
        assert!(!builder.is_active());
        builder.commit().expect("dropped records commit cleanly");
        assert_eq!(metrics.malformed_count(), 0);
    }

    #[test]
    fn test_failed_builder_reports_error() {
        let metrics = LoggerMetrics::new();
        let err = RecordBuilder::failed(&metrics, LoggerError::LoggerStopped)
            .int(1)
            .commit()
            .expect_err("stopped");
        assert!(matches!(err, LoggerError::LoggerStopped));
        assert_eq!(metrics.malformed_count(), 0);
    }
}
