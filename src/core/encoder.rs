//! Record encoding and replay
//!
//! A [`SlotRecord`] is the fixed-layout body of one slot: a template buffer,
//! a row of argument cells and the capture timestamp. Encoding copies a
//! call site into it; rendering replays the template, substituting each `%`
//! with the next stored argument.
//!
//! # Example
//!
//! ```
//! use rust_ring_logger::core::{Arg, RecordLimits, SlotRecord};
//! use std::time::SystemTime;
//!
//! let mut record = SlotRecord::new(RecordLimits::default());
//! record
//!     .encode("%d-%s\n", &[Arg::Int(42), Arg::CString("ok")], SystemTime::now())
//!     .unwrap();
//!
//! let mut out = Vec::new();
//! record.render(&mut out).unwrap();
//! assert_eq!(out, b"42-ok\n");
//! ```

use super::argument::{Arg, ArgCell, ArgKind, RenderStyle, ALL_SPELLINGS};
use super::config::LoggerConfig;
use super::error::{LoggerError, Result};
use super::overflow_policy::ArgumentOverflow;
use std::time::SystemTime;

/// Capacities of one slot record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLimits {
    pub max_template_len: usize,
    pub max_arguments: usize,
    pub max_argument_size: usize,
    pub argument_overflow: ArgumentOverflow,
    pub sanitize_arguments: bool,
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self::from(&LoggerConfig::default())
    }
}

impl From<&LoggerConfig> for RecordLimits {
    fn from(config: &LoggerConfig) -> Self {
        Self {
            max_template_len: config.max_template_len,
            max_arguments: config.max_arguments,
            max_argument_size: config.max_argument_size,
            argument_overflow: config.argument_overflow,
            sanitize_arguments: config.sanitize_arguments,
        }
    }
}

enum Segment<'t> {
    Literal(&'t [u8]),
    /// A `%` marker; `rest` is the template text right after it
    Marker { index: usize, rest: &'t [u8] },
}

/// Walk `template`, calling `visit` per segment. The visitor returns how
/// many bytes after a marker belong to its conversion spelling.
fn walk<'t, F>(template: &'t [u8], mut visit: F) -> Result<usize>
where
    F: FnMut(Segment<'t>) -> Result<usize>,
{
    let mut pos = 0;
    let mut markers = 0;
    while pos < template.len() {
        let Some(offset) = template[pos..].iter().position(|&b| b == b'%') else {
            visit(Segment::Literal(&template[pos..]))?;
            break;
        };
        let at = pos + offset;
        if at > pos {
            visit(Segment::Literal(&template[pos..at]))?;
        }
        if template.get(at + 1) == Some(&b'%') {
            visit(Segment::Literal(b"%"))?;
            pos = at + 2;
            continue;
        }
        let rest = &template[at + 1..];
        let skip = visit(Segment::Marker {
            index: markers,
            rest,
        })?;
        markers += 1;
        pos = at + 1 + skip.min(rest.len());
    }
    Ok(markers)
}

/// Match the spelling after `%` against `kind`: (skip width, upper-case hex)
fn resolve_directive(index: usize, kind: ArgKind, rest: &[u8]) -> Result<(usize, bool)> {
    if let Some(spelling) = kind.spellings().iter().find(|s| rest.starts_with(s)) {
        return Ok((spelling.len(), spelling.ends_with(b"X")));
    }
    if let Some(foreign) = ALL_SPELLINGS.iter().find(|s| rest.starts_with(s)) {
        return Err(LoggerError::type_mismatch(index, foreign, kind.name()));
    }
    // bare marker
    Ok((0, false))
}

/// Body of one slot
#[derive(Debug)]
pub struct SlotRecord {
    template: Box<[u8]>,
    template_len: usize,
    cells: Box<[ArgCell]>,
    arg_count: usize,
    timestamp: SystemTime,
    discarded: bool,
    argument_overflow: ArgumentOverflow,
    sanitize: bool,
}

impl SlotRecord {
    pub fn new(limits: RecordLimits) -> Self {
        Self {
            template: vec![0u8; limits.max_template_len].into_boxed_slice(),
            template_len: 0,
            cells: (0..limits.max_arguments)
                .map(|_| ArgCell::with_capacity(limits.max_argument_size))
                .collect(),
            arg_count: 0,
            timestamp: SystemTime::UNIX_EPOCH,
            discarded: false,
            argument_overflow: limits.argument_overflow,
            sanitize: limits.sanitize_arguments,
        }
    }

    /// Start a new record: copy the template and clear previous arguments
    pub fn begin(&mut self, template: &str, timestamp: SystemTime) -> Result<()> {
        self.clear();
        let bytes = template.as_bytes();
        if bytes.len() > self.template.len() {
            self.discarded = true;
            return Err(LoggerError::TemplateTooLong {
                len: bytes.len(),
                max: self.template.len(),
            });
        }
        self.template[..bytes.len()].copy_from_slice(bytes);
        self.template_len = bytes.len();
        self.timestamp = timestamp;
        Ok(())
    }

    /// Store the next argument; returns true if its text was truncated
    pub fn push(&mut self, arg: Arg<'_>) -> Result<bool> {
        let index = self.arg_count;
        let Some(cell) = self.cells.get_mut(index) else {
            return Err(LoggerError::TooManyArguments {
                max: self.cells.len(),
            });
        };
        let truncated = cell.store(index, arg, self.argument_overflow)?;
        self.arg_count += 1;
        Ok(truncated)
    }

    /// Check every placeholder against the stored arguments
    pub fn finish(&self) -> Result<()> {
        let cells = &self.cells[..self.arg_count];
        let placeholders = walk(self.template(), |segment| match segment {
            Segment::Literal(_) => Ok(0),
            Segment::Marker { index, rest } => match cells.get(index) {
                Some(cell) => resolve_directive(index, cell.kind(), rest).map(|(skip, _)| skip),
                None => Ok(0),
            },
        })?;
        if placeholders != self.arg_count {
            return Err(LoggerError::ArgumentCountMismatch {
                placeholders,
                arguments: self.arg_count,
            });
        }
        Ok(())
    }

    /// `begin` + `push` for each argument + `finish`; returns the number of
    /// truncated arguments
    pub fn encode(
        &mut self,
        template: &str,
        args: &[Arg<'_>],
        timestamp: SystemTime,
    ) -> Result<usize> {
        self.begin(template, timestamp)?;
        let mut truncated = 0;
        for arg in args {
            if self.push(*arg)? {
                truncated += 1;
            }
        }
        self.finish()?;
        Ok(truncated)
    }

    /// Replay the template into `out`, resetting each consumed cell to `Unset`
    pub fn render(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let template = &self.template[..self.template_len];
        let cells = &mut self.cells[..self.arg_count];
        let sanitize = self.sanitize;
        let placeholders = walk(template, |segment| match segment {
            Segment::Literal(text) => {
                out.extend_from_slice(text);
                Ok(0)
            }
            Segment::Marker { index, rest } => {
                let cell = cells.get_mut(index).ok_or_else(|| {
                    LoggerError::render(format!("placeholder #{} has no argument", index))
                })?;
                let (skip, upper_hex) = resolve_directive(index, cell.kind(), rest)?;
                cell.render_into(out, RenderStyle { upper_hex, sanitize })?;
                cell.reset();
                Ok(skip)
            }
        })?;
        if placeholders != self.arg_count {
            return Err(LoggerError::render(format!(
                "{} arguments left unconsumed",
                self.arg_count - placeholders.min(self.arg_count)
            )));
        }
        Ok(())
    }

    /// Reset every cell and the template
    pub fn clear(&mut self) {
        for cell in &mut self.cells[..self.arg_count] {
            cell.reset();
        }
        self.arg_count = 0;
        self.template_len = 0;
        self.discarded = false;
    }

    #[inline]
    pub fn template(&self) -> &[u8] {
        &self.template[..self.template_len]
    }

    #[inline]
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    pub fn cells(&self) -> &[ArgCell] {
        &self.cells
    }

    #[inline]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Flag this record so the consumer skips it
    pub fn mark_discarded(&mut self) {
        self.discarded = true;
    }

    #[inline]
    pub fn is_discarded(&self) -> bool {
        self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::argument::ArgValue;

    fn limits() -> RecordLimits {
        RecordLimits {
            max_template_len: 64,
            max_arguments: 4,
            max_argument_size: 8,
            argument_overflow: ArgumentOverflow::Truncate,
            sanitize_arguments: true,
        }
    }

    fn render(template: &str, args: &[Arg<'_>]) -> String {
        let mut record = SlotRecord::new(limits());
        record
            .encode(template, args, SystemTime::now())
            .expect("encode");
        let mut out = Vec::new();
        record.render(&mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_bare_marker() {
        assert_eq!(render("x=%\n", &[Arg::Int(5)]), "x=5\n");
    }

    #[test]
    fn test_conventional_spellings_are_skipped() {
        assert_eq!(render("%d-%s\n", &[Arg::Int(42), Arg::CString("ok")]), "42-ok\n");
        assert_eq!(render("%ld|%lu", &[Arg::Long(-1), Arg::UnsignedLong(2)]), "-1|2");
        assert_eq!(render("[%02x]", &[Arg::UnsignedChar(7)]), "[07]");
        assert_eq!(render("[%02X]", &[Arg::UnsignedChar(0xbe)]), "[BE]");
        assert_eq!(render("%.*s!", &[Arg::ByteBuffer(b"data-type")]), "data-typ!");
        assert_eq!(render("%lf %f", &[Arg::Double(1.5), Arg::Float(2.0)]), "1.500000 2.000000");
        assert_eq!(render("%c%p", &[Arg::Char(b'$'), Arg::Pointer(16)]), "$0x10");
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(render("100%% of %d", &[Arg::Int(3)]), "100% of 3");
    }

    #[test]
    fn test_type_mismatch_detected_at_finish() {
        let mut record = SlotRecord::new(limits());
        let err = record
            .encode("%s", &[Arg::Int(1)], SystemTime::now())
            .unwrap_err();
        assert!(matches!(err, LoggerError::TypeMismatch { index: 0, .. }));
    }

    #[test]
    fn test_count_mismatch_detected_at_finish() {
        let mut record = SlotRecord::new(limits());
        let err = record
            .encode("%d %d", &[Arg::Int(1)], SystemTime::now())
            .unwrap_err();
        assert!(matches!(
            err,
            LoggerError::ArgumentCountMismatch {
                placeholders: 2,
                arguments: 1
            }
        ));

        let err = record
            .encode("no markers", &[Arg::Int(1)], SystemTime::now())
            .unwrap_err();
        assert!(matches!(
            err,
            LoggerError::ArgumentCountMismatch {
                placeholders: 0,
                arguments: 1
            }
        ));
    }

    #[test]
    fn test_template_too_long_rejected() {
        let mut record = SlotRecord::new(limits());
        let long = "x".repeat(65);
        let err = record.begin(&long, SystemTime::now()).unwrap_err();
        assert!(matches!(err, LoggerError::TemplateTooLong { len: 65, max: 64 }));
        assert!(record.is_discarded());
    }

    #[test]
    fn test_too_many_arguments() {
        let mut record = SlotRecord::new(limits());
        let args = [Arg::Int(0); 5];
        let err = record
            .encode("% % % % %", &args, SystemTime::now())
            .unwrap_err();
        assert!(matches!(err, LoggerError::TooManyArguments { max: 4 }));
    }

    #[test]
    fn test_render_resets_cells() {
        let mut record = SlotRecord::new(limits());
        record
            .encode("%d %s", &[Arg::Int(1), Arg::CString("a")], SystemTime::now())
            .expect("encode");
        let mut out = Vec::new();
        record.render(&mut out).expect("render");
        assert!(record.cells().iter().all(|cell| cell.value() == ArgValue::Unset));
    }

    #[test]
    fn test_render_missing_argument_fails() {
        // bypass finish() to simulate a corrupted record
        let mut record = SlotRecord::new(limits());
        record.begin("%d and %d", SystemTime::now()).expect("begin");
        record.push(Arg::Int(1)).expect("push");
        let mut out = Vec::new();
        assert!(matches!(
            record.render(&mut out),
            Err(LoggerError::RenderError(_))
        ));
    }

    #[test]
    fn test_reuse_after_discard_starts_clean() {
        let mut record = SlotRecord::new(limits());
        record.begin("%d", SystemTime::now()).expect("begin");
        record.push(Arg::Int(9)).expect("push");
        record.mark_discarded();

        record
            .encode("%u", &[Arg::UnsignedInt(3)], SystemTime::now())
            .expect("encode");
        assert!(!record.is_discarded());
        assert_eq!(record.arg_count(), 1);
        assert_eq!(record.cells()[0].value(), ArgValue::UnsignedInt(3));
    }

    #[test]
    fn test_encode_reports_truncation() {
        let mut record = SlotRecord::new(limits());
        let truncated = record
            .encode("%s %s", &[Arg::CString("0123456789"), Arg::CString("ok")], SystemTime::now())
            .expect("encode");
        assert_eq!(truncated, 1);
        let mut out = Vec::new();
        record.render(&mut out).expect("render");
        assert_eq!(out, b"01234567 ok");
    }
}
