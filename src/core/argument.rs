//! Typed log arguments
//!
//! [`Arg`] is what a call site passes in; [`ArgValue`] is what a slot keeps.
//! Text payloads are copied into the cell's fixed storage, so an `ArgValue`
//! never borrows from the caller.

use super::error::{LoggerError, Result};
use super::overflow_policy::ArgumentOverflow;
use std::fmt;
use std::io::Write;

/// Closed set of argument kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Char,
    UnsignedChar,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Float,
    Double,
    CString,
    ByteBuffer,
    Pointer,
    Unset,
}

/// Every conversion spelling recognised after `%`, longest first
pub(crate) const ALL_SPELLINGS: &[&[u8]] = &[
    b".*s", b"02x", b"02X", b"ld", b"li", b"lu", b"lf", b"c", b"x", b"X", b"d", b"i", b"u",
    b"f", b"s", b"p",
];

impl ArgKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::Char => "Char",
            ArgKind::UnsignedChar => "UnsignedChar",
            ArgKind::Int => "Int",
            ArgKind::UnsignedInt => "UnsignedInt",
            ArgKind::Long => "Long",
            ArgKind::UnsignedLong => "UnsignedLong",
            ArgKind::Float => "Float",
            ArgKind::Double => "Double",
            ArgKind::CString => "CString",
            ArgKind::ByteBuffer => "ByteBuffer",
            ArgKind::Pointer => "Pointer",
            ArgKind::Unset => "Unset",
        }
    }

    /// Conversion spellings this kind consumes after `%`, longest first
    pub fn spellings(&self) -> &'static [&'static [u8]] {
        match self {
            ArgKind::Char => &[b"c"],
            ArgKind::UnsignedChar => &[b"02x", b"02X", b"x", b"X"],
            ArgKind::Int => &[b"d", b"i"],
            ArgKind::UnsignedInt => &[b"u"],
            ArgKind::Long => &[b"ld", b"li", b"d"],
            ArgKind::UnsignedLong => &[b"lu", b"u"],
            ArgKind::Float => &[b"f"],
            ArgKind::Double => &[b"lf", b"f"],
            ArgKind::CString => &[b"s"],
            ArgKind::ByteBuffer => &[b".*s", b"s"],
            ArgKind::Pointer => &[b"p"],
            ArgKind::Unset => &[],
        }
    }

    /// Payload width in bytes for fixed-size kinds
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            ArgKind::Char | ArgKind::UnsignedChar => Some(1),
            ArgKind::Int | ArgKind::UnsignedInt | ArgKind::Float => Some(4),
            ArgKind::Long | ArgKind::UnsignedLong | ArgKind::Double => Some(8),
            ArgKind::Pointer => Some(std::mem::size_of::<usize>()),
            ArgKind::CString | ArgKind::ByteBuffer | ArgKind::Unset => None,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One argument as supplied by a call site
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    /// Rendered as the literal byte
    Char(u8),
    /// Rendered as two hex digits
    UnsignedChar(u8),
    Int(i32),
    UnsignedInt(u32),
    Long(i64),
    UnsignedLong(u64),
    Float(f32),
    Double(f64),
    /// Text, stored up to the first NUL
    CString(&'a str),
    /// Explicit-length bytes, rendered as if NUL terminated
    ByteBuffer(&'a [u8]),
    /// Address, rendered as `0x..`
    Pointer(usize),
}

impl<'a> Arg<'a> {
    pub fn pointer<T: ?Sized>(ptr: *const T) -> Self {
        Arg::Pointer(ptr as *const () as usize)
    }

    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Char(_) => ArgKind::Char,
            Arg::UnsignedChar(_) => ArgKind::UnsignedChar,
            Arg::Int(_) => ArgKind::Int,
            Arg::UnsignedInt(_) => ArgKind::UnsignedInt,
            Arg::Long(_) => ArgKind::Long,
            Arg::UnsignedLong(_) => ArgKind::UnsignedLong,
            Arg::Float(_) => ArgKind::Float,
            Arg::Double(_) => ArgKind::Double,
            Arg::CString(_) => ArgKind::CString,
            Arg::ByteBuffer(_) => ArgKind::ByteBuffer,
            Arg::Pointer(_) => ArgKind::Pointer,
        }
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg<'_> {
                #[inline]
                fn from(value: $ty) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )*
    };
}

impl_arg_from! {
    u8 => UnsignedChar as u8,
    i8 => Int as i32,
    i16 => Int as i32,
    u16 => UnsignedInt as u32,
    i32 => Int as i32,
    u32 => UnsignedInt as u32,
    i64 => Long as i64,
    u64 => UnsignedLong as u64,
    isize => Long as i64,
    usize => UnsignedLong as u64,
    f32 => Float as f32,
    f64 => Double as f64,
}

/// Non-ASCII characters become `?`; a `Char` holds exactly one byte.
impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(if value.is_ascii() { value as u8 } else { b'?' })
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::CString(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::CString(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::ByteBuffer(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Arg::ByteBuffer(value.as_slice())
    }
}

impl<T: ?Sized> From<*const T> for Arg<'_> {
    fn from(value: *const T) -> Self {
        Arg::pointer(value)
    }
}

impl<T: ?Sized> From<*mut T> for Arg<'_> {
    fn from(value: *mut T) -> Self {
        Arg::pointer(value as *const T)
    }
}

/// Stored form of an argument inside a slot cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ArgValue {
    #[default]
    Unset,
    Char(u8),
    UnsignedChar(u8),
    Int(i32),
    UnsignedInt(u32),
    Long(i64),
    UnsignedLong(u64),
    Float(f32),
    Double(f64),
    /// `len` bytes at the start of the cell's text storage
    CString { len: usize },
    ByteBuffer { len: usize },
    Pointer(usize),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Unset => ArgKind::Unset,
            ArgValue::Char(_) => ArgKind::Char,
            ArgValue::UnsignedChar(_) => ArgKind::UnsignedChar,
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::UnsignedInt(_) => ArgKind::UnsignedInt,
            ArgValue::Long(_) => ArgKind::Long,
            ArgValue::UnsignedLong(_) => ArgKind::UnsignedLong,
            ArgValue::Float(_) => ArgKind::Float,
            ArgValue::Double(_) => ArgKind::Double,
            ArgValue::CString { .. } => ArgKind::CString,
            ArgValue::ByteBuffer { .. } => ArgKind::ByteBuffer,
            ArgValue::Pointer(_) => ArgKind::Pointer,
        }
    }

    /// Declared payload length in bytes
    pub fn len(&self) -> usize {
        match self {
            ArgValue::CString { len } | ArgValue::ByteBuffer { len } => *len,
            other => other.kind().fixed_width().unwrap_or(0),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, ArgValue::Unset)
    }
}

/// How a cell renders, chosen by the placeholder it fills
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RenderStyle {
    pub upper_hex: bool,
    pub sanitize: bool,
}

/// One fixed-capacity argument cell of a slot
#[derive(Debug)]
pub struct ArgCell {
    value: ArgValue,
    text: Box<[u8]>,
}

impl ArgCell {
    pub fn with_capacity(text_capacity: usize) -> Self {
        Self {
            value: ArgValue::Unset,
            text: vec![0u8; text_capacity].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn value(&self) -> ArgValue {
        self.value
    }

    #[inline]
    pub fn kind(&self) -> ArgKind {
        self.value.kind()
    }

    /// Text payload of a string cell
    pub fn text(&self) -> &[u8] {
        match self.value {
            ArgValue::CString { len } | ArgValue::ByteBuffer { len } => {
                &self.text[..len.min(self.text.len())]
            }
            _ => &[],
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = ArgValue::Unset;
    }

    /// Copy `arg` into this cell; returns true if the text was truncated
    pub(crate) fn store(
        &mut self,
        index: usize,
        arg: Arg<'_>,
        overflow: ArgumentOverflow,
    ) -> Result<bool> {
        let capacity = self.text.len();
        let mut truncated = false;
        self.value = match arg {
            Arg::Char(c) => ArgValue::Char(c),
            Arg::UnsignedChar(c) => ArgValue::UnsignedChar(c),
            Arg::Int(v) => ArgValue::Int(v),
            Arg::UnsignedInt(v) => ArgValue::UnsignedInt(v),
            Arg::Long(v) => ArgValue::Long(v),
            Arg::UnsignedLong(v) => ArgValue::UnsignedLong(v),
            Arg::Float(v) => ArgValue::Float(v),
            Arg::Double(v) => ArgValue::Double(v),
            Arg::Pointer(p) => ArgValue::Pointer(p),
            Arg::CString(s) => {
                let bytes = until_nul(s.as_bytes());
                let len = if bytes.len() > capacity {
                    Self::check_overflow(index, bytes.len(), capacity, overflow)?;
                    truncated = true;
                    floor_char_boundary(s, capacity)
                } else {
                    bytes.len()
                };
                self.text[..len].copy_from_slice(&bytes[..len]);
                ArgValue::CString { len }
            }
            Arg::ByteBuffer(bytes) => {
                let len = if bytes.len() > capacity {
                    Self::check_overflow(index, bytes.len(), capacity, overflow)?;
                    truncated = true;
                    capacity
                } else {
                    bytes.len()
                };
                self.text[..len].copy_from_slice(&bytes[..len]);
                ArgValue::ByteBuffer { len }
            }
        };
        Ok(truncated)
    }

    fn check_overflow(
        index: usize,
        len: usize,
        max: usize,
        overflow: ArgumentOverflow,
    ) -> Result<()> {
        match overflow {
            ArgumentOverflow::Truncate => Ok(()),
            ArgumentOverflow::Reject => Err(LoggerError::ArgumentTooLarge { index, len, max }),
        }
    }

    /// Append the rendered value to `out`
    pub(crate) fn render_into(&self, out: &mut Vec<u8>, style: RenderStyle) -> Result<()> {
        let written = match self.value {
            ArgValue::Unset => return Err(LoggerError::render("argument cell is unset")),
            ArgValue::Char(c) => {
                out.push(c);
                Ok(())
            }
            ArgValue::UnsignedChar(c) if style.upper_hex => write!(out, "{:02X}", c),
            ArgValue::UnsignedChar(c) => write!(out, "{:02x}", c),
            ArgValue::Int(v) => write!(out, "{}", v),
            ArgValue::UnsignedInt(v) => write!(out, "{}", v),
            ArgValue::Long(v) => write!(out, "{}", v),
            ArgValue::UnsignedLong(v) => write!(out, "{}", v),
            ArgValue::Float(v) => write!(out, "{:.6}", v),
            ArgValue::Double(v) => write!(out, "{:.6}", v),
            ArgValue::Pointer(p) => write!(out, "{:#x}", p),
            ArgValue::CString { len } | ArgValue::ByteBuffer { len } => {
                if len > self.text.len() {
                    debug_assert!(false, "cell length {} exceeds storage", len);
                    return Err(LoggerError::render(format!(
                        "argument length {} exceeds its {} byte cell",
                        len,
                        self.text.len()
                    )));
                }
                write_text(out, until_nul(&self.text[..len]), style.sanitize);
                Ok(())
            }
        };
        written.map_err(|e| LoggerError::render(e.to_string()))
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = max.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

fn write_text(out: &mut Vec<u8>, text: &[u8], sanitize: bool) {
    if !sanitize {
        out.extend_from_slice(text);
        return;
    }
    for &b in text {
        match b {
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(b),
        }
    }
}
