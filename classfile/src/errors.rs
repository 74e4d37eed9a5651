//! Error taxonomy for the class-file decoder.
//!
//! Two severities: [`FormatError`] is fatal and aborts the whole parse
//! (truncation, bad magic, an out-of-range index where none is permitted);
//! [`AttributeError`] is local to one attribute and never escapes
//! `read_attributes` — the caller only ever sees it via a `tracing::warn!`
//! and a `raw` byte payload left in place of the parsed variant.

use std::fmt::Display;

#[derive(Debug)]
pub enum FormatCause {
    /// Magic number did not equal `0xCAFEBABE`.
    IncorrectMagic(u32),
    /// Stream ended before a length-prefixed structure was fully read.
    Truncated { offset: u64, while_reading: &'static str },
    /// Bytes remained after the attributes table of the outer `ClassFile`.
    ExtraBytes,
    /// A constant-pool tag byte did not match any known tag.
    InvalidConstantTag(u8),
    /// `attribute_name_index` did not point at a `Utf8` constant.
    InvalidAttributeNameIndex(u16),
}

impl Display for FormatCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatCause::IncorrectMagic(got) => {
                write!(f, "invalid magic: {:#010X}", got)
            }
            FormatCause::Truncated { offset, while_reading } => {
                write!(f, "truncated at offset {offset} while reading {while_reading}")
            }
            FormatCause::ExtraBytes => write!(f, "class file has leftover bytes"),
            FormatCause::InvalidConstantTag(tag) => write!(f, "invalid constant pool tag: {tag}"),
            FormatCause::InvalidAttributeNameIndex(idx) => {
                write!(f, "attribute_name_index {idx} is not a Utf8 constant")
            }
        }
    }
}

#[derive(Debug)]
pub struct FormatError {
    pub cause: FormatCause,
    pub msg: String,
}

impl FormatError {
    pub fn new(cause: FormatCause, msg: impl Into<String>) -> FormatError {
        FormatError { cause, msg: msg.into() }
    }
}

impl std::error::Error for FormatError {}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class format error: {}, {}", self.cause, self.msg)
    }
}

impl From<std::io::Error> for FormatError {
    fn from(e: std::io::Error) -> Self {
        FormatError::new(
            FormatCause::Truncated { offset: 0, while_reading: "a fixed-width field" },
            e.to_string(),
        )
    }
}

/// A single attribute's payload was internally inconsistent. Local: the
/// caller drops the parsed variant, keeps the raw bytes, and continues.
#[derive(Debug)]
pub struct AttributeError {
    pub attribute_name: String,
    pub msg: String,
}

impl AttributeError {
    pub fn new(attribute_name: impl Into<String>, msg: impl Into<String>) -> AttributeError {
        AttributeError { attribute_name: attribute_name.into(), msg: msg.into() }
    }
}

impl std::error::Error for AttributeError {}

impl Display for AttributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed {} attribute: {}", self.attribute_name, self.msg)
    }
}

impl From<std::io::Error> for AttributeError {
    fn from(e: std::io::Error) -> Self {
        AttributeError::new("<unknown>", e.to_string())
    }
}
