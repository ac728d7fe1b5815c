use std::fmt;

use crate::Field;

pub type Result<T> = std::result::Result<T, CodecError>;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input ended before a field was complete.
    Truncation,
    /// The bytes (or a tag value being encoded) violate the expected grammar.
    Format,
    /// A hex-textual field handed to the writer has the wrong shape.
    Validation,
}

/// Errors produced while encoding or decoding an event.
///
/// A failed call leaves the writer buffer partially written and the reader
/// cursor wherever it stopped. Neither is meaningful afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes remain than the field needs
    UnexpectedEof {
        field: Field,
        needed: usize,
        available: usize,
    },

    /// A variable-width integer ran past 10 bytes or past 64 bits
    VarintOverflow(Field),

    /// A decoded count or length does not fit the platform's `usize`
    LengthOverflow { field: Field, value: u64 },

    /// Text bytes were not valid UTF-8
    InvalidUtf8(Field),

    /// The second element of an `e`/`p` tag is not 64 lowercase hex characters
    InvalidHexRef,

    /// The second element of an `a` tag is not `<kind>:<pubkey hex>:<identifier>`
    InvalidCoordinate(&'static str),

    /// Bytes were left over after the signature
    TrailingBytes(usize),

    /// A hex field has the wrong number of characters
    InvalidHexLength {
        field: Field,
        expected: usize,
        got: usize,
    },

    /// A hex field contains something other than lowercase hex digits
    InvalidHex(Field),
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnexpectedEof { .. } => ErrorKind::Truncation,
            CodecError::VarintOverflow(_)
            | CodecError::LengthOverflow { .. }
            | CodecError::InvalidUtf8(_)
            | CodecError::InvalidHexRef
            | CodecError::InvalidCoordinate(_)
            | CodecError::TrailingBytes(_) => ErrorKind::Format,
            CodecError::InvalidHexLength { .. } | CodecError::InvalidHex(_) => {
                ErrorKind::Validation
            }
        }
    }

    pub fn is_truncation(&self) -> bool {
        self.kind() == ErrorKind::Truncation
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnexpectedEof {
                field,
                needed,
                available,
            } => write!(
                f,
                "truncated buffer reading {}: need {} bytes, {} available",
                field, needed, available
            ),
            CodecError::VarintOverflow(field) => write!(f, "varint overflow in {}", field),
            CodecError::LengthOverflow { field, value } => {
                write!(f, "{} length {} does not fit in memory", field, value)
            }
            CodecError::InvalidUtf8(field) => write!(f, "invalid UTF-8 in {}", field),
            CodecError::InvalidHexRef => {
                write!(f, "reference tag value must be 64 lowercase hex characters")
            }
            CodecError::InvalidCoordinate(reason) => {
                write!(f, "invalid address coordinate: {}", reason)
            }
            CodecError::TrailingBytes(n) => write!(f, "{} trailing bytes after event", n),
            CodecError::InvalidHexLength {
                field,
                expected,
                got,
            } => write!(
                f,
                "{} hex must be {} characters, got {}",
                field, expected, got
            ),
            CodecError::InvalidHex(field) => write!(f, "{} is not lowercase hex", field),
        }
    }
}

impl std::error::Error for CodecError {}
