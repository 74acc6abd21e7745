//! TLV wire codec
//!
//! Every Primus message is an ordered sequence of [`Field`]s: a 16-bit tag,
//! a 16-bit length (or the `0xFFFF` sentinel followed by a 32-bit length),
//! the data, and zero padding to a 4-byte boundary. All integers are
//! little-endian.
//!
//! Decoders come in two flavours:
//! - tag lookup ([`Payload::find`]) where field order does not matter
//! - strict order ([`FieldCursor`]) where each field must carry the tag the
//!   decoder expects next

pub mod binary;
mod cursor;
mod field;
mod framing;
mod payload;
mod tag;

pub use cursor::FieldCursor;
pub use field::{Field, EXTENDED_LENGTH_SENTINEL, MAX_SHORT_LENGTH};
pub use framing::{length_header, optionally_strip_length_header, strip_length_header};
pub use payload::Payload;
pub use tag::FieldTag;

use std::io;
use thiserror::Error;

/// Errors raised while encoding or walking TLV messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Truncated input: field at offset {offset} declares more than the {remaining} remaining bytes")]
    TruncatedInput { offset: usize, remaining: usize },

    #[error("Length header mismatch: header declares {declared} bytes, {actual} present")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Invalid field length at offset {offset}")]
    InvalidLength { offset: usize },

    #[error("Invalid payload type {found}, required {required}")]
    UnexpectedFieldTag { found: FieldTag, required: FieldTag },

    #[error("Payload has no more fields")]
    Exhausted,

    #[error("Payload has no more fields, required {required}")]
    MissingField { required: FieldTag },

    #[error("Field {tag} expected a 4-byte integer, got {len} bytes")]
    InvalidInteger { tag: FieldTag, len: usize },

    #[error("Field {tag} is not valid UTF-8")]
    InvalidUtf8 { tag: FieldTag },
}

impl CodecError {
    /// Map a reader failure for the field starting at `offset`
    pub(crate) fn from_io(err: io::Error, offset: usize, remaining: usize) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => CodecError::TruncatedInput { offset, remaining },
            _ => CodecError::InvalidLength { offset },
        }
    }

    /// Returns a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            CodecError::TruncatedInput { .. } => "PRIMUS_E_CODEC_TRUNCATED",
            CodecError::LengthMismatch { .. } => "PRIMUS_E_CODEC_LENGTH_MISMATCH",
            CodecError::InvalidLength { .. } => "PRIMUS_E_CODEC_LENGTH_INVALID",
            CodecError::UnexpectedFieldTag { .. } => "PRIMUS_E_CODEC_UNEXPECTED_TAG",
            CodecError::Exhausted | CodecError::MissingField { .. } => "PRIMUS_E_CODEC_EXHAUSTED",
            CodecError::InvalidInteger { .. } => "PRIMUS_E_CODEC_INTEGER_INVALID",
            CodecError::InvalidUtf8 { .. } => "PRIMUS_E_CODEC_UTF8_INVALID",
        }
    }
}
