//! Error types raised by the codec.
//!
//! Both kinds are terminal: a failed call yields no partial value and no
//! partial bytes, and nothing is retried internally.

use thiserror::Error;

/// Malformed or truncated input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodingError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid additional information {0}")]
    InvalidAdditionalInfo(u8),

    #[error("Unrecognized simple value {0}")]
    UnrecognizedSimple(u8),

    #[error("Unsupported tag: {0}")]
    UnsupportedTag(u64),

    #[error("Map keys must be text strings")]
    NonTextMapKey,

    #[error("Invalid chunk in indefinite-length string")]
    InvalidChunk,

    #[error("Declared length out of range: {0}")]
    LengthOutOfRange(u64),
}

impl From<cbor_pack_buffers::BufferError> for DecodingError {
    fn from(_: cbor_pack_buffers::BufferError) -> Self {
        DecodingError::UnexpectedEof
    }
}

/// Input the wire format cannot represent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodingError {
    /// The magnitude does not fit the 64-bit unsigned header range, in
    /// either sign direction.
    #[error("Value too large to encode: {0}")]
    ValueTooLarge(u128),

    #[error("The break marker cannot be encoded")]
    BreakMarker,

    /// A JSON number with no exact integer representation.
    #[error("Number {0} is outside the value model")]
    UnsupportedNumber(f64),
}
