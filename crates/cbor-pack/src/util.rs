//! Convenience encode/decode entry points.
//!
//! Each call constructs its own encoder or decoder, so the cursor and the
//! output region live and die with that call; concurrent calls are fully
//! independent.

use crate::decoder::{CborDecoder, Reviver};
use crate::encoder::{CborEncoder, Replacer};
use crate::error::{DecodingError, EncodingError};
use crate::value::CborValue;

/// Decodes one CBOR item. Trailing bytes are tolerated; use
/// [`decode_with_consumed`] when exact sizing matters.
pub fn decode(bytes: &[u8]) -> Result<CborValue, DecodingError> {
    CborDecoder::new(bytes).decode()
}

/// Decodes one CBOR item, applying `reviver` bottom-up at every node.
pub fn decode_with<'r>(
    bytes: &[u8],
    reviver: &'r mut Reviver<'r>,
) -> Result<CborValue, DecodingError> {
    CborDecoder::with_reviver(bytes, reviver).decode()
}

/// Decodes one item and reports how many input bytes it consumed.
pub fn decode_with_consumed(bytes: &[u8]) -> Result<(CborValue, usize), DecodingError> {
    let mut decoder = CborDecoder::new(bytes);
    let value = decoder.decode()?;
    Ok((value, decoder.consumed()))
}

/// Encodes one value into minimal-width CBOR bytes.
pub fn encode(value: &CborValue) -> Result<Vec<u8>, EncodingError> {
    CborEncoder::new().encode(value)
}

/// Encodes one value, applying `replacer` top-down at every node.
pub fn encode_with<'r>(
    value: &CborValue,
    replacer: &'r mut Replacer<'r>,
) -> Result<Vec<u8>, EncodingError> {
    CborEncoder::with_replacer(replacer).encode(value)
}

/// As [`encode`], prefixed with the self-described-CBOR tag.
pub fn encode_self_described(value: &CborValue) -> Result<Vec<u8>, EncodingError> {
    CborEncoder::new().encode_self_described(value)
}

/// As [`encode_with`], prefixed with the self-described-CBOR tag.
pub fn encode_self_described_with<'r>(
    value: &CborValue,
    replacer: &'r mut Replacer<'r>,
) -> Result<Vec<u8>, EncodingError> {
    CborEncoder::with_replacer(replacer).encode_self_described(value)
}
