//! `CborEncoder` — minimal-width CBOR encoder.

use cbor_pack_buffers::Writer;

use crate::constants::*;
use crate::error::EncodingError;
use crate::value::CborValue;

/// Encode-side transform hook, applied top-down: each node is handed to the
/// replacer before it is classified, with its map key or stringified array
/// index (the root call has no key). The returned value is what gets
/// serialized, and its children are themselves replaced recursively.
pub type Replacer<'a> = dyn FnMut(Option<&str>, &CborValue) -> CborValue + 'a;

/// One encode call's worth of state: the output region plus the optional
/// replacer. Constructed fresh per call and dropped when the call returns,
/// so concurrent encodes never share anything.
pub struct CborEncoder<'r> {
    pub writer: Writer,
    replacer: Option<&'r mut Replacer<'r>>,
}

impl Default for CborEncoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> CborEncoder<'r> {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
            replacer: None,
        }
    }

    pub fn with_replacer(replacer: &'r mut Replacer<'r>) -> Self {
        Self {
            writer: Writer::new(),
            replacer: Some(replacer),
        }
    }

    /// Encodes one value and returns exactly the bytes written.
    pub fn encode(&mut self, value: &CborValue) -> Result<Vec<u8>, EncodingError> {
        self.writer.reset();
        self.write_any(None, value)?;
        Ok(self.writer.flush())
    }

    /// As [`encode`](Self::encode), prefixed with the self-described-CBOR
    /// tag (`D9 D9 F7`).
    pub fn encode_self_described(&mut self, value: &CborValue) -> Result<Vec<u8>, EncodingError> {
        self.writer.reset();
        self.write_header(MAJOR_TAG, SELF_DESCRIBED_TAG);
        self.write_any(None, value)?;
        Ok(self.writer.flush())
    }

    fn write_any(&mut self, key: Option<&str>, value: &CborValue) -> Result<(), EncodingError> {
        match self.replacer.as_mut() {
            Some(replacer) => {
                let replaced = replacer(key, value);
                self.write_value(&replaced)
            }
            None => self.write_value(value),
        }
    }

    fn write_value(&mut self, value: &CborValue) -> Result<(), EncodingError> {
        match value {
            CborValue::Integer(int) => {
                self.write_integer(*int);
                Ok(())
            }
            CborValue::BigInt(int) => self.write_big_int(*int),
            CborValue::Str(s) => {
                self.write_str(s);
                Ok(())
            }
            CborValue::Bytes(bytes) => {
                self.write_bytes(bytes);
                Ok(())
            }
            CborValue::Array(items) => {
                // Emission is always definite-length: the count is known.
                self.write_header(MAJOR_ARRAY, items.len() as u64);
                for (idx, item) in items.iter().enumerate() {
                    let key = idx.to_string();
                    self.write_any(Some(key.as_str()), item)?;
                }
                Ok(())
            }
            CborValue::Object(entries) => {
                self.write_header(MAJOR_MAP, entries.len() as u64);
                for (key, item) in entries {
                    self.write_str(key);
                    self.write_any(Some(key.as_str()), item)?;
                }
                Ok(())
            }
            CborValue::Bool(b) => {
                self.writer.u8(if *b { 0xf5 } else { 0xf4 });
                Ok(())
            }
            CborValue::Null => {
                self.writer.u8(0xf6);
                Ok(())
            }
            CborValue::Undefined => {
                self.writer.u8(0xf7);
                Ok(())
            }
            CborValue::Break => Err(EncodingError::BreakMarker),
        }
    }

    fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_header(MAJOR_UNSIGNED, int as u64);
        } else {
            self.write_header(MAJOR_NEGATIVE, (-1 - int) as u64);
        }
    }

    fn write_big_int(&mut self, int: i128) -> Result<(), EncodingError> {
        let (major, magnitude) = if int >= 0 {
            (MAJOR_UNSIGNED, int as u128)
        } else {
            (MAJOR_NEGATIVE, (-1 - int) as u128)
        };
        let magnitude =
            u64::try_from(magnitude).map_err(|_| EncodingError::ValueTooLarge(magnitude))?;
        self.write_header(major, magnitude);
        Ok(())
    }

    fn write_str(&mut self, s: &str) {
        self.write_header(MAJOR_TEXT, s.len() as u64);
        self.writer.buf(s.as_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_header(MAJOR_BYTES, bytes.len() as u64);
        self.writer.buf(bytes);
    }

    /// Emits the minimal-width header for `value` under `major`.
    fn write_header(&mut self, major: u8, value: u64) {
        let w = &mut self.writer;
        if value <= 23 {
            w.u8((major << 5) | value as u8);
        } else if value <= 0xff {
            w.u8((major << 5) | AI_ONE_BYTE);
            w.u8(value as u8);
        } else if value <= 0xffff {
            w.u8u16((major << 5) | AI_TWO_BYTES, value as u16);
        } else if value <= 0xffff_ffff {
            w.u8u32((major << 5) | AI_FOUR_BYTES, value as u32);
        } else {
            w.u8u64((major << 5) | AI_EIGHT_BYTES, value);
        }
    }
}
