//! `CborDecoder` — recursive-descent CBOR decoder.

use cbor_pack_buffers::Reader;

use crate::constants::*;
use crate::error::DecodingError;
use crate::value::CborValue;

/// Decode-side transform hook, applied bottom-up: container children are
/// fully decoded first, then handed to the reviver with their map key or
/// stringified array index; the whole tree gets one final call with no key.
pub type Reviver<'a> = dyn FnMut(Option<&str>, CborValue) -> CborValue + 'a;

/// One decode call's worth of state: the input cursor plus the optional
/// reviver. Constructed fresh per call and dropped when the call returns,
/// so concurrent decodes never share anything.
pub struct CborDecoder<'b, 'r> {
    reader: Reader<'b>,
    reviver: Option<&'r mut Reviver<'r>>,
}

impl<'b, 'r> CborDecoder<'b, 'r> {
    pub fn new(input: &'b [u8]) -> Self {
        Self {
            reader: Reader::new(input),
            reviver: None,
        }
    }

    pub fn with_reviver(input: &'b [u8], reviver: &'r mut Reviver<'r>) -> Self {
        Self {
            reader: Reader::new(input),
            reviver: Some(reviver),
        }
    }

    /// Decodes one item and applies the final top-level reviver call.
    pub fn decode(&mut self) -> Result<CborValue, DecodingError> {
        let value = self.read_any()?;
        Ok(self.revive(None, value))
    }

    /// Number of input bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.reader.x
    }

    fn revive(&mut self, key: Option<&str>, value: CborValue) -> CborValue {
        match self.reviver.as_mut() {
            Some(reviver) => reviver(key, value),
            None => value,
        }
    }

    /// Reads one header byte and splits it into (major type, additional info).
    fn read_header(&mut self) -> Result<(u8, u8), DecodingError> {
        let byte = self.reader.try_u8()?;
        Ok((byte >> 5, byte & 0x1f))
    }

    /// Reads the unsigned value selected by the additional info bits.
    fn read_uint(&mut self, info: u8) -> Result<u64, DecodingError> {
        match info {
            0..=23 => Ok(info as u64),
            AI_ONE_BYTE => Ok(self.reader.try_u8()? as u64),
            AI_TWO_BYTES => Ok(self.reader.try_u16()? as u64),
            AI_FOUR_BYTES => Ok(self.reader.try_u32()? as u64),
            AI_EIGHT_BYTES => Ok(self.reader.try_u64()?),
            _ => Err(DecodingError::InvalidAdditionalInfo(info)),
        }
    }

    /// Like [`read_uint`](Self::read_uint), but info 31 yields `None`.
    fn read_len(&mut self, info: u8) -> Result<Option<u64>, DecodingError> {
        if info == AI_INDEFINITE {
            Ok(None)
        } else {
            self.read_uint(info).map(Some)
        }
    }

    /// Borrows a length-prefixed byte run out of the input.
    fn read_run(&mut self, len: u64) -> Result<&'b [u8], DecodingError> {
        let len = usize::try_from(len).map_err(|_| DecodingError::LengthOutOfRange(len))?;
        Ok(self.reader.try_buf(len)?)
    }

    /// Concatenates definite chunks of `major` until the break marker.
    fn read_chunks(&mut self, major: u8) -> Result<Vec<u8>, DecodingError> {
        let mut bytes = Vec::new();
        loop {
            if self.reader.try_peek()? == BREAK_BYTE {
                self.reader.skip(1)?;
                return Ok(bytes);
            }
            let (chunk_major, info) = self.read_header()?;
            if chunk_major != major || info == AI_INDEFINITE {
                return Err(DecodingError::InvalidChunk);
            }
            let len = self.read_uint(info)?;
            bytes.extend_from_slice(self.read_run(len)?);
        }
    }

    fn read_array(&mut self, len: Option<u64>) -> Result<CborValue, DecodingError> {
        let mut items = Vec::new();
        match len {
            Some(len) => {
                for idx in 0..len {
                    let item = self.read_any()?;
                    let key = idx.to_string();
                    items.push(self.revive(Some(key.as_str()), item));
                }
            }
            None => {
                // The loop ends when the transform pipeline hands back the
                // end-of-stream marker for the next item.
                let mut idx = 0u64;
                loop {
                    let item = self.read_any()?;
                    let key = idx.to_string();
                    let item = self.revive(Some(key.as_str()), item);
                    if item == CborValue::Break {
                        break;
                    }
                    items.push(item);
                    idx += 1;
                }
            }
        }
        Ok(CborValue::Array(items))
    }

    fn read_map(&mut self, len: Option<u64>) -> Result<CborValue, DecodingError> {
        let mut entries = Vec::new();
        match len {
            Some(len) => {
                for _ in 0..len {
                    entries.push(self.read_entry()?);
                }
            }
            None => loop {
                // Unlike arrays, the pair loop checks the next header for
                // the break condition before reading a key.
                if self.reader.try_peek()? == BREAK_BYTE {
                    self.reader.skip(1)?;
                    break;
                }
                entries.push(self.read_entry()?);
            },
        }
        Ok(CborValue::Object(entries))
    }

    fn read_entry(&mut self) -> Result<(String, CborValue), DecodingError> {
        let key = match self.read_any()? {
            CborValue::Str(key) => key,
            _ => return Err(DecodingError::NonTextMapKey),
        };
        let value = self.read_any()?;
        let value = self.revive(Some(key.as_str()), value);
        Ok((key, value))
    }

    fn read_any(&mut self) -> Result<CborValue, DecodingError> {
        let (major, info) = self.read_header()?;
        match major {
            MAJOR_UNSIGNED => {
                let m = self.read_uint(info)?;
                Ok(CborValue::from(m))
            }
            MAJOR_NEGATIVE => {
                let m = self.read_uint(info)?;
                Ok(negative_from_magnitude(m))
            }
            MAJOR_BYTES => match self.read_len(info)? {
                Some(len) => Ok(CborValue::Bytes(self.read_run(len)?.to_vec())),
                None => Ok(CborValue::Bytes(self.read_chunks(MAJOR_BYTES)?)),
            },
            MAJOR_TEXT => match self.read_len(info)? {
                // Lossy on purpose: malformed UTF-8 degrades to replacement
                // characters instead of failing the decode.
                Some(len) => {
                    let run = self.read_run(len)?;
                    Ok(CborValue::Str(String::from_utf8_lossy(run).into_owned()))
                }
                None => {
                    let bytes = self.read_chunks(MAJOR_TEXT)?;
                    Ok(CborValue::Str(String::from_utf8_lossy(&bytes).into_owned()))
                }
            },
            MAJOR_ARRAY => {
                let len = self.read_len(info)?;
                self.read_array(len)
            }
            MAJOR_MAP => {
                let len = self.read_len(info)?;
                self.read_map(len)
            }
            MAJOR_TAG => {
                let tag = self.read_uint(info)?;
                if tag == SELF_DESCRIBED_TAG {
                    // Transparent wrapper around exactly one nested item.
                    self.read_any()
                } else {
                    Err(DecodingError::UnsupportedTag(tag))
                }
            }
            MAJOR_SIMPLE => match info {
                SIMPLE_FALSE => Ok(CborValue::Bool(false)),
                SIMPLE_TRUE => Ok(CborValue::Bool(true)),
                SIMPLE_NULL => Ok(CborValue::Null),
                SIMPLE_UNDEFINED => Ok(CborValue::Undefined),
                AI_INDEFINITE => Ok(CborValue::Break),
                _ => Err(DecodingError::UnrecognizedSimple(info)),
            },
            _ => unreachable!("major type is three bits"),
        }
    }
}

/// CBOR's negative mapping: major type 1 with magnitude `m` means `-1 - m`,
/// exact through `m = 2^64 - 1`, which yields `-2^64`.
fn negative_from_magnitude(m: u64) -> CborValue {
    if m > MAX_SAFE_INTEGER {
        CborValue::BigInt(-1 - m as i128)
    } else {
        CborValue::Integer(-1 - m as i64)
    }
}
