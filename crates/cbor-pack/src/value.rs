//! [`CborValue`] — the closed value model the codec reads and writes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::constants::MAX_SAFE_INTEGER;
use crate::error::EncodingError;

/// The closed set of representable values.
///
/// Integers live in two arms: [`Integer`] holds anything whose unsigned
/// magnitude is at or below the safe-integer boundary (2^53 - 1), and
/// [`BigInt`] holds the rest of the wire range exactly, up to 2^64 - 1 and
/// down to -2^64, all of which `i128` represents without loss.
///
/// [`Integer`]: CborValue::Integer
/// [`BigInt`]: CborValue::BigInt
#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    /// Integer within the safe native range.
    Integer(i64),
    /// Integer beyond the safe native range.
    BigInt(i128),
    /// UTF-8 text.
    Str(String),
    /// Raw byte sequence.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Array(Vec<CborValue>),
    /// String-keyed mapping; insertion order is emission order on encode.
    Object(Vec<(String, CborValue)>),
    /// Boolean simple value.
    Bool(bool),
    /// Null simple value.
    Null,
    /// Undefined simple value.
    Undefined,
    /// End-of-stream marker terminating indefinite-length items. Never
    /// contained in a decoded array or map, and not encodable.
    Break,
}

impl From<u64> for CborValue {
    fn from(v: u64) -> Self {
        if v > MAX_SAFE_INTEGER {
            CborValue::BigInt(v as i128)
        } else {
            CborValue::Integer(v as i64)
        }
    }
}

impl From<i64> for CborValue {
    fn from(v: i64) -> Self {
        // The boundary applies to the wire magnitude: v itself when
        // non-negative, -1 - v when negative.
        let magnitude = if v >= 0 { v as u64 } else { (-1 - v) as u64 };
        if magnitude > MAX_SAFE_INTEGER {
            CborValue::BigInt(v as i128)
        } else {
            CborValue::Integer(v)
        }
    }
}

impl From<i128> for CborValue {
    fn from(v: i128) -> Self {
        let magnitude = if v >= 0 { v as u128 } else { (-1 - v) as u128 };
        if magnitude > MAX_SAFE_INTEGER as u128 {
            CborValue::BigInt(v)
        } else {
            CborValue::Integer(v as i64)
        }
    }
}

impl TryFrom<&serde_json::Value> for CborValue {
    type Error = EncodingError;

    fn try_from(v: &serde_json::Value) -> Result<Self, EncodingError> {
        Ok(match v {
            serde_json::Value::Null => CborValue::Null,
            serde_json::Value::Bool(b) => CborValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CborValue::from(i)
                } else if let Some(u) = n.as_u64() {
                    CborValue::from(u)
                } else {
                    return Err(EncodingError::UnsupportedNumber(
                        n.as_f64().unwrap_or(f64::NAN),
                    ));
                }
            }
            serde_json::Value::String(s) => CborValue::Str(s.clone()),
            serde_json::Value::Array(arr) => CborValue::Array(
                arr.iter()
                    .map(CborValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(obj) => CborValue::Object(
                obj.iter()
                    .map(|(k, v)| Ok((k.clone(), CborValue::try_from(v)?)))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl From<CborValue> for serde_json::Value {
    fn from(v: CborValue) -> Self {
        match v {
            CborValue::Null | CborValue::Undefined | CborValue::Break => serde_json::Value::Null,
            CborValue::Bool(b) => serde_json::Value::Bool(b),
            CborValue::Integer(i) => serde_json::json!(i),
            CborValue::BigInt(i) => {
                if let Ok(small) = i64::try_from(i) {
                    serde_json::json!(small)
                } else if let Ok(big) = u64::try_from(i) {
                    serde_json::json!(big)
                } else {
                    serde_json::Value::String(i.to_string())
                }
            }
            CborValue::Str(s) => serde_json::Value::String(s),
            CborValue::Bytes(b) => {
                let b64 = STANDARD.encode(&b);
                serde_json::Value::String(format!("data:application/octet-stream;base64,{b64}"))
            }
            CborValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            CborValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
