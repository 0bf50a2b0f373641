//! CBOR (RFC 8949) value codec.
//!
//! Converts between [`CborValue`] and the CBOR byte encoding: minimal-width
//! headers, big-integer promotion at the safe-integer boundary,
//! indefinite-length decode, the self-described tag, and reviver/replacer
//! transform hooks applied during traversal.
//!
//! Decode and encode are synchronous, recursive-descent passes. All mutable
//! state (the input cursor, the output region) belongs to a single call; two
//! calls running on different threads share nothing.

pub mod constants;

mod decoder;
mod encoder;
mod error;
mod util;
mod value;

pub use decoder::{CborDecoder, Reviver};
pub use encoder::{CborEncoder, Replacer};
pub use error::{DecodingError, EncodingError};
pub use util::{
    decode, decode_with, decode_with_consumed, encode, encode_self_described,
    encode_self_described_with, encode_with,
};
pub use value::CborValue;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_roundtrip_matrix() {
        let cases = vec![
            json!(null),
            json!(true),
            json!(123),
            json!(-1),
            json!("hello"),
            json!([1, 2, 3]),
            json!({"a": 1, "b": [true, null, "x"]}),
        ];
        for case in cases {
            let value = CborValue::try_from(&case).expect("json to value");
            let bin = encode(&value).expect("encode");
            let back = decode(&bin).expect("decode");
            assert_eq!(serde_json::Value::from(back), case);
        }
    }

    #[test]
    fn json_fractional_number_is_rejected() {
        let err = CborValue::try_from(&json!(1.5)).unwrap_err();
        assert!(matches!(err, EncodingError::UnsupportedNumber(_)));
    }

    #[test]
    fn json_object_preserves_key_order() {
        let value = CborValue::try_from(&json!({"z": 1, "a": 2})).expect("json to value");
        match &value {
            CborValue::Object(entries) => {
                assert_eq!(entries[0].0, "z");
                assert_eq!(entries[1].0, "a");
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn json_bytes_render_as_data_uri() {
        let json = serde_json::Value::from(CborValue::Bytes(vec![1, 2, 3]));
        assert_eq!(json, json!("data:application/octet-stream;base64,AQID"));
    }

    #[test]
    fn json_big_integers() {
        let back = serde_json::Value::from(CborValue::BigInt(u64::MAX as i128));
        assert_eq!(back, json!(u64::MAX));
        let too_big = serde_json::Value::from(CborValue::BigInt(-(1i128 << 64)));
        assert_eq!(too_big, json!("-18446744073709551616"));
    }

    #[test]
    fn integer_normalization_splits_at_safe_boundary() {
        assert_eq!(
            CborValue::from((1u64 << 53) - 1),
            CborValue::Integer((1i64 << 53) - 1)
        );
        assert_eq!(CborValue::from(1u64 << 53), CborValue::BigInt(1i128 << 53));
        // The boundary applies to the wire magnitude, so -(2^53) is still
        // native (its magnitude is 2^53 - 1).
        assert_eq!(
            CborValue::from(-(1i64 << 53)),
            CborValue::Integer(-(1i64 << 53))
        );
        assert_eq!(
            CborValue::from(-(1i64 << 53) - 1),
            CborValue::BigInt(-(1i128 << 53) - 1)
        );
    }
}
