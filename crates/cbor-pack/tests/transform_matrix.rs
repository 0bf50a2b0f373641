use cbor_pack::{
    decode, decode_with, encode, encode_self_described, encode_self_described_with, encode_with,
    CborValue,
};

fn obj(fields: &[(&str, CborValue)]) -> CborValue {
    CborValue::Object(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect(),
    )
}

#[test]
fn reviver_rewrites_values_bottom_up() {
    // {"a": 1, "b": 2} with a doubling reviver.
    let encoded = vec![0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x02];
    let decoded = decode_with(&encoded, &mut |_key, value| match value {
        CborValue::Integer(n) => CborValue::Integer(n * 2),
        other => other,
    })
    .expect("decode");
    assert_eq!(
        decoded,
        obj(&[
            ("a", CborValue::Integer(2)),
            ("b", CborValue::Integer(4)),
        ])
    );
}

#[test]
fn replacer_rewrites_values_top_down() {
    let value = obj(&[
        ("a", CborValue::Integer(1)),
        ("b", CborValue::Integer(2)),
    ]);
    let encoded = encode_with(&value, &mut |_key, value| match value {
        CborValue::Integer(n) => CborValue::Integer(n * 2),
        other => other.clone(),
    })
    .expect("encode");
    assert_eq!(
        decode(&encoded).expect("decode"),
        obj(&[
            ("a", CborValue::Integer(2)),
            ("b", CborValue::Integer(4)),
        ])
    );
}

#[test]
fn reviver_sees_stringified_indices_then_the_root() {
    let mut seen: Vec<Option<String>> = Vec::new();
    // [10, 20]
    let decoded = decode_with(&[0x82, 0x0a, 0x14], &mut |key, value| {
        seen.push(key.map(str::to_owned));
        value
    })
    .expect("decode");
    assert_eq!(
        decoded,
        CborValue::Array(vec![CborValue::Integer(10), CborValue::Integer(20)])
    );
    assert_eq!(seen, vec![Some("0".into()), Some("1".into()), None]);
}

#[test]
fn reviver_runs_children_before_parents() {
    let mut seen: Vec<Option<String>> = Vec::new();
    // {"outer": [1]}
    let encoded = vec![0xa1, 0x65, 0x6f, 0x75, 0x74, 0x65, 0x72, 0x81, 0x01];
    decode_with(&encoded, &mut |key, value| {
        seen.push(key.map(str::to_owned));
        value
    })
    .expect("decode");
    assert_eq!(
        seen,
        vec![Some("0".into()), Some("outer".into()), None]
    );
}

#[test]
fn replacer_runs_parents_before_children() {
    let mut seen: Vec<Option<String>> = Vec::new();
    let value = obj(&[("a", CborValue::Array(vec![CborValue::Integer(1)]))]);
    encode_with(&value, &mut |key, value| {
        seen.push(key.map(str::to_owned));
        value.clone()
    })
    .expect("encode");
    assert_eq!(seen, vec![None, Some("a".into()), Some("0".into())]);
}

#[test]
fn replaced_containers_are_replaced_recursively() {
    let encoded = encode_with(&CborValue::Str("expand".into()), &mut |_key, value| {
        match value {
            CborValue::Str(s) if s == "expand" => {
                CborValue::Array(vec![CborValue::Integer(21)])
            }
            CborValue::Integer(n) => CborValue::Integer(n * 2),
            other => other.clone(),
        }
    })
    .expect("encode");
    assert_eq!(
        decode(&encoded).expect("decode"),
        CborValue::Array(vec![CborValue::Integer(42)])
    );
}

#[test]
fn reviver_applies_inside_indefinite_arrays() {
    let decoded = decode_with(&[0x9f, 0x01, 0x02, 0xff], &mut |_key, value| match value {
        CborValue::Integer(n) => CborValue::Integer(n * 2),
        other => other,
    })
    .expect("decode");
    assert_eq!(
        decoded,
        CborValue::Array(vec![CborValue::Integer(2), CborValue::Integer(4)])
    );
}

#[test]
fn self_described_tag_is_transparent() {
    let values = vec![
        CborValue::Null,
        CborValue::Integer(42),
        CborValue::Str("hello".into()),
        CborValue::Array(vec![CborValue::Integer(1), CborValue::Integer(2)]),
        obj(&[("k", CborValue::Bytes(vec![1, 2]))]),
    ];
    for value in values {
        let tagged = encode_self_described(&value).expect("encode");
        assert_eq!(&tagged[..3], &[0xd9, 0xd9, 0xf7]);
        let plain = encode(&value).expect("encode");
        assert_eq!(&tagged[3..], &plain[..]);
        assert_eq!(decode(&tagged).expect("decode tagged"), value);
        assert_eq!(decode(&plain).expect("decode plain"), value);
    }
}

#[test]
fn self_described_encode_applies_the_replacer() {
    let tagged = encode_self_described_with(&CborValue::Integer(1), &mut |_key, value| {
        match value {
            CborValue::Integer(n) => CborValue::Integer(n + 1),
            other => other.clone(),
        }
    })
    .expect("encode");
    assert_eq!(tagged, vec![0xd9, 0xd9, 0xf7, 0x02]);
}

#[test]
fn concurrent_calls_share_no_state() {
    let value = obj(&[
        ("text", CborValue::Str("payload".into())),
        (
            "items",
            CborValue::Array(vec![
                CborValue::Integer(1),
                CborValue::BigInt(-(1i128 << 60)),
                CborValue::Bytes(vec![9, 9, 9]),
            ]),
        ),
    ]);
    let expected = encode(&value).expect("encode");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let value = value.clone();
            let expected = expected.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let encoded = encode(&value).expect("encode");
                    assert_eq!(encoded, expected);
                    assert_eq!(decode(&encoded).expect("decode"), value);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }
}
