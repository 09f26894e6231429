//! End-to-end scenarios spanning more than one module — construction,
//! encoding, and streaming decode together. Per-module unit tests live
//! inline in their own files.

use crate::value::Value;
use crate::decoder::decode_one;
use crate::decoder::StreamDecoder;
use crate::types::Error;

#[test]
fn round_trip_every_scalar_kind() {
    let values = vec![
        Value::null(),
        Value::bool(false),
        Value::ubyte(0xFF),
        Value::ushort(0xFFFF),
        Value::uint(0),
        Value::uint(500),
        Value::uint(u32::MAX),
        Value::ulong(0),
        Value::ulong(u64::MAX),
        Value::byte(-1),
        Value::short(-12_345),
        Value::int(-1),
        Value::int(i32::MIN),
        Value::long(i64::MIN),
        Value::float(1.5),
        Value::double(-2.5),
        Value::char_value('A' as u32).unwrap(),
        Value::timestamp(1_700_000_000_000),
        Value::uuid(&[0u8; 16]).unwrap(),
        Value::binary(None),
        Value::binary(Some(b"payload")),
        Value::string(""),
        Value::string("hello, amqp"),
        Value::symbol(b"urn:example").unwrap(),
    ];

    for value in values {
        let bytes = value.encode_to_vec().unwrap();
        let (decoded, consumed) = decode_one(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, value);
    }
}

#[test]
fn round_trip_nested_described_composite_and_map() {
    let mut map = Value::map_empty();
    map.set_map_value(&Value::string("count"), &Value::uint(3)).unwrap();
    map.set_map_value(&Value::string("ok"), &Value::bool(true)).unwrap();

    let value = Value::composite(
        Value::ulong(0x0000_0000_0000_0010),
        vec![Value::string("open"), map, Value::list_empty()],
    );

    let bytes = value.encode_to_vec().unwrap();
    let (decoded, _) = decode_one(&bytes).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn streaming_decode_matches_one_shot_decode_regardless_of_chunking() {
    let value = Value::list(vec![
        Value::string("a longer string to force str32 or at least exercise multiple bytes"),
        Value::ulong(123_456_789_012),
        Value::described(Value::ulong(1), Value::bool(false)),
    ]);
    let bytes = value.encode_to_vec().unwrap();

    for chunk_size in [1, 2, 3, 7, bytes.len()] {
        let mut received = Vec::new();
        let mut decoder = StreamDecoder::new(|v| received.push(v));
        for chunk in bytes.chunks(chunk_size) {
            decoder.decode_bytes(chunk).unwrap();
        }
        assert_eq!(received, vec![value.clone()], "chunk_size={chunk_size}");
    }
}

#[test]
fn decoder_reports_pending_shortfall_then_recovers_on_more_input() {
    let value = Value::ulong(9_000_000_000);
    let bytes = value.encode_to_vec().unwrap();

    let mut received = Vec::new();
    let mut decoder = StreamDecoder::new(|v| received.push(v));
    decoder.decode_bytes(&bytes[..bytes.len() - 1]).unwrap();
    assert!(received.is_empty());
    decoder.decode_bytes(&bytes[bytes.len() - 1..]).unwrap();
    assert_eq!(received, vec![value]);
}

#[test]
fn decoder_poisons_permanently_on_malformed_input() {
    let mut decoder = StreamDecoder::new(|_: Value| {});
    assert!(decoder.decode_bytes(&[0x73, 0x00, 0x11, 0x00, 0x00]).is_err());
    match decoder.decode_bytes(&[0x40]) {
        Err(Error::Malformed) => {}
        other => panic!("expected decoder to stay poisoned, got {other:?}"),
    }
}
