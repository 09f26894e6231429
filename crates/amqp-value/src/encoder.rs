//! Encodes a [`Value`] to AMQP 1.0 wire bytes.
//!
//! `amqpvalue.c` computes a compound's size by walking its children once to
//! sum their encoded sizes, then walking them again to actually emit bytes —
//! unavoidable since the list/map size prefix precedes the payload it
//! describes. `encoded_size` and `encode` below are that same two-pass
//! shape: `encoded_size` runs the encoder against a sink that only counts,
//! `encode` runs it again against the real one, and both share the one
//! `encode_into` implementation so they can never disagree.

use crate::types::Error;
use crate::types::Result;
use crate::value::Value;

/// Destination for encoded bytes. Mirrors the source's
/// `(context, bytes, length) -> int` output callback; a `None` callback
/// there (count only, emit nothing) is [`CountingSink`] here.
pub trait EncodeOutput {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

/// A sink that only counts bytes, never storing them. Used internally to
/// size a compound before its header is written.
#[derive(Default)]
pub struct CountingSink(pub usize);

impl EncodeOutput for CountingSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.0 += bytes.len();
        Ok(())
    }
}

/// A sink that appends to an owned `Vec<u8>`.
#[derive(Default)]
pub struct VecSink(pub Vec<u8>);

impl EncodeOutput for VecSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

/// Blanket impl so callers can hand in any `FnMut(&[u8]) -> Result<()>`
/// closure directly, matching the sink-callback shape spec.md describes.
impl<F: FnMut(&[u8]) -> Result<()>> EncodeOutput for F {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self(bytes)
    }
}

const TAG_NULL: u8 = 0x40;
const TAG_BOOL_TRUE: u8 = 0x41;
const TAG_BOOL_FALSE: u8 = 0x42;
const TAG_UINT0: u8 = 0x43;
const TAG_ULONG0: u8 = 0x44;
const TAG_UBYTE: u8 = 0x50;
const TAG_BYTE: u8 = 0x51;
const TAG_SMALLUINT: u8 = 0x52;
const TAG_SMALLULONG: u8 = 0x53;
const TAG_SMALLINT: u8 = 0x54;
const TAG_SMALLLONG: u8 = 0x55;
const TAG_USHORT: u8 = 0x60;
const TAG_SHORT: u8 = 0x61;
const TAG_UINT: u8 = 0x70;
const TAG_INT: u8 = 0x71;
const TAG_FLOAT: u8 = 0x72;
const TAG_CHAR: u8 = 0x73;
const TAG_ULONG: u8 = 0x80;
const TAG_LONG: u8 = 0x81;
const TAG_DOUBLE: u8 = 0x82;
const TAG_TIMESTAMP: u8 = 0x83;
const TAG_UUID: u8 = 0x98;
const TAG_VBIN8: u8 = 0xA0;
const TAG_STR8: u8 = 0xA1;
const TAG_SYM8: u8 = 0xA3;
const TAG_VBIN32: u8 = 0xB0;
const TAG_STR32: u8 = 0xB1;
const TAG_SYM32: u8 = 0xB3;
const TAG_LIST32: u8 = 0xD0;
const TAG_MAP32: u8 = 0xD1;
const TAG_DESCRIPTOR: u8 = 0x00;

impl Value {
    /// The number of bytes `encode` would write for this value.
    pub fn encoded_size(&self) -> Result<usize> {
        let mut sink = CountingSink::default();
        encode_into(self, &mut sink)?;
        Ok(sink.0)
    }

    /// Write this value's wire encoding to `sink`.
    pub fn encode<S: EncodeOutput>(&self, sink: &mut S) -> Result<()> {
        encode_into(self, sink)
    }

    /// Convenience: encode into a freshly allocated `Vec<u8>`.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let mut sink = VecSink::default();
        self.encode(&mut sink)?;
        Ok(sink.0)
    }
}

fn write_variable_binary<S: EncodeOutput>(
    sink: &mut S,
    small_tag: u8,
    large_tag: u8,
    bytes: &[u8],
) -> Result<()> {
    if let Ok(len) = u8::try_from(bytes.len()) {
        sink.write(&[small_tag, len])?;
    } else {
        let len = u32::try_from(bytes.len()).map_err(|_| Error::InvalidArgument)?;
        sink.write(&[large_tag])?;
        sink.write(&len.to_be_bytes())?;
    }
    sink.write(bytes)
}

fn write_compound_header<S: EncodeOutput>(sink: &mut S, tag: u8, size: usize, count: usize) -> Result<()> {
    let size = u32::try_from(size).map_err(|_| Error::InvalidArgument)?;
    let count = u32::try_from(count).map_err(|_| Error::InvalidArgument)?;
    sink.write(&[tag])?;
    sink.write(&size.to_be_bytes())?;
    sink.write(&count.to_be_bytes())
}

/// Total size of a list32/map32 body: the 4-byte count field plus every
/// element's encoded size. This is our own resolution of the size-field
/// ambiguity spec.md flags (the count field is included), applied
/// consistently by both `encoded_size` and `encode` so the prefix this
/// function computes always matches what gets written.
fn compound_body_size<'a>(items: impl Iterator<Item = &'a Value>) -> Result<usize> {
    let mut total = 4usize;
    for item in items {
        total += item.encoded_size()?;
    }
    Ok(total)
}

fn encode_into<S: EncodeOutput>(value: &Value, sink: &mut S) -> Result<()> {
    match value {
        Value::Null => sink.write(&[TAG_NULL]),
        Value::Bool(true) => sink.write(&[TAG_BOOL_TRUE]),
        Value::Bool(false) => sink.write(&[TAG_BOOL_FALSE]),
        Value::UByte(v) => sink.write(&[TAG_UBYTE, *v]),
        Value::Byte(v) => sink.write(&[TAG_BYTE, *v as u8]),
        Value::UShort(v) => {
            sink.write(&[TAG_USHORT])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Short(v) => {
            sink.write(&[TAG_SHORT])?;
            sink.write(&v.to_be_bytes())
        }
        Value::UInt(0) => sink.write(&[TAG_UINT0]),
        Value::UInt(v) if *v <= u8::MAX as u32 => sink.write(&[TAG_SMALLUINT, *v as u8]),
        Value::UInt(v) => {
            sink.write(&[TAG_UINT])?;
            sink.write(&v.to_be_bytes())
        }
        Value::ULong(0) => sink.write(&[TAG_ULONG0]),
        Value::ULong(v) if *v <= u8::MAX as u64 => sink.write(&[TAG_SMALLULONG, *v as u8]),
        Value::ULong(v) => {
            sink.write(&[TAG_ULONG])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Int(v) if (-128..=127).contains(v) => sink.write(&[TAG_SMALLINT, *v as i8 as u8]),
        Value::Int(v) => {
            sink.write(&[TAG_INT])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Long(v) if (-128..=127).contains(v) => sink.write(&[TAG_SMALLLONG, *v as i8 as u8]),
        Value::Long(v) => {
            sink.write(&[TAG_LONG])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Float(v) => {
            sink.write(&[TAG_FLOAT])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Double(v) => {
            sink.write(&[TAG_DOUBLE])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Char(c) => {
            sink.write(&[TAG_CHAR])?;
            sink.write(&(*c as u32).to_be_bytes())
        }
        Value::Timestamp(v) => {
            sink.write(&[TAG_TIMESTAMP])?;
            sink.write(&v.to_be_bytes())
        }
        Value::Uuid(bytes) => {
            sink.write(&[TAG_UUID])?;
            sink.write(bytes)
        }
        Value::Binary(bytes) => write_variable_binary(sink, TAG_VBIN8, TAG_VBIN32, bytes),
        Value::String(s) => write_variable_binary(sink, TAG_STR8, TAG_STR32, s.as_bytes()),
        Value::Symbol(bytes) => write_variable_binary(sink, TAG_SYM8, TAG_SYM32, bytes),
        Value::List(items) => {
            let size = compound_body_size(items.iter())?;
            write_compound_header(sink, TAG_LIST32, size, items.len())?;
            for item in items {
                encode_into(item, sink)?;
            }
            Ok(())
        }
        Value::Map(pairs) => {
            let size = compound_body_size(pairs.iter().flat_map(|(k, v)| [k, v]))?;
            write_compound_header(sink, TAG_MAP32, size, pairs.len())?;
            for (k, v) in pairs {
                encode_into(k, sink)?;
                encode_into(v, sink)?;
            }
            Ok(())
        }
        Value::Described(descriptor, inner) => {
            sink.write(&[TAG_DESCRIPTOR])?;
            encode_into(descriptor, sink)?;
            encode_into(inner, sink)
        }
        Value::Composite(descriptor, fields) => {
            sink.write(&[TAG_DESCRIPTOR])?;
            encode_into(descriptor, sink)?;
            let size = compound_body_size(fields.iter())?;
            write_compound_header(sink, TAG_LIST32, size, fields.len())?;
            for field in fields {
                encode_into(field, sink)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_encodes_to_single_byte() {
        assert_eq!(Value::null().encode_to_vec().unwrap(), vec![0x40]);
    }

    #[test]
    fn uint_uses_shortest_form() {
        assert_eq!(Value::uint(0).encode_to_vec().unwrap(), vec![0x43]);
        assert_eq!(Value::uint(200).encode_to_vec().unwrap(), vec![0x52, 200]);
        assert_eq!(
            Value::uint(70_000).encode_to_vec().unwrap(),
            vec![0x70, 0x00, 0x01, 0x11, 0x70]
        );
    }

    #[test]
    fn int_uses_smallint_in_range() {
        assert_eq!(Value::int(-1).encode_to_vec().unwrap(), vec![0x54, 0xFF]);
        assert_eq!(
            Value::int(1000).encode_to_vec().unwrap(),
            vec![0x71, 0x00, 0x00, 0x03, 0xE8]
        );
    }

    #[test]
    fn binary_picks_vbin8_or_vbin32() {
        assert_eq!(
            Value::binary(Some(&[1, 2, 3])).encode_to_vec().unwrap(),
            vec![0xA0, 3, 1, 2, 3]
        );
    }

    #[test]
    fn list_size_prefix_includes_count_field() {
        let list = Value::list(vec![Value::ubyte(1), Value::ubyte(2)]);
        let bytes = list.encode_to_vec().unwrap();
        // tag, 4-byte size, 4-byte count, then 2 items of 2 bytes each
        assert_eq!(bytes[0], 0xD0);
        let size = u32::from_be_bytes(bytes[1..5].try_into().unwrap());
        assert_eq!(size as usize, 4 + 2 + 2);
        let count = u32::from_be_bytes(bytes[5..9].try_into().unwrap());
        assert_eq!(count, 2);
    }

    #[test]
    fn composite_and_described_list_produce_identical_bytes() {
        let described = Value::described(
            Value::ulong(0x10),
            Value::list(vec![Value::ubyte(1)]),
        );
        let composite = Value::composite(Value::ulong(0x10), vec![Value::ubyte(1)]);
        assert_eq!(described.encode_to_vec().unwrap(), composite.encode_to_vec().unwrap());
    }

    #[test]
    fn encoded_size_matches_actual_encoding_length() {
        let value = Value::list(vec![Value::string("hello"), Value::ulong(9_000_000_000)]);
        let size = value.encoded_size().unwrap();
        let bytes = value.encode_to_vec().unwrap();
        assert_eq!(size, bytes.len());
    }
}
