//! The polymorphic `Value` tree: every AMQP 1.0 primitive plus the
//! compound types, as one recursive Rust enum.
//!
//! The C source this is grounded on (`amqpvalue.c`) represents this as an
//! opaque `AMQP_VALUE` handle over a tagged union, with explicit
//! `amqpvalue_create_*`/`amqpvalue_destroy`/`amqpvalue_clone` functions and
//! hand-written recursive equality. Per the redesign note in spec.md §9,
//! that collapses here into ordinary Rust ownership: `Value` owns its
//! children through `Vec`/`Box`, `Clone` is the deep-copy operation,
//! `Drop` is the destroy operation, and a manual `PartialEq` impl is the
//! structural-equality operation (manual rather than derived only because
//! `Described`/`Composite` must compare equal when they denote the same
//! value — see the note on that impl below).

use crate::macros::for_each_plain_scalar;
use crate::macros::scalar_accessor;
use crate::macros::scalar_constructor;
use crate::types::Error;
use crate::types::Result;

/// A single AMQP 1.0 value: a scalar, a variable-length datum, or a
/// compound built from other `Value`s.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    UByte(u8),
    UShort(u16),
    UInt(u32),
    ULong(u64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Timestamp(i64),
    Uuid([u8; 16]),
    Binary(Vec<u8>),
    String(String),
    Symbol(Vec<u8>),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Described(Box<Value>, Box<Value>),
    /// A described value whose inner value is always a list of fields.
    /// Distinct constructor from `Described` for ergonomics only: on the
    /// wire, and under `==`, a `Composite(d, fields)` is indistinguishable
    /// from `Described(d, List(fields))` (see the `PartialEq` impl).
    Composite(Box<Value>, Vec<Value>),
}

impl Value {
    pub fn null() -> Value {
        Value::Null
    }

    for_each_plain_scalar!(scalar_constructor, ());

    /// Create a `char` value. Fails if `codepoint` is not a valid Unicode
    /// scalar value. `char::from_u32` rejects everything spec.md invariant
    /// 4 rejects (`> 0x10FFFF`) and additionally rejects the surrogate range
    /// `0xD800..=0xDFFF`, which is not a legal Rust `char` either way.
    pub fn char_value(codepoint: u32) -> Result<Value> {
        char::from_u32(codepoint)
            .map(Value::Char)
            .ok_or(Error::InvalidArgument)
    }

    pub fn uuid(bytes: &[u8]) -> Result<Value> {
        let array: [u8; 16] = bytes.try_into().map_err(|_| Error::InvalidArgument)?;
        Ok(Value::Uuid(array))
    }

    /// Create a `binary` value. `None` is an empty binary (the "null
    /// buffer, zero length" case spec.md explicitly allows); there is no
    /// way to express "null buffer, positive length" through this API since
    /// a populated buffer is always given as a slice with a matching
    /// length — the invalid state spec.md's boundary test rejects at
    /// runtime is unrepresentable here instead.
    pub fn binary(bytes: Option<&[u8]>) -> Value {
        Value::Binary(bytes.map(<[u8]>::to_vec).unwrap_or_default())
    }

    pub fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    /// Create a `symbol` value. AMQP 1.0 symbols are restricted to ASCII.
    pub fn symbol(bytes: &[u8]) -> Result<Value> {
        if bytes.iter().any(|b| !b.is_ascii()) {
            return Err(Error::InvalidArgument);
        }
        Ok(Value::Symbol(bytes.to_vec()))
    }

    pub fn list_empty() -> Value {
        Value::List(Vec::new())
    }

    /// Convenience constructor for a fully-populated list; equivalent to
    /// `list_empty()` followed by `set_list_item` for each item.
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    pub fn map_empty() -> Value {
        Value::Map(Vec::new())
    }

    pub fn described(descriptor: Value, value: Value) -> Value {
        Value::Described(Box::new(descriptor), Box::new(value))
    }

    pub fn composite(descriptor: Value, fields: Vec<Value>) -> Value {
        Value::Composite(Box::new(descriptor), fields)
    }

    /// Drop this value, recursively destroying everything it owns. A named
    /// wrapper around ordinary drop, kept for parity with spec.md's
    /// `destroy(value)` operation — in Rust the owning binding going out of
    /// scope already does this.
    pub fn destroy(self) {
        drop(self);
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    for_each_plain_scalar!(scalar_accessor, ());

    pub fn as_char(&self) -> Result<char> {
        match self {
            Value::Char(c) => Ok(*c),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn as_uuid(&self) -> Result<[u8; 16]> {
        match self {
            Value::Uuid(b) => Ok(*b),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn as_binary(&self) -> Result<&[u8]> {
        match self {
            Value::Binary(b) => Ok(b),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn as_string(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn as_symbol(&self) -> Result<&[u8]> {
        match self {
            Value::Symbol(b) => Ok(b),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn as_list(&self) -> Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn as_map(&self) -> Result<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Ok(pairs),
            _ => Err(Error::TypeMismatch),
        }
    }

    /// The descriptor of a `described`/`composite` value.
    pub fn descriptor(&self) -> Result<&Value> {
        match self {
            Value::Described(d, _) => Ok(d),
            Value::Composite(d, _) => Ok(d),
            _ => Err(Error::TypeMismatch),
        }
    }

    /// The inner value of a `described`/`composite` value. For a
    /// `composite` this builds a fresh `List` from its fields.
    pub fn described_value(&self) -> Result<Value> {
        match self {
            Value::Described(_, v) => Ok((**v).clone()),
            Value::Composite(_, fields) => Ok(Value::List(fields.clone())),
            _ => Err(Error::TypeMismatch),
        }
    }

    // --- Compound mutation -------------------------------------------------

    fn list_items_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            Value::Composite(_, fields) => Ok(fields),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn list_item_count(&self) -> Result<usize> {
        match self {
            Value::List(items) => Ok(items.len()),
            Value::Composite(_, fields) => Ok(fields.len()),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn list_get_item(&self, index: usize) -> Result<&Value> {
        let items = match self {
            Value::List(items) => items,
            Value::Composite(_, fields) => fields,
            _ => return Err(Error::TypeMismatch),
        };
        items.get(index).ok_or(Error::InvalidArgument)
    }

    /// Grow or shrink a list to exactly `n` items. Growth fills new slots
    /// with `Null`; shrinkage drops the trailing items. Atomic: on the only
    /// failure path here (wrong `Value` kind) the list is left untouched.
    pub fn set_list_item_count(&mut self, n: usize) -> Result<()> {
        let items = self.list_items_mut()?;
        if n < items.len() {
            items.truncate(n);
        } else {
            items.resize_with(n, || Value::Null);
        }
        Ok(())
    }

    /// Set `items[index] = v.clone()`, growing with `Null`s if
    /// `index >= count` (auto-grow, per spec.md §9's resolution of the
    /// source's `i > count` behavior).
    pub fn set_list_item(&mut self, index: usize, v: &Value) -> Result<()> {
        let items = self.list_items_mut()?;
        if index >= items.len() {
            items.resize_with(index + 1, || Value::Null);
        }
        items[index] = v.clone();
        Ok(())
    }

    pub fn set_composite_item(&mut self, index: usize, v: &Value) -> Result<()> {
        match self {
            Value::Composite(_, _) => self.set_list_item(index, v),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn map_pair_count(&self) -> Result<usize> {
        match self {
            Value::Map(pairs) => Ok(pairs.len()),
            _ => Err(Error::TypeMismatch),
        }
    }

    pub fn map_get_value(&self, key: &Value) -> Result<Option<&Value>> {
        match self {
            Value::Map(pairs) => Ok(pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)),
            _ => Err(Error::TypeMismatch),
        }
    }

    /// Replace the value for `key` if present, otherwise append
    /// `(key.clone(), value.clone())`. The pair count only grows on a
    /// genuinely new key, keeping map key uniqueness (invariant 2).
    pub fn set_map_value(&mut self, key: &Value, value: &Value) -> Result<()> {
        match self {
            Value::Map(pairs) => {
                if let Some(pair) = pairs.iter_mut().find(|(k, _)| k == key) {
                    pair.1 = value.clone();
                } else {
                    pairs.push((key.clone(), value.clone()));
                }
                Ok(())
            }
            _ => Err(Error::TypeMismatch),
        }
    }
}

/// Structural equality. Manual rather than derived for one reason:
/// `Described(d, List(items))` and `Composite(d, items)` are the same wire
/// value (`Composite` only exists as an encode-time ergonomic constructor;
/// the decoder always produces `Described`, see `decoder.rs`), so they must
/// compare equal or the round-trip property in spec.md §8 would fail for
/// every composite value.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (UByte(a), UByte(b)) => a == b,
            (UShort(a), UShort(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (ULong(a), ULong(b)) => a == b,
            (Byte(a), Byte(b)) => a == b,
            (Short(a), Short(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Binary(a), Binary(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Described(d1, v1), Described(d2, v2)) => d1 == d2 && v1 == v2,
            (Composite(d1, f1), Composite(d2, f2)) => d1 == d2 && f1 == f2,
            (Described(d1, v1), Composite(d2, f2)) | (Composite(d2, f2), Described(d1, v1)) => {
                d1 == d2 && matches!(v1.as_ref(), List(items) if items == f2)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_rejects_out_of_range_codepoints() {
        assert!(Value::char_value(0x10FFFF).is_ok());
        assert_eq!(Value::char_value(0x110000), Err(Error::InvalidArgument));
    }

    #[test]
    fn binary_none_is_empty() {
        let v = Value::binary(None);
        assert_eq!(v.as_binary().unwrap(), &[] as &[u8]);
    }

    #[test]
    fn accessor_mismatch_does_not_mutate() {
        let v = Value::ulong(42);
        assert_eq!(v.as_string(), Err(Error::TypeMismatch));
        assert_eq!(v.as_ulong(), Ok(42));
    }

    #[test]
    fn list_set_item_count_grows_with_nulls_and_shrinks() {
        let mut list = Value::list_empty();
        list.set_list_item_count(3).unwrap();
        assert_eq!(list.list_item_count().unwrap(), 3);
        assert!(list.list_get_item(2).unwrap().is_null());

        list.set_list_item_count(1).unwrap();
        assert_eq!(list.list_item_count().unwrap(), 1);
    }

    #[test]
    fn list_set_item_past_end_auto_grows() {
        let mut list = Value::list_empty();
        list.set_list_item(2, &Value::ubyte(9)).unwrap();
        assert_eq!(list.list_item_count().unwrap(), 3);
        assert!(list.list_get_item(0).unwrap().is_null());
        assert!(list.list_get_item(1).unwrap().is_null());
        assert_eq!(list.list_get_item(2).unwrap().as_ubyte().unwrap(), 9);
    }

    #[test]
    fn map_set_value_reuses_slot_for_equal_key() {
        let mut map = Value::map_empty();
        map.set_map_value(&Value::string("k"), &Value::uint(1)).unwrap();
        map.set_map_value(&Value::string("k"), &Value::uint(2)).unwrap();
        assert_eq!(map.map_pair_count().unwrap(), 1);
        assert_eq!(
            map.map_get_value(&Value::string("k")).unwrap().unwrap().as_uint().unwrap(),
            2
        );
    }

    #[test]
    fn clone_is_deep_and_independent() {
        let mut original = Value::list(vec![Value::ulong(1), Value::string("a")]);
        let cloned = original.clone();
        original.set_list_item(0, &Value::ulong(99)).unwrap();
        assert_eq!(cloned.list_get_item(0).unwrap().as_ulong().unwrap(), 1);
        assert_eq!(original.list_get_item(0).unwrap().as_ulong().unwrap(), 99);
    }

    #[test]
    fn described_and_composite_compare_equal_when_same_shape() {
        let described = Value::described(
            Value::ulong(0x10),
            Value::list(vec![Value::ubyte(1), Value::ubyte(2)]),
        );
        let composite = Value::composite(Value::ulong(0x10), vec![Value::ubyte(1), Value::ubyte(2)]);
        assert_eq!(described, composite);
    }
}
