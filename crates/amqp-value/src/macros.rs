//! Declarative macros generating the repetitive per-kind constructor,
//! accessor, encode and decode code — one macro invocation lists the scalar
//! schema once, and each call site expands it into the method it needs.

/// Lists every scalar kind that carries its payload directly (no length
/// prefix, no validation beyond "is the right Rust type"). Each row is
/// `(constructor name, accessor name, Rust type, Value variant)`.
macro_rules! for_each_plain_scalar {
    ($m:ident, $ctx:tt) => {
        $m!(bool, as_bool, bool, Bool, $ctx);
        $m!(ubyte, as_ubyte, u8, UByte, $ctx);
        $m!(ushort, as_ushort, u16, UShort, $ctx);
        $m!(uint, as_uint, u32, UInt, $ctx);
        $m!(ulong, as_ulong, u64, ULong, $ctx);
        $m!(byte, as_byte, i8, Byte, $ctx);
        $m!(short, as_short, i16, Short, $ctx);
        $m!(int, as_int, i32, Int, $ctx);
        $m!(long, as_long, i64, Long, $ctx);
        $m!(float, as_float, f32, Float, $ctx);
        $m!(double, as_double, f64, Double, $ctx);
        $m!(timestamp, as_timestamp, i64, Timestamp, $ctx);
    };
}

/// Generates `Value::<name>(v: Ty) -> Value` constructors for plain scalars.
macro_rules! scalar_constructor {
    ($name:ident, $as_name:ident, $ty:ty, $variant:ident, $ctx:tt) => {
        #[doc = concat!("Create a `", stringify!($variant), "` value.")]
        pub fn $name(v: $ty) -> Value {
            Value::$variant(v)
        }
    };
}

/// Generates `Value::as_<name>(&self) -> Result<Ty>` accessors for plain
/// scalars; fails with `TypeMismatch` without touching `self` on mismatch.
macro_rules! scalar_accessor {
    ($name:ident, $as_name:ident, $ty:ty, $variant:ident, $ctx:tt) => {
        #[doc = concat!("Read this value as a `", stringify!($variant), "`.")]
        pub fn $as_name(&self) -> crate::types::Result<$ty> {
            match self {
                Value::$variant(v) => Ok(*v),
                _ => Err(crate::types::Error::TypeMismatch),
            }
        }
    };
}

pub(crate) use for_each_plain_scalar;
pub(crate) use scalar_accessor;
pub(crate) use scalar_constructor;
