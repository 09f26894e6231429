//! Core types for the AMQP 1.0 value codec.

/// Errors produced by the value codec.
///
/// Mirrors the taxonomy a caller needs to distinguish, not the C source's
/// `__LINE__` result codes: an out-of-range argument is a different failure
/// than a truncated stream, which is different again from a sink refusing
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A constructor argument was out of range or otherwise invalid, e.g. a
    /// codepoint above `0x10FFFF`, or `binary(None, len > 0)`.
    InvalidArgument,
    /// An accessor was called on a `Value` whose tag does not match.
    TypeMismatch,
    /// Allocation failed while constructing, cloning, or growing a compound.
    ///
    /// Unreachable in practice: `Vec`/`Box` allocation failure aborts the
    /// process rather than returning here. Kept for parity with the error
    /// taxonomy a caller coming from the C API would expect.
    AllocationFailure,
    /// The decoder saw a byte that doesn't begin any known constructor.
    InvalidConstructor(u8),
    /// The input was structurally invalid in a way not covered by
    /// `InvalidConstructor` (mismatched sizes, non-ulong descriptor, ...).
    Malformed,
    /// A `string` or `symbol` payload was not valid UTF-8 / ASCII.
    InvalidText,
    /// Decoding needs more bytes than are currently available; `usize` is a
    /// lower bound on how many more. Not a terminal failure on its own — the
    /// streaming decoder absorbs this and waits for more input.
    Pending(usize),
    /// The encoder's output sink returned failure.
    EncodeFailed,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::TypeMismatch => write!(f, "value kind does not match accessor"),
            Error::AllocationFailure => write!(f, "allocation failure"),
            Error::InvalidConstructor(b) => write!(f, "unknown constructor byte {b:#04x}"),
            Error::Malformed => write!(f, "malformed encoding"),
            Error::InvalidText => write!(f, "invalid utf-8/ascii text"),
            Error::Pending(n) => write!(f, "{n} more byte(s) needed"),
            Error::EncodeFailed => write!(f, "encode sink failed"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
