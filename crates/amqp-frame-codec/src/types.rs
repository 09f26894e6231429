//! Error type for the frame codec layer.

use amqp_value::Error as ValueError;

/// Errors produced while decoding or encoding a performative frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The value codec failed while decoding or encoding the described
    /// value carrying the performative.
    Value(ValueError),
    /// The channel frame arrived before the previous one's body had
    /// finished, or bytes arrived with no frame open.
    NoFrameInProgress,
    /// The outer (lower) frame codec's body was not `0x00 descriptor arg-list`.
    NotADescribedList,
    /// The descriptor was not a `ulong` performative code.
    InvalidDescriptor,
    /// The lower frame codec rejected a chunk.
    LowerCodecFailed,
    /// `encode_frame` was called with no chunks at all — there is no
    /// performative argument list to encode.
    EmptyChunks,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Value(e) => write!(f, "value codec error: {e}"),
            Error::NoFrameInProgress => write!(f, "frame body bytes with no frame in progress"),
            Error::NotADescribedList => write!(f, "performative body is not a described list"),
            Error::InvalidDescriptor => write!(f, "performative descriptor is not a ulong code"),
            Error::LowerCodecFailed => write!(f, "lower frame codec rejected the frame"),
            Error::EmptyChunks => write!(f, "encode_frame requires at least one chunk"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValueError> for Error {
    fn from(e: ValueError) -> Self {
        Error::Value(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
