//! AMQP 1.0 value model, encoder and streaming decoder.
//!
//! This crate is the wire-format layer: a [`Value`] tree, encoding it to
//! bytes, and reassembling it from bytes pushed in arbitrary chunks. It
//! knows nothing about frames, channels, or transports — see
//! `amqp-frame-codec` for the layer built on top of it.

mod macros;

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod types;
pub mod value;

pub use cursor::Cursor;
pub use cursor::StreamBuffer;
pub use decoder::decode_one;
pub use decoder::StreamDecoder;
pub use encoder::CountingSink;
pub use encoder::EncodeOutput;
pub use encoder::VecSink;
pub use types::Error;
pub use types::Result;
pub use value::Value;

#[cfg(test)]
mod tests;
