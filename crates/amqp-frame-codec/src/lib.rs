//! AMQP 1.0 performative frame codec.
//!
//! Layered on top of `amqp-value`: decodes a frame's body into a
//! performative descriptor code and argument list, and encodes outgoing
//! performatives through a caller-supplied [`LowerFrameCodec`] that owns
//! the actual frame/channel/size framing.

pub mod codec;
pub mod types;

pub use codec::encode_frame;
pub use codec::AmqpFrameCodec;
pub use codec::LowerFrameCodec;
pub use types::Error;
pub use types::Result;
