//! Performative framing on top of a lower, out-of-scope frame codec.
//!
//! `amqp_frame_codec.c` sits between the connection's raw frame boundaries
//! (type byte, channel, size — handled by a lower codec it's handed at
//! construction) and the AMQP value codec: it feeds frame body bytes to a
//! value decoder, and once that decoder reports a complete described value,
//! splits it into the performative's descriptor code and argument list.
//! Encoding runs the same value encoder twice — once to learn the
//! performative's size so the lower codec can start the frame header,
//! again to actually emit bytes.
//!
//! [`LowerFrameCodec`] stands in for that outer layer; a real connection
//! would implement it over its socket framing.

use amqp_value::decode_one;
use amqp_value::EncodeOutput;
use amqp_value::StreamBuffer;
use amqp_value::Value;
use amqp_value::VecSink;

use crate::types::Error;
use crate::types::Result;

/// The frame-boundary layer this codec is built on top of: it owns framing
/// (type byte, channel, size prefix) and just needs encoded bytes handed to
/// it, or hands received body bytes to us via
/// [`AmqpFrameCodec::frame_body_bytes_received`].
pub trait LowerFrameCodec {
    /// Begin an outgoing frame of `payload_size` bytes on `channel`.
    fn start_encode_frame(&mut self, channel: u16, payload_size: usize) -> std::result::Result<(), ()>;
    /// Append more of the current outgoing frame's payload.
    fn encode_frame_bytes(&mut self, bytes: &[u8]) -> std::result::Result<(), ()>;
}

/// Mirrors `amqp_frame_codec.c`'s `frame_body_size`/`frame_body_pos`: the
/// lower codec tells us up front, via `frame_begin`, exactly how many body
/// bytes to expect, so we know when the frame is complete without guessing
/// from the performative's own encoded size. This is what lets the
/// performative be decoded (and its trailing payload delivered) in exactly
/// one shot regardless of how many `frame_body_bytes_received` calls the
/// bytes arrive in.
struct FrameInProgress {
    channel: u16,
    body_size: usize,
    buffer: StreamBuffer,
}

/// Decodes incoming frame bodies into performatives, and encodes outgoing
/// ones through a [`LowerFrameCodec`].
///
/// `on_frame` is called once per frame, with the channel, the
/// performative's descriptor code, its argument list, and any bytes left
/// over after the performative (a transfer frame's message payload —
/// opaque to this codec, passed through unparsed).
pub struct AmqpFrameCodec<R> {
    on_frame: R,
    current: Option<FrameInProgress>,
}

impl<R> AmqpFrameCodec<R>
where
    R: FnMut(u16, u64, Vec<Value>, &[u8]) -> Result<()>,
{
    pub fn new(on_frame: R) -> Self {
        Self {
            on_frame,
            current: None,
        }
    }

    /// The lower codec has started delivering a frame of `body_size` bytes
    /// on `channel`. Mirrors `frame_begin`'s `frame_body_size` parameter in
    /// `amqp_frame_codec.c`.
    pub fn frame_begin(&mut self, channel: u16, body_size: usize) {
        self.current = Some(FrameInProgress {
            channel,
            body_size,
            buffer: StreamBuffer::new(),
        });
    }

    /// More of the current frame's body has arrived. May be called multiple
    /// times per frame; bytes are only buffered here, never parsed, until
    /// the full `body_size` declared in `frame_begin` has arrived — so no
    /// call, however the body happens to be chunked, can see its bytes
    /// silently dropped. Once the full body is in, the performative is
    /// decoded and `on_frame` fires exactly once, with every byte past the
    /// performative (possibly spanning several of these calls) handed over
    /// together as trailing payload.
    pub fn frame_body_bytes_received(&mut self, bytes: &[u8]) -> Result<()> {
        let frame = self.current.as_mut().ok_or(Error::NoFrameInProgress)?;
        frame.buffer.extend(bytes);

        if frame.buffer.len() < frame.body_size {
            return Ok(());
        }

        let FrameInProgress { channel, buffer, .. } = self.current.take().expect("checked above");
        let body = buffer.as_slice().to_vec();

        let (value, consumed) = decode_one(&body)?;
        let trailing = &body[consumed..];
        let (code, args) = split_performative(value)?;
        (self.on_frame)(channel, code, args, trailing)
    }
}

fn split_performative(value: Value) -> Result<(u64, Vec<Value>)> {
    let code = value.descriptor()?.as_ulong().map_err(|_| Error::InvalidDescriptor)?;
    match value.described_value()? {
        Value::List(items) => Ok((code, items)),
        _ => Err(Error::NotADescribedList),
    }
}

/// The descriptor-header byte (`0x00`) that precedes every described value
/// on the wire; written directly here rather than routed through a `Value`
/// since there is no standalone "descriptor header" `Value` kind.
const DESCRIPTOR_HEADER: u8 = 0x00;

/// Encode a performative (`descriptor` ulong code, followed by `chunks`) and
/// hand it to `lower`.
///
/// `chunks` mirrors `amqp_frame_codec_encode`'s `frame_content_chunks`: a
/// sequence of already-built [`Value`]s, each encoded in turn straight after
/// the descriptor. For an ordinary performative, `chunks` is a single
/// element — the argument list (e.g. `Value::list(args)`) — which the
/// receive side decodes back out as the one inner value of the described
/// performative; for a `transfer` frame, callers append further chunks
/// after the argument list (e.g. the message payload sections), which
/// `frame_body_bytes_received` hands back to its caller as trailing bytes it
/// never attempts to parse. Fails if `chunks` is empty, matching the
/// original C source's `frame_content_chunk_count == 0` check — here this
/// also guarantees the mandatory argument list was actually supplied.
///
/// Runs the value encoder twice, as the wire format requires: once via
/// `encoded_size` to learn the total so `lower.start_encode_frame` can open
/// the frame header, again to produce the bytes.
pub fn encode_frame<L: LowerFrameCodec>(
    lower: &mut L,
    channel: u16,
    descriptor_code: u64,
    chunks: &[Value],
) -> Result<()> {
    if chunks.is_empty() {
        return Err(Error::EmptyChunks);
    }

    let descriptor = Value::ulong(descriptor_code);
    let mut total_size = 1 + descriptor.encoded_size()?; // 1 for DESCRIPTOR_HEADER
    for chunk in chunks {
        total_size += chunk.encoded_size()?;
    }

    lower
        .start_encode_frame(channel, total_size)
        .map_err(|_| Error::LowerCodecFailed)?;

    let mut sink = VecSink::default();
    sink.write(&[DESCRIPTOR_HEADER])?;
    descriptor.encode(&mut sink)?;
    for chunk in chunks {
        chunk.encode(&mut sink)?;
    }

    lower
        .encode_frame_bytes(&sink.0)
        .map_err(|_| Error::LowerCodecFailed)?;

    Ok(())
}
