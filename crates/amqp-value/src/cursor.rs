//! Byte cursor and streaming buffer used by the decoder.
//!
//! `Cursor` reads never panic or read out of bounds: a read past the end of
//! the slice returns [`Error::Pending`] with the number of additional bytes
//! needed, rather than failing. The streaming decoder relies on this to
//! resume a parse across arbitrary chunk boundaries instead of threading a
//! per-constructor continuation state through every call.

use crate::types::Error;
use crate::types::Result;

/// A read cursor over a borrowed byte slice.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.slice.len().saturating_sub(self.pos)
    }

    #[inline]
    fn need(&self, n: usize) -> Result<()> {
        if self.pos + n > self.slice.len() {
            Err(Error::Pending(self.pos + n - self.slice.len()))
        } else {
            Ok(())
        }
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.need(1)?;
        let b = self.slice[self.pos];
        self.pos += 1;
        Ok(b)
    }

    pub fn peek_byte(&self) -> Result<u8> {
        self.need(1)?;
        Ok(self.slice[self.pos])
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let out = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }
}

/// A growable buffer that absorbs bytes pushed in arbitrary-sized chunks and
/// lets the decoder retry a parse from the start of whatever is unconsumed.
///
/// Consumed bytes are marked rather than removed immediately; `compact`
/// reclaims their storage once no cursor into them is live.
pub struct StreamBuffer {
    data: Vec<u8>,
    valid_start: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            valid_start: 0,
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.data[self.valid_start..])
    }

    /// The unconsumed bytes, for callers that want to hand them to a
    /// one-shot parser (e.g. [`crate::decoder::decode_one`]) instead of
    /// going through a [`Cursor`] directly.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.valid_start..]
    }

    /// Mark `n` bytes (measured from the current valid start) as consumed.
    pub fn mark_consumed(&mut self, n: usize) {
        self.valid_start += n;
        debug_assert!(self.valid_start <= self.data.len());
    }

    /// Drop already-consumed bytes from the front of the buffer.
    pub fn compact(&mut self) {
        if self.valid_start > 0 {
            self.data.drain(..self.valid_start);
            self.valid_start = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.data.len() - self.valid_start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basic() {
        let data = b"hello world";
        let mut cursor = Cursor::new(data);
        assert_eq!(cursor.remaining(), 11);
        assert_eq!(cursor.read_bytes(5).unwrap(), b"hello");
        assert_eq!(cursor.pos(), 5);
    }

    #[test]
    fn cursor_pending_reports_shortfall() {
        let data = b"short";
        let mut cursor = Cursor::new(data);
        match cursor.read_bytes(10) {
            Err(Error::Pending(n)) => assert_eq!(n, 5),
            other => panic!("expected Pending(5), got {other:?}"),
        }
    }

    #[test]
    fn cursor_multi_byte_integers_are_big_endian() {
        let mut cursor = Cursor::new(&[0x01, 0x02, 0x00, 0x00, 0x00, 0x03]);
        assert_eq!(cursor.read_u16().unwrap(), 0x0102);
        assert_eq!(cursor.read_u32().unwrap(), 0x0000_0003);
    }

    #[test]
    fn stream_buffer_compact_reclaims_consumed_bytes() {
        let mut buffer = StreamBuffer::new();
        buffer.extend(b"0123456789");
        buffer.mark_consumed(5);
        assert_eq!(buffer.len(), 5);
        buffer.compact();
        assert_eq!(buffer.cursor().remaining(), 5);
        assert_eq!(buffer.cursor().read_bytes(5).unwrap(), b"56789");
    }

    #[test]
    fn stream_buffer_workflow_across_pushes() {
        let mut buffer = StreamBuffer::new();
        buffer.extend(b"ab");
        {
            let mut c = buffer.cursor();
            assert!(matches!(c.read_bytes(3), Err(Error::Pending(1))));
        }
        buffer.extend(b"c");
        let consumed = {
            let mut c = buffer.cursor();
            let out = c.read_bytes(3).unwrap().to_vec();
            assert_eq!(out, b"abc");
            c.pos()
        };
        buffer.mark_consumed(consumed);
        assert!(buffer.is_empty());
    }
}
