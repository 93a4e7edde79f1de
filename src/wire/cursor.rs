//! Bounds-checked binary cursor over CD-1.1 byte buffers.
//!
//! All multi-byte integers on the wire are big-endian. Fixed-width string
//! fields are right-padded with null bytes on encode and null-stripped on
//! decode. Nearly every variable-length field is declared with an *unpadded*
//! size followed by data padded to a 4-byte boundary, so the padding helpers
//! here are used pervasively by the frame and payload codecs.

use crate::core::CursorError;
use crate::core::constants::PAD_BOUNDARY;

/// Padding bytes needed to bring `len` up to the 4-byte boundary.
pub const fn pad_length(len: usize) -> usize {
    (PAD_BOUNDARY - len % PAD_BOUNDARY) % PAD_BOUNDARY
}

/// `len` rounded up to the next multiple of the 4-byte boundary.
pub const fn padded_length(len: usize) -> usize {
    len + pad_length(len)
}

/// Sequential bounds-checked reader over a byte buffer.
///
/// Reading past the end fails with [`CursorError::Underflow`] carrying the
/// offset at which the read was attempted; the frame decoder converts that
/// into a `MalformedFrame` rather than propagating it raw.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn check(&self, needed: usize) -> Result<(), CursorError> {
        if needed > self.remaining() {
            return Err(CursorError::Underflow {
                needed,
                remaining: self.remaining(),
                position: self.pos,
            });
        }
        Ok(())
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        self.check(len)?;
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        let b = self.read_bytes(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64, CursorError> {
        let b = self.read_bytes(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_be_bytes(arr))
    }

    /// Read a big-endian IEEE-754 f32.
    pub fn read_f32(&mut self) -> Result<f32, CursorError> {
        let b = self.read_bytes(4)?;
        Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a fixed-width ASCII string, stripping trailing null padding
    /// (and trailing spaces some legacy producers use instead).
    pub fn read_string(&mut self, width: usize) -> Result<String, CursorError> {
        let raw = self.read_bytes(width)?;
        let trimmed = raw
            .iter()
            .rposition(|&b| b != 0 && b != b' ')
            .map_or(&raw[..0], |i| &raw[..=i]);
        Ok(String::from_utf8_lossy(trimmed).into_owned())
    }

    /// Read a variable-length block declared with an unpadded size:
    /// consumes `padded_length(unpadded)` bytes, returns the first
    /// `unpadded` of them.
    pub fn read_padded(&mut self, unpadded: usize) -> Result<&'a [u8], CursorError> {
        let block = self.read_bytes(padded_length(unpadded))?;
        Ok(&block[..unpadded])
    }

    /// Look at the next `len` bytes without consuming them.
    ///
    /// Returns `None` if fewer than `len` bytes remain. Used by the
    /// channel-string padding heuristic, which must not fail on a peek.
    pub fn peek_bytes(&self, len: usize) -> Option<&'a [u8]> {
        if len > self.remaining() {
            return None;
        }
        Some(&self.buf[self.pos..self.pos + len])
    }

    /// Advance the cursor by `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), CursorError> {
        self.check(len)?;
        self.pos += len;
        Ok(())
    }
}

/// Growable big-endian writer mirroring [`ByteReader`]'s field encodings.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with a preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer, yielding the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Append a big-endian u16.
    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian u32.
    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian i32.
    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian u64.
    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian IEEE-754 f32.
    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append an ASCII string right-padded with null bytes to `width`.
    ///
    /// Callers validate length at construction; a longer string here is a
    /// codec bug, so it is truncated defensively rather than corrupting the
    /// frame layout.
    pub fn write_string(&mut self, s: &str, width: usize) {
        let bytes = s.as_bytes();
        let take = bytes.len().min(width);
        self.buf.extend_from_slice(&bytes[..take]);
        self.buf.resize(self.buf.len() + (width - take), 0);
    }

    /// Append a variable-length block zero-padded to the 4-byte boundary.
    pub fn write_padded(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.buf.resize(self.buf.len() + pad_length(bytes.len()), 0);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_pad_length() {
        assert_eq!(pad_length(0), 0);
        assert_eq!(pad_length(1), 3);
        assert_eq!(pad_length(2), 2);
        assert_eq!(pad_length(3), 1);
        assert_eq!(pad_length(4), 0);
        assert_eq!(pad_length(5), 3);
    }

    proptest! {
        #[test]
        fn padded_length_law(n in 0usize..100_000) {
            let padded = padded_length(n);
            prop_assert_eq!(padded % 4, 0);
            prop_assert!(padded - n <= 3);
        }

        #[test]
        fn integer_round_trip(a in any::<u16>(), b in any::<u32>(), c in any::<u64>(), d in any::<i32>()) {
            let mut w = ByteWriter::new();
            w.write_u16(a);
            w.write_u32(b);
            w.write_u64(c);
            w.write_i32(d);

            let bytes = w.into_bytes();
            let mut r = ByteReader::new(&bytes);
            prop_assert_eq!(r.read_u16().unwrap(), a);
            prop_assert_eq!(r.read_u32().unwrap(), b);
            prop_assert_eq!(r.read_u64().unwrap(), c);
            prop_assert_eq!(r.read_i32().unwrap(), d);
            prop_assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn test_underflow_reports_position() {
        let mut r = ByteReader::new(&[0, 1, 2, 3, 4, 5]);
        r.read_u32().unwrap();

        let err = r.read_u64().unwrap_err();
        assert_eq!(
            err,
            CursorError::Underflow { needed: 8, remaining: 2, position: 4 }
        );
        // Failed read must not move the cursor
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn test_string_null_stripping() {
        let mut w = ByteWriter::new();
        w.write_string("KURK", 8);
        let bytes = w.into_bytes();
        assert_eq!(bytes, b"KURK\0\0\0\0");

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_string(8).unwrap(), "KURK");
    }

    #[test]
    fn test_string_space_padding_tolerated() {
        let mut r = ByteReader::new(b"STA  ");
        assert_eq!(r.read_string(5).unwrap(), "STA");
    }

    #[test]
    fn test_padded_block_round_trip() {
        let mut w = ByteWriter::new();
        w.write_padded(&[1, 2, 3, 4, 5]);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[5..], &[0, 0, 0]);

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_padded(5).unwrap(), &[1, 2, 3, 4, 5]);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut r = ByteReader::new(&[9, 8, 7, 6]);
        assert_eq!(r.peek_bytes(2), Some(&[9u8, 8][..]));
        assert_eq!(r.position(), 0);
        assert_eq!(r.peek_bytes(5), None);
        r.skip(4).unwrap();
        assert!(r.skip(1).is_err());
    }

    #[test]
    fn test_f32_round_trip() {
        let mut w = ByteWriter::new();
        w.write_f32(1.5);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_f32().unwrap(), 1.5);
    }
}
