//! Custom reset payload.
//!
//! A custom reset instructs the receiver to discard its gap bookkeeping for
//! the sender's frame set and start over. The body is opaque: whatever bytes
//! the sender chose to attach, commonly empty. Because the body carries no
//! internal length field, decoding needs the payload length from the frame
//! header.

use crate::core::DecodeError;
use crate::wire::{ByteReader, ByteWriter};

/// Custom reset payload body (opaque bytes, usually empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomReset {
    /// Sender-defined body bytes, passed through untouched.
    pub body: Vec<u8>,
}

impl CustomReset {
    /// A reset with an empty body.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A reset carrying sender-defined bytes.
    pub fn with_body(body: Vec<u8>) -> Self {
        Self { body }
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.body);
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.body.clone()
    }

    /// Decode `payload_length` opaque bytes from the reader.
    pub fn decode(
        reader: &mut ByteReader<'_>,
        payload_length: usize,
    ) -> Result<Self, DecodeError> {
        let body = reader.read_bytes(payload_length)?.to_vec();
        Ok(Self { body })
    }

    /// Decode from a standalone buffer, consuming it whole.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes), bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_round_trip() {
        let reset = CustomReset::empty();
        assert!(reset.to_bytes().is_empty());
        assert_eq!(CustomReset::from_bytes(&[]).unwrap(), reset);
    }

    #[test]
    fn test_opaque_body_preserved() {
        let reset = CustomReset::with_body(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        let bytes = reset.to_bytes();
        assert_eq!(CustomReset::from_bytes(&bytes).unwrap(), reset);
    }

    #[test]
    fn test_truncated_body_underflows() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert!(matches!(
            CustomReset::decode(&mut reader, 4),
            Err(DecodeError::Underflow(_))
        ));
    }
}
