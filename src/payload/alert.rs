//! Alert payload: free-text notification from a station.
//!
//! Wire format:
//! ```text
//! +0   Size    (4 bytes, unpadded message length)
//! +4   Message (size bytes, zero-padded to a 4-byte boundary)
//! ```

use crate::core::{BuildError, DecodeError};
use crate::frame::check_width;
use crate::wire::{ByteReader, ByteWriter, padded_length};

/// Maximum accepted alert message length. Generous; exists only so a
/// corrupt size field cannot masquerade as a valid alert.
const MAX_MESSAGE_LENGTH: usize = 1 << 20;

/// Alert payload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Alert text. The wire size field always equals its byte length.
    pub message: String,
}

impl Alert {
    /// Build an alert.
    pub fn new(message: &str) -> Result<Self, BuildError> {
        check_width("alert message", message, MAX_MESSAGE_LENGTH)?;
        Ok(Self { message: message.to_owned() })
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.message.len() as u32);
        writer.write_padded(self.message.as_bytes());
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(4 + padded_length(self.message.len()));
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let size = reader.read_u32()? as usize;
        let raw = reader.read_padded(size)?;
        let message = String::from_utf8_lossy(raw).into_owned();
        Ok(Self::new(&message)?)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}
