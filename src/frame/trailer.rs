//! Frame trailer: authentication fields + comm verification.
//!
//! Wire format:
//! ```text
//! +0   Auth Key Identifier (4 bytes)
//! +4   Auth Size           (4 bytes, unpadded value size)
//! +8   Auth Value          (auth size rounded up to a multiple of 4)
//! +N   Comm Verification   (8 bytes, checksum over the whole frame)
//! ```
//!
//! The stored authentication value keeps its wire padding: its length must
//! equal `auth_size` rounded up to the next multiple of 4. That invariant
//! can be checked without any wire context, so violating it is a
//! construction error, not a parse error.

use crate::core::constants::FRAME_TRAILER_FIXED_LENGTH;
use crate::core::{BuildError, DecodeError};
use crate::wire::{ByteReader, ByteWriter, pad_length, padded_length};

/// Frame trailer present on every CD-1.1 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTrailer {
    /// Identifier of the key that produced the authentication value.
    pub auth_key_id: i32,
    /// Unpadded authentication value size.
    pub auth_size: u32,
    /// Authentication value, stored padded to the 4-byte boundary.
    auth_value: Vec<u8>,
    /// 64-bit checksum over the entire frame (with this field zeroed).
    pub comm_verification: u64,
}

impl FrameTrailer {
    /// Byte length of the trailer's fixed fields.
    pub const FIXED_LENGTH: usize = FRAME_TRAILER_FIXED_LENGTH;

    /// Build a trailer from an already-padded authentication value.
    pub fn new(
        auth_key_id: i32,
        auth_size: u32,
        auth_value: Vec<u8>,
        comm_verification: u64,
    ) -> Result<Self, BuildError> {
        let expected = padded_length(auth_size as usize);
        if auth_value.len() != expected {
            return Err(BuildError::AuthValueLength {
                expected,
                size: auth_size,
                actual: auth_value.len(),
            });
        }

        Ok(Self { auth_key_id, auth_size, auth_value, comm_verification })
    }

    /// Build a trailer from an unpadded authentication value, applying the
    /// wire padding. The comm verification is left zero for the frame
    /// encoder to fill in last.
    pub fn from_unpadded(auth_key_id: i32, auth_value: &[u8]) -> Self {
        let auth_size = auth_value.len() as u32;
        let mut padded = auth_value.to_vec();
        padded.resize(auth_value.len() + pad_length(auth_value.len()), 0);

        Self { auth_key_id, auth_size, auth_value: padded, comm_verification: 0 }
    }

    /// Trailer with no authentication (key id 0, empty value).
    pub fn unauthenticated() -> Self {
        Self::from_unpadded(0, &[])
    }

    /// The stored (padded) authentication value.
    pub fn auth_value(&self) -> &[u8] {
        &self.auth_value
    }

    /// Total wire length of this trailer.
    pub fn wire_length(&self) -> usize {
        Self::FIXED_LENGTH + self.auth_value.len()
    }

    /// Serialize the trailer.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.auth_key_id);
        writer.write_u32(self.auth_size);
        writer.write_bytes(&self.auth_value);
        writer.write_u64(self.comm_verification);
    }

    /// Serialize the trailer to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.wire_length());
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode a trailer from the reader's current position.
    ///
    /// The value is read as `padded_length(auth_size)` bytes, not
    /// `auth_size` bytes.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let auth_key_id = reader.read_i32()?;
        let auth_size = reader.read_u32()?;
        let auth_value = reader.read_bytes(padded_length(auth_size as usize))?.to_vec();
        let comm_verification = reader.read_u64()?;

        Ok(Self::new(auth_key_id, auth_size, auth_value, comm_verification)?)
    }

    /// Decode a trailer from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}
