//! Option exchange payload (option request and response).
//!
//! Wire format:
//! ```text
//! +0   Option Count (4 bytes, always 1)
//! +4   Option Type  (4 bytes, 1 = connection establishment)
//! +8   Option Size  (4 bytes, unpadded value length)
//! +12  Option Value (size bytes, zero-padded to a 4-byte boundary)
//! ```
//!
//! Only the connection-establishment option is defined; its value is the
//! station name the sender wants the connection associated with. Requests
//! carry the asked-for value, responses echo what the peer accepted.

use crate::core::constants::{
    OPTION_COUNT, OPTION_TYPE_CONNECTION, OPTION_VALUE_MAX_LENGTH, OPTION_VALUE_MIN_LENGTH,
};
use crate::core::{BuildError, DecodeError};
use crate::payload::ExchangeKind;
use crate::wire::{ByteReader, ByteWriter, padded_length};

/// Option exchange payload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionExchange {
    /// Whether this body travels in a request or a response frame.
    pub kind: ExchangeKind,
    /// Connection-establishment option value (1 to 8 bytes).
    pub option_value: String,
}

impl OptionExchange {
    /// Build an option exchange carrying a connection-establishment value.
    pub fn new(kind: ExchangeKind, option_value: &str) -> Result<Self, BuildError> {
        let actual = option_value.len();
        if !(OPTION_VALUE_MIN_LENGTH..=OPTION_VALUE_MAX_LENGTH).contains(&actual) {
            return Err(BuildError::OptionValueLength {
                actual,
                min: OPTION_VALUE_MIN_LENGTH,
                max: OPTION_VALUE_MAX_LENGTH,
            });
        }
        Ok(Self { kind, option_value: option_value.to_owned() })
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(OPTION_COUNT);
        writer.write_u32(OPTION_TYPE_CONNECTION);
        writer.write_u32(self.option_value.len() as u32);
        writer.write_padded(self.option_value.as_bytes());
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(12 + padded_length(self.option_value.len()));
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    pub fn decode(kind: ExchangeKind, reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let count = reader.read_u32()?;
        if count != OPTION_COUNT {
            return Err(DecodeError::InvalidOptionCount(count));
        }

        let option_type = reader.read_u32()?;
        if option_type != OPTION_TYPE_CONNECTION {
            return Err(DecodeError::InvalidOptionType(option_type));
        }

        let size = reader.read_u32()? as usize;
        let raw = reader.read_padded(size)?;
        let value = String::from_utf8_lossy(raw).into_owned();
        Ok(Self::new(kind, &value)?)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(kind: ExchangeKind, bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(kind, &mut ByteReader::new(bytes))
    }
}
