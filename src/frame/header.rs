//! Fixed 36-byte frame header.
//!
//! Wire format (all integers big-endian):
//! ```text
//! +0   Frame Type        (4 bytes)
//! +4   Trailer Offset    (4 bytes)  = length of header + payload
//! +8   Frame Creator     (8 bytes, null-padded ASCII)
//! +16  Frame Destination (8 bytes, null-padded ASCII)
//! +24  Sequence Number   (8 bytes)
//! +32  Series            (4 bytes)
//! ```

use crate::core::constants::{
    FRAME_CREATOR_LENGTH, FRAME_HEADER_LENGTH, FRAME_TYPE_ACKNACK, FRAME_TYPE_ALERT,
    FRAME_TYPE_COMMAND_REQUEST, FRAME_TYPE_COMMAND_RESPONSE, FRAME_TYPE_CONNECTION_REQUEST,
    FRAME_TYPE_CONNECTION_RESPONSE, FRAME_TYPE_CUSTOM_RESET, FRAME_TYPE_DATA,
    FRAME_TYPE_OPTION_REQUEST, FRAME_TYPE_OPTION_RESPONSE,
};
use crate::core::{BuildError, DecodeError};
use crate::wire::{ByteReader, ByteWriter};

/// Frame type codes from the CD-1.1 specification.
///
/// The custom reset frame (13) is not part of the formal spec; it signals
/// "clear gap list and await new connection" for operational resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FrameType {
    /// Connection request (station -> receiver).
    ConnectionRequest = FRAME_TYPE_CONNECTION_REQUEST,
    /// Connection response (receiver -> station).
    ConnectionResponse = FRAME_TYPE_CONNECTION_RESPONSE,
    /// Option request.
    OptionRequest = FRAME_TYPE_OPTION_REQUEST,
    /// Option response.
    OptionResponse = FRAME_TYPE_OPTION_RESPONSE,
    /// Waveform data frame.
    Data = FRAME_TYPE_DATA,
    /// Acknowledgment / gap report / heartbeat.
    Acknack = FRAME_TYPE_ACKNACK,
    /// Command request.
    CommandRequest = FRAME_TYPE_COMMAND_REQUEST,
    /// Command response.
    CommandResponse = FRAME_TYPE_COMMAND_RESPONSE,
    /// Alert frame.
    Alert = FRAME_TYPE_ALERT,
    /// Non-standard reset frame.
    CustomReset = FRAME_TYPE_CUSTOM_RESET,
}

impl FrameType {
    /// Parse a frame type from its wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            FRAME_TYPE_CONNECTION_REQUEST => Some(Self::ConnectionRequest),
            FRAME_TYPE_CONNECTION_RESPONSE => Some(Self::ConnectionResponse),
            FRAME_TYPE_OPTION_REQUEST => Some(Self::OptionRequest),
            FRAME_TYPE_OPTION_RESPONSE => Some(Self::OptionResponse),
            FRAME_TYPE_DATA => Some(Self::Data),
            FRAME_TYPE_ACKNACK => Some(Self::Acknack),
            FRAME_TYPE_COMMAND_REQUEST => Some(Self::CommandRequest),
            FRAME_TYPE_COMMAND_RESPONSE => Some(Self::CommandResponse),
            FRAME_TYPE_ALERT => Some(Self::Alert),
            FRAME_TYPE_CUSTOM_RESET => Some(Self::CustomReset),
            _ => None,
        }
    }

    /// Wire code for this frame type.
    pub fn as_code(self) -> u32 {
        self as u32
    }

    /// Whether frames of this type participate in sequence-number gap
    /// tracking.
    ///
    /// Only data frames are acknowledged; an Acknack must never be
    /// gap-tracked or acknowledged itself.
    pub fn is_gap_tracked(self) -> bool {
        matches!(self, Self::Data)
    }
}

/// Frame header present on every CD-1.1 frame.
///
/// `frame_creator`/`frame_destination` are stored de-padded; the codec
/// right-pads them with null bytes to exactly 8 bytes on the wire. The
/// sequence number is meaningful only for gap-tracked frame types; control
/// frames carry an undefined value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame type; must match the payload variant carried by the frame.
    pub frame_type: FrameType,
    /// Byte length of header + payload (where the trailer begins).
    pub trailer_offset: u32,
    /// Originating frame-set participant (max 8 bytes).
    pub frame_creator: String,
    /// Receiving frame-set participant (max 8 bytes).
    pub frame_destination: String,
    /// Sequence number within the frame set.
    pub sequence_number: u64,
    /// Series number.
    pub series: u32,
}

impl FrameHeader {
    /// Fixed wire length of the header.
    pub const LENGTH: usize = FRAME_HEADER_LENGTH;

    /// Build a header for a payload of `payload_length` bytes.
    pub fn new(
        frame_type: FrameType,
        frame_creator: &str,
        frame_destination: &str,
        sequence_number: u64,
        series: u32,
        payload_length: usize,
    ) -> Result<Self, BuildError> {
        check_width("frame creator", frame_creator, FRAME_CREATOR_LENGTH)?;
        check_width("frame destination", frame_destination, FRAME_CREATOR_LENGTH)?;

        // The trailer offset is a u32 covering header + payload
        let max = u32::MAX as usize - Self::LENGTH;
        if payload_length > max {
            return Err(BuildError::PayloadTooLarge { actual: payload_length, max });
        }

        Ok(Self {
            frame_type,
            trailer_offset: (Self::LENGTH + payload_length) as u32,
            frame_creator: frame_creator.to_owned(),
            frame_destination: frame_destination.to_owned(),
            sequence_number,
            series,
        })
    }

    /// Serialize the header (always exactly 36 bytes).
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.frame_type.as_code());
        writer.write_u32(self.trailer_offset);
        writer.write_string(&self.frame_creator, FRAME_CREATOR_LENGTH);
        writer.write_string(&self.frame_destination, FRAME_CREATOR_LENGTH);
        writer.write_u64(self.sequence_number);
        writer.write_u32(self.series);
    }

    /// Serialize the header to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(Self::LENGTH);
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode a header from the reader's current position.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let code = reader.read_u32()?;
        let frame_type = FrameType::from_code(code).ok_or(DecodeError::InvalidFrameType(code))?;

        let trailer_offset = reader.read_u32()?;
        if (trailer_offset as usize) < Self::LENGTH {
            return Err(DecodeError::InvalidTrailerOffset(trailer_offset));
        }

        let frame_creator = reader.read_string(FRAME_CREATOR_LENGTH)?;
        let frame_destination = reader.read_string(FRAME_CREATOR_LENGTH)?;
        let sequence_number = reader.read_u64()?;
        let series = reader.read_u32()?;

        Ok(Self {
            frame_type,
            trailer_offset,
            frame_creator,
            frame_destination,
            sequence_number,
            series,
        })
    }

    /// Byte length of the payload region this header describes.
    pub fn payload_length(&self) -> usize {
        self.trailer_offset as usize - Self::LENGTH
    }

    /// Decode a header from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}

pub(crate) fn check_width(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), BuildError> {
    if value.len() > max {
        return Err(BuildError::FieldTooLong { field, max, actual: value.len() });
    }
    Ok(())
}
