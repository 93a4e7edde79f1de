//! Typed frame bodies.
//!
//! [`Payload`] is a closed sum over the eight body kinds, dispatched on the
//! header's frame-type code. Each variant is an independently encodable and
//! decodable unit; none of them reads or writes the frame header or trailer.

mod acknack;
mod alert;
mod command;
mod connection;
mod data;
mod option;
mod reset;
mod subframe;
mod subframe_header;

pub use acknack::Acknack;
pub use alert::Alert;
pub use command::{CommandRequest, CommandResponse, CommandTarget};
pub use connection::ConnectionExchange;
pub use data::Data;
pub use option::OptionExchange;
pub use reset::CustomReset;
pub use subframe::{ChannelDescription, ChannelSubframe};
pub use subframe_header::{ChannelName, ChannelSubframeHeader};

use crate::core::DecodeError;
use crate::frame::FrameType;
use crate::wire::{ByteReader, ByteWriter};

/// Direction of a connection or option exchange body.
///
/// The two directions share a wire layout; only the frame-type code in the
/// header tells them apart, so the bodies carry the direction explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeKind {
    /// Sent by the side initiating the exchange.
    Request,
    /// Sent in answer to a request.
    Response,
}

/// A frame body, one variant per frame type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Acknowledgment / gap report / heartbeat.
    Acknack(Acknack),
    /// Free-text notification.
    Alert(Alert),
    /// Command sent to a station's channel.
    CommandRequest(CommandRequest),
    /// Station's answer to a command.
    CommandResponse(CommandResponse),
    /// Connection establishment body (request or response).
    ConnectionExchange(ConnectionExchange),
    /// Option negotiation body (request or response).
    OptionExchange(OptionExchange),
    /// Waveform channel subframes.
    Data(Data),
    /// Non-standard reset of the receiver's gap bookkeeping.
    CustomReset(CustomReset),
}

impl Payload {
    /// The frame-type code this body travels under.
    pub fn frame_type(&self) -> FrameType {
        match self {
            Self::Acknack(_) => FrameType::Acknack,
            Self::Alert(_) => FrameType::Alert,
            Self::CommandRequest(_) => FrameType::CommandRequest,
            Self::CommandResponse(_) => FrameType::CommandResponse,
            Self::ConnectionExchange(body) => match body.kind {
                ExchangeKind::Request => FrameType::ConnectionRequest,
                ExchangeKind::Response => FrameType::ConnectionResponse,
            },
            Self::OptionExchange(body) => match body.kind {
                ExchangeKind::Request => FrameType::OptionRequest,
                ExchangeKind::Response => FrameType::OptionResponse,
            },
            Self::Data(_) => FrameType::Data,
            Self::CustomReset(_) => FrameType::CustomReset,
        }
    }

    /// Serialize the body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        match self {
            Self::Acknack(body) => body.encode(writer),
            Self::Alert(body) => body.encode(writer),
            Self::CommandRequest(body) => body.encode(writer),
            Self::CommandResponse(body) => body.encode(writer),
            Self::ConnectionExchange(body) => body.encode(writer),
            Self::OptionExchange(body) => body.encode(writer),
            Self::Data(body) => body.encode(writer),
            Self::CustomReset(body) => body.encode(writer),
        }
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode the body selected by `frame_type` from the reader.
    ///
    /// `payload_length` is needed only by the custom reset body, which has
    /// no internal length field of its own.
    pub fn decode(
        frame_type: FrameType,
        reader: &mut ByteReader<'_>,
        payload_length: usize,
    ) -> Result<Self, DecodeError> {
        Ok(match frame_type {
            FrameType::Acknack => Self::Acknack(Acknack::decode(reader)?),
            FrameType::Alert => Self::Alert(Alert::decode(reader)?),
            FrameType::CommandRequest => Self::CommandRequest(CommandRequest::decode(reader)?),
            FrameType::CommandResponse => Self::CommandResponse(CommandResponse::decode(reader)?),
            FrameType::ConnectionRequest => Self::ConnectionExchange(ConnectionExchange::decode(
                ExchangeKind::Request,
                reader,
            )?),
            FrameType::ConnectionResponse => Self::ConnectionExchange(ConnectionExchange::decode(
                ExchangeKind::Response,
                reader,
            )?),
            FrameType::OptionRequest => {
                Self::OptionExchange(OptionExchange::decode(ExchangeKind::Request, reader)?)
            }
            FrameType::OptionResponse => {
                Self::OptionExchange(OptionExchange::decode(ExchangeKind::Response, reader)?)
            }
            FrameType::Data => Self::Data(Data::decode(reader)?),
            FrameType::CustomReset => Self::CustomReset(CustomReset::decode(reader, payload_length)?),
        })
    }

    /// Decode a standalone body buffer for the given frame type.
    pub fn from_bytes(frame_type: FrameType, bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(frame_type, &mut ByteReader::new(bytes), bytes.len())
    }
}
