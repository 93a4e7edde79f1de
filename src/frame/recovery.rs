//! Diagnostic values for frames that failed to decode.
//!
//! A malformed byte stream is an expected runtime condition on a long-lived
//! station link, so decode failures are materialized as values carrying
//! whatever pieces did decode, instead of a bare error. These values are
//! produced only by the decode path and are never re-encoded.

use thiserror::Error;

use crate::core::DecodeError;
use crate::frame::{FrameHeader, FrameTrailer};
use crate::payload::Payload;

/// The independently-optional pieces of a frame that decoded successfully
/// before the failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialFrame {
    /// Header, if the first 36 bytes decoded.
    pub header: Option<FrameHeader>,
    /// Payload, if the body decoded under the header's frame type.
    pub payload: Option<Payload>,
    /// Trailer, if the bytes at the trailer offset decoded.
    pub trailer: Option<FrameTrailer>,
}

/// A frame buffer that could not be decoded.
///
/// Carries the raw bytes and the offset at which reading stopped so the
/// failure can be logged, quarantined, or replayed against a fixed decoder.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("malformed frame at offset {read_position}: {cause}")]
pub struct MalformedFrame {
    /// Whatever pieces decoded before the failure.
    pub partial: PartialFrame,
    /// The decode error that stopped processing.
    pub cause: DecodeError,
    /// The buffer as received.
    pub raw_bytes: Vec<u8>,
    /// Offset at which reading stopped. For a truncated buffer this is the
    /// buffer length; otherwise it is the position of the offending field.
    pub read_position: usize,
    /// Frame creator from the header, when the header decoded; useful for
    /// attributing corruption to a station in logs.
    pub station_hint: Option<String>,
}

impl MalformedFrame {
    /// Station to attribute this failure to, or `"unknown"`.
    pub fn station(&self) -> &str {
        self.station_hint.as_deref().unwrap_or("unknown")
    }
}
