//! # CD-1.1 Protocol
//!
//! Codec for the CD-1.1 continuous-data format: the binary framing used to
//! move seismic and infrasound waveform data and control messages between a
//! data-producing station and a data-consuming receiver over a long-lived
//! byte stream. The protocol carries its own sequence numbering, gap
//! detection, keep-alive, and frame-integrity verification, independent of
//! the transport underneath.
//!
//! Every frame is `header (36 bytes) | payload | trailer`:
//!
//! ```text
//! +--------+-----------------------------+----------------------------+
//! | Header | Payload (one of 8 variants) | Trailer (auth + checksum)  |
//! +--------+-----------------------------+----------------------------+
//!  36 bytes  trailer_offset - 36 bytes     16 bytes + padded auth value
//! ```
//!
//! ## Modules
//!
//! - [`core`]: protocol constants and error types
//! - [`wire`]: binary cursor, Julian-date fields, checksum engine
//! - [`frame`]: header/trailer codecs, frame assembly, malformed-frame
//!   recovery
//! - [`payload`]: the eight typed frame bodies, including the channel
//!   subframe codec
//! - [`gaps`]: missing-sequence bookkeeping behind Acknack
//!
//! ## Example
//!
//! ```rust
//! use cd11_protocol::prelude::*;
//!
//! # fn main() -> Result<(), cd11_protocol::BuildError> {
//! // Track which data frames arrived, then report the holes.
//! let mut gaps = GapList::new();
//! gaps.record_received(1);
//! gaps.record_received(4);
//!
//! let payload = Payload::Acknack(Acknack::from_gap_list("KURK:IDC", &gaps)?);
//! let frame = FrameBuilder::new("KURK", "IDC").series(1).build(payload)?;
//!
//! let decoded = Frame::decode(frame.to_bytes()).expect("frame just built");
//! assert!(decoded.verification.is_passed());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod core;
pub mod frame;
pub mod gaps;
pub mod payload;
pub mod wire;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{BuildError, DecodeError};
    pub use crate::frame::{
        DecodedFrame, Frame, FrameBuilder, FrameHeader, FrameTrailer, FrameType, MalformedFrame,
        PartialFrame, Verification,
    };
    pub use crate::gaps::GapList;
    pub use crate::payload::{
        Acknack, Alert, ChannelDescription, ChannelName, ChannelSubframe, ChannelSubframeHeader,
        CommandRequest, CommandResponse, CommandTarget, ConnectionExchange, CustomReset, Data,
        ExchangeKind, OptionExchange, Payload,
    };
}

// Re-export commonly used items at crate root
pub use crate::core::{BuildError, CursorError, DecodeError, JulianDateError};
pub use crate::frame::{
    DecodedFrame, Frame, FrameBuilder, FrameHeader, FrameTrailer, FrameType, MalformedFrame,
    PartialFrame, Verification,
};
pub use crate::gaps::GapList;
pub use crate::payload::Payload;
