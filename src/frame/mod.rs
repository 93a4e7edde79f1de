//! Frame envelope: header, trailer, assembly, and decode recovery.
//!
//! A frame is `header (36 bytes) | payload | trailer`. The header's trailer
//! offset locates the trailer; the trailer's comm verification is a
//! checksum over the whole frame computed with that field zeroed. Frames
//! that fail to decode become [`MalformedFrame`] values rather than bare
//! errors.

mod frame;
mod header;
mod recovery;
mod trailer;

pub use frame::{DecodedFrame, Frame, FrameBuilder, Verification};
pub use header::{FrameHeader, FrameType};
pub use recovery::{MalformedFrame, PartialFrame};
pub use trailer::FrameTrailer;

pub(crate) use header::check_width;
