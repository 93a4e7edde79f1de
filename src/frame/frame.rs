//! Frame assembly, serialization, and the malformed-frame decode boundary.
//!
//! Encoding order is payload, header, trailer: the trailer's comm
//! verification is a checksum over the serialized header + payload +
//! trailer with the checksum field itself zeroed, so it has to be computed
//! last and patched into the final 8 bytes. Decoding runs the same stages
//! forward, and converts every [`DecodeError`] into a [`MalformedFrame`]
//! value instead of letting it escape raw.

use crate::core::{BuildError, DecodeError};
use crate::frame::{FrameHeader, FrameTrailer, FrameType, MalformedFrame, PartialFrame};
use crate::payload::Payload;
use crate::wire::{ByteReader, ByteWriter, checksum};

/// Outcome of comparing the trailer's comm verification against a checksum
/// recomputed over the received bytes.
///
/// A mismatch is deliberately not a [`DecodeError`]: the frame structure is
/// intact, and callers may want different policy for corruption (request
/// retransmission) than for malformed structure (drop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Stored and recomputed checksums agree.
    Passed,
    /// Checksums disagree; the frame content is suspect.
    Failed {
        /// Checksum carried in the trailer.
        stored: u64,
        /// Checksum recomputed over the received bytes.
        computed: u64,
    },
}

impl Verification {
    /// Whether the checksums agreed.
    pub fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// A successfully decoded frame together with its integrity outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// The decoded frame.
    pub frame: Frame,
    /// Comm verification outcome.
    pub verification: Verification,
}

/// A complete CD-1.1 frame: header, payload, trailer, and its serialized
/// bytes.
///
/// The wire bytes are computed once at construction and stored, so
/// [`Frame::to_bytes`] is a cheap borrow and repeated sends never
/// re-serialize. The pieces are read-only after construction; mutating any
/// of them would invalidate both the trailer offset and the checksum.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    header: FrameHeader,
    payload: Payload,
    trailer: FrameTrailer,
    wire: Vec<u8>,
}

impl Frame {
    /// The frame header.
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// The frame body.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The frame trailer, with its comm verification filled in.
    pub fn trailer(&self) -> &FrameTrailer {
        &self.trailer
    }

    /// Frame type, as carried in the header.
    pub fn frame_type(&self) -> FrameType {
        self.header.frame_type
    }

    /// Sequence number, meaningful only for gap-tracked frame types.
    pub fn sequence_number(&self) -> u64 {
        self.header.sequence_number
    }

    /// The serialized frame (memoized at construction).
    pub fn to_bytes(&self) -> &[u8] {
        &self.wire
    }

    /// Serialize the three pieces, compute the comm verification over the
    /// result with its checksum field zeroed, and patch it in.
    fn assemble(header: FrameHeader, payload: Payload, mut trailer: FrameTrailer) -> Self {
        trailer.comm_verification = 0;

        let mut writer = ByteWriter::with_capacity(
            header.trailer_offset as usize + trailer.wire_length(),
        );
        header.encode(&mut writer);
        payload.encode(&mut writer);
        trailer.encode(&mut writer);

        let mut wire = writer.into_bytes();
        let crc = checksum(&wire);
        let tail = wire.len() - 8;
        wire[tail..].copy_from_slice(&crc.to_be_bytes());
        trailer.comm_verification = crc;

        Self { header, payload, trailer, wire }
    }

    /// Decode one frame from a buffer believed to contain exactly one.
    ///
    /// Any failure yields a [`MalformedFrame`] carrying the pieces that did
    /// decode, the cause, and the offset where reading stopped. Checksum
    /// mismatch is not a failure here; it is reported through
    /// [`DecodedFrame::verification`].
    pub fn decode(bytes: &[u8]) -> Result<DecodedFrame, Box<MalformedFrame>> {
        let mut reader = ByteReader::new(bytes);
        let mut partial = PartialFrame::default();

        let header = match FrameHeader::decode(&mut reader) {
            Ok(header) => header,
            Err(cause) => return Err(malformed(partial, cause, bytes, &reader)),
        };
        partial.header = Some(header.clone());

        let payload = match Payload::decode(header.frame_type, &mut reader, header.payload_length())
        {
            Ok(payload) => payload,
            Err(cause) => return Err(malformed(partial, cause, bytes, &reader)),
        };
        partial.payload = Some(payload.clone());

        // The payload decoder must land exactly where the header said the
        // trailer begins; anything else means the two disagree about the
        // frame's shape.
        let expected = header.trailer_offset as usize;
        if reader.position() != expected {
            let cause = DecodeError::PayloadLengthMismatch {
                expected,
                actual: reader.position(),
            };
            return Err(malformed(partial, cause, bytes, &reader));
        }

        let trailer = match FrameTrailer::decode(&mut reader) {
            Ok(trailer) => trailer,
            Err(cause) => return Err(malformed(partial, cause, bytes, &reader)),
        };
        partial.trailer = Some(trailer.clone());

        let frame_end = reader.position();
        let verification = verify(&bytes[..frame_end], trailer.comm_verification);
        if let Verification::Failed { stored, computed } = verification {
            tracing::warn!(
                station = %header.frame_creator,
                stored = format_args!("{stored:#018x}"),
                computed = format_args!("{computed:#018x}"),
                "comm verification mismatch"
            );
        }

        let frame = Frame {
            header,
            payload,
            trailer,
            wire: bytes[..frame_end].to_vec(),
        };
        Ok(DecodedFrame { frame, verification })
    }
}

/// Recompute the checksum over a received frame region with its trailing
/// comm verification field zeroed, and compare against the stored value.
fn verify(frame_bytes: &[u8], stored: u64) -> Verification {
    let mut scratch = frame_bytes.to_vec();
    let tail = scratch.len() - 8;
    scratch[tail..].fill(0);

    let computed = checksum(&scratch);
    if computed == stored {
        Verification::Passed
    } else {
        Verification::Failed { stored, computed }
    }
}

fn malformed(
    partial: PartialFrame,
    cause: DecodeError,
    bytes: &[u8],
    reader: &ByteReader<'_>,
) -> Box<MalformedFrame> {
    // A truncated buffer fails wherever the last complete field ended, but
    // the useful diagnostic is "the buffer ran out": report its length.
    let read_position = match &cause {
        DecodeError::Underflow(_) => reader.position() + reader.remaining(),
        _ => reader.position(),
    };
    let station_hint = partial
        .header
        .as_ref()
        .map(|h| h.frame_creator.clone())
        .filter(|s| !s.is_empty());

    Box::new(MalformedFrame {
        partial,
        cause,
        raw_bytes: bytes.to_vec(),
        read_position,
        station_hint,
    })
}

/// Builder for outbound frames.
///
/// Holds the per-connection constants (creator, destination, series,
/// authentication) so call sites only supply the payload and sequence
/// number.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame_creator: String,
    frame_destination: String,
    sequence_number: u64,
    series: u32,
    auth_key_id: i32,
    auth_value: Vec<u8>,
}

impl FrameBuilder {
    /// Start a builder for the given creator/destination pair.
    pub fn new(frame_creator: &str, frame_destination: &str) -> Self {
        Self {
            frame_creator: frame_creator.to_owned(),
            frame_destination: frame_destination.to_owned(),
            sequence_number: 0,
            series: 0,
            auth_key_id: 0,
            auth_value: Vec::new(),
        }
    }

    /// Set the sequence number for the next frame.
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    /// Set the series number.
    pub fn series(mut self, series: u32) -> Self {
        self.series = series;
        self
    }

    /// Attach an authentication key id and unpadded signature value.
    pub fn authentication(mut self, auth_key_id: i32, auth_value: &[u8]) -> Self {
        self.auth_key_id = auth_key_id;
        self.auth_value = auth_value.to_vec();
        self
    }

    /// Assemble and serialize a frame around `payload`.
    pub fn build(&self, payload: Payload) -> Result<Frame, BuildError> {
        let payload_length = payload.to_bytes().len();
        let header = FrameHeader::new(
            payload.frame_type(),
            &self.frame_creator,
            &self.frame_destination,
            self.sequence_number,
            self.series,
            payload_length,
        )?;
        let trailer = FrameTrailer::from_unpadded(self.auth_key_id, &self.auth_value);

        Ok(Frame::assemble(header, payload, trailer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Acknack, Alert, CustomReset};

    fn builder() -> FrameBuilder {
        FrameBuilder::new("KURK", "IDC").series(1)
    }

    fn acknack_frame() -> Frame {
        let payload =
            Payload::Acknack(Acknack::new("KURK:IDC", 5, 60, 1, vec![10, 20]).unwrap());
        builder().build(payload).unwrap()
    }

    #[test]
    fn test_build_and_decode_round_trip() {
        let frame = acknack_frame();
        let decoded = Frame::decode(frame.to_bytes()).unwrap();

        assert!(decoded.verification.is_passed());
        assert_eq!(decoded.frame, frame);
        assert_eq!(decoded.frame.frame_type(), FrameType::Acknack);
    }

    #[test]
    fn test_comm_verification_lands_in_last_eight_bytes() {
        let frame = acknack_frame();
        let bytes = frame.to_bytes();

        let tail = u64::from_be_bytes(bytes[bytes.len() - 8..].try_into().unwrap());
        assert_eq!(tail, frame.trailer().comm_verification);
        assert_ne!(tail, 0);
    }

    #[test]
    fn test_trailer_offset_matches_payload() {
        let frame = acknack_frame();
        let payload_length = frame.payload().to_bytes().len();
        assert_eq!(
            frame.header().trailer_offset as usize,
            FrameHeader::LENGTH + payload_length
        );
    }

    #[test]
    fn test_corruption_fails_verification_but_decodes() {
        let frame = acknack_frame();
        let mut bytes = frame.to_bytes().to_vec();
        bytes[40] ^= 0x01; // flip one payload bit

        let decoded = Frame::decode(&bytes).unwrap();
        assert!(matches!(
            decoded.verification,
            Verification::Failed { stored, computed } if stored != computed
        ));
    }

    #[test]
    fn test_truncated_buffer_reports_buffer_length() {
        let frame = acknack_frame();
        let bytes = &frame.to_bytes()[..50];

        let malformed = Frame::decode(bytes).unwrap_err();
        assert!(matches!(malformed.cause, DecodeError::Underflow(_)));
        assert_eq!(malformed.read_position, bytes.len());
        assert!(malformed.partial.header.is_some());
        assert!(malformed.partial.payload.is_none());
        assert_eq!(malformed.station(), "KURK");
    }

    #[test]
    fn test_unknown_frame_type_yields_empty_partial() {
        let frame = acknack_frame();
        let mut bytes = frame.to_bytes().to_vec();
        bytes[0..4].copy_from_slice(&99u32.to_be_bytes());

        let malformed = Frame::decode(&bytes).unwrap_err();
        assert_eq!(malformed.cause, DecodeError::InvalidFrameType(99));
        assert!(malformed.partial.header.is_none());
        assert_eq!(malformed.station(), "unknown");
    }

    #[test]
    fn test_payload_region_mismatch_detected() {
        let frame = acknack_frame();
        let mut bytes = frame.to_bytes().to_vec();
        // Grow the declared trailer offset by 4; the payload decoder will
        // stop short of it
        let offset = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
        bytes[4..8].copy_from_slice(&(offset + 4).to_be_bytes());

        let malformed = Frame::decode(&bytes).unwrap_err();
        assert!(matches!(
            malformed.cause,
            DecodeError::PayloadLengthMismatch { .. }
        ));
        assert!(malformed.partial.payload.is_some());
        assert!(malformed.partial.trailer.is_none());
    }

    #[test]
    fn test_authenticated_frame_round_trip() {
        let payload = Payload::Alert(Alert::new("calibration overdue").unwrap());
        let frame = builder()
            .authentication(9, &[0x51, 0x47, 0x4e])
            .build(payload)
            .unwrap();

        let decoded = Frame::decode(frame.to_bytes()).unwrap();
        assert!(decoded.verification.is_passed());
        assert_eq!(decoded.frame.trailer().auth_key_id, 9);
        assert_eq!(decoded.frame.trailer().auth_size, 3);
    }

    #[test]
    fn test_empty_payload_frame() {
        let frame = builder().build(Payload::CustomReset(CustomReset::empty())).unwrap();
        assert_eq!(frame.header().payload_length(), 0);

        let decoded = Frame::decode(frame.to_bytes()).unwrap();
        assert!(decoded.verification.is_passed());
        assert_eq!(decoded.frame.payload(), &Payload::CustomReset(CustomReset::empty()));
    }

    #[test]
    fn test_memoized_bytes_are_stable() {
        let frame = acknack_frame();
        let first = frame.to_bytes().to_vec();
        assert_eq!(frame.to_bytes(), first.as_slice());
    }
}
