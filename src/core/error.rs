//! Error types for the CD-1.1 codec.
//!
//! Three families, mirroring how failures are surfaced:
//!
//! - [`BuildError`]: construction/validation failures. Programmer-facing,
//!   raised synchronously by payload and frame builders, never swallowed.
//! - [`DecodeError`]: malformed byte streams. An expected runtime condition;
//!   converted into a `MalformedFrame` at the frame-decode boundary instead
//!   of propagating past the caller.
//! - [`CursorError`] / [`JulianDateError`]: low-level causes that only ever
//!   reach callers wrapped inside a [`DecodeError`].
//!
//! Checksum mismatch is deliberately NOT an error type: it is reported as a
//! distinct verification outcome on the decoded frame, since callers may
//! apply different policy to corruption than to malformed structure.

use thiserror::Error;

/// Bounds violation inside the binary cursor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    /// A read ran past the end of the buffer.
    #[error("buffer underflow at offset {position}: needed {needed} bytes, {remaining} remaining")]
    Underflow {
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
        /// Cursor offset when the read was attempted.
        position: usize,
    },
}

/// Failure to parse a 20-byte ASCII Julian-date field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JulianDateError {
    /// Field is not exactly 20 bytes.
    #[error("julian date field must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Required width.
        expected: usize,
        /// Actual width.
        actual: usize,
    },

    /// Field does not parse as `yyyyddd hh:mm:ss.sss`.
    #[error("unparseable julian date: {0:?}")]
    Unparseable(String),
}

/// Construction/validation failure raised by a builder.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    /// A fixed-width string field exceeds its wire width.
    #[error("{field} too long: {actual} bytes exceeds fixed width {max}")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Maximum wire width.
        max: usize,
        /// Actual length supplied.
        actual: usize,
    },

    /// A required string field is empty or all whitespace.
    #[error("{field} must not be blank")]
    BlankField {
        /// Field name.
        field: &'static str,
    },

    /// An identity string contains bytes outside the allowed ASCII set.
    #[error("{field} contains invalid characters")]
    InvalidCharacters {
        /// Field name.
        field: &'static str,
    },

    /// Gap ranges must come in (start, end) pairs.
    #[error("gap ranges must have even length, got {len}")]
    OddGapRanges {
        /// Supplied flattened length.
        len: usize,
    },

    /// Declared gap count disagrees with the flattened range array.
    #[error("gap count {count} does not match {ranges} range values (expected count*2)")]
    GapCountMismatch {
        /// Declared gap count.
        count: u32,
        /// Flattened range array length.
        ranges: usize,
    },

    /// Gap ranges are not sorted, non-overlapping, ascending pairs.
    #[error("gap ranges are not sorted non-overlapping [start, end] pairs")]
    UnorderedGapRanges,

    /// Option value length outside the protocol bounds.
    #[error("option value length {actual} outside [{min}, {max}]")]
    OptionValueLength {
        /// Actual value length.
        actual: usize,
        /// Minimum allowed.
        min: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Data payload requires at least one channel subframe.
    #[error("data payload must contain at least one channel subframe")]
    NoSubframes,

    /// Trailer authentication value length disagrees with the declared size.
    #[error("auth value must be {expected} bytes (padded from size {size}), got {actual}")]
    AuthValueLength {
        /// Required padded length.
        expected: usize,
        /// Declared unpadded size.
        size: u32,
        /// Actual stored length.
        actual: usize,
    },

    /// Channel subframe shorter than the fixed fields allow.
    #[error("channel subframe length {length} below minimum {minimum}")]
    SubframeTooShort {
        /// Declared length including the length field.
        length: u32,
        /// Protocol minimum.
        minimum: u32,
    },

    /// Channel subframe length not aligned to the pad boundary.
    #[error("channel subframe length {length} not divisible by 4")]
    SubframeMisaligned {
        /// Declared length including the length field.
        length: u32,
    },

    /// Authentication offset points outside the subframe.
    #[error("auth offset {offset} exceeds limit {limit}")]
    AuthOffsetOutOfRange {
        /// Declared offset.
        offset: u32,
        /// Highest admissible offset (`channel_length - 4`).
        limit: u32,
    },

    /// Derived end time precedes the subframe timestamp.
    #[error("subframe end time precedes its start time")]
    EndTimeBeforeStart,

    /// Payload too large for the header's 32-bit trailer offset.
    #[error("payload length {actual} exceeds the trailer offset maximum {max}")]
    PayloadTooLarge {
        /// Supplied payload length.
        actual: usize,
        /// Largest payload the 32-bit trailer offset can describe.
        max: usize,
    },

    /// Timestamp year does not fit the 4-digit julian date field.
    #[error("timestamp year {year} cannot be encoded in a 4-digit julian date field")]
    TimestampOutOfRange {
        /// Proleptic Gregorian year of the rejected timestamp.
        year: i32,
    },
}

/// Decode failure for a frame or payload region.
///
/// These never escape `Frame::decode` raw; they travel as the `cause` of a
/// `MalformedFrame`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// The buffer ended before the structure did.
    #[error(transparent)]
    Underflow(#[from] CursorError),

    /// Unknown frame-type code in the header.
    #[error("invalid frame type code: {0}")]
    InvalidFrameType(u32),

    /// Trailer offset smaller than the fixed header length.
    #[error("trailer offset {0} below fixed header length")]
    InvalidTrailerOffset(u32),

    /// A Julian-date field failed to parse.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] JulianDateError),

    /// Decoded fields violate a construction invariant.
    #[error("decoded value failed validation: {0}")]
    Validation(#[from] BuildError),

    /// Option exchange declared a count other than the protocol's fixed 1.
    #[error("unsupported option count: {0} (protocol defines exactly 1)")]
    InvalidOptionCount(u32),

    /// Option exchange carried an unknown option type.
    #[error("unsupported option type: {0}")]
    InvalidOptionType(u32),

    /// Payload did not fill the region the trailer offset describes.
    #[error("payload region mismatch: trailer expected at {expected}, payload ended at {actual}")]
    PayloadLengthMismatch {
        /// Trailer offset from the header.
        expected: usize,
        /// Offset where the payload decoder actually stopped.
        actual: usize,
    },
}
