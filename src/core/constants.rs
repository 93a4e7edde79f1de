//! Protocol constants from the CD-1.1 format specification.
//!
//! These values are fixed by the protocol and MUST NOT be changed.

// =============================================================================
// FRAME ENVELOPE
// =============================================================================

/// Fixed frame header length (type + trailer offset + creator + destination
/// + sequence number + series).
pub const FRAME_HEADER_LENGTH: usize = 36;

/// Fixed portion of the frame trailer (auth key id + auth size + comm
/// verification), excluding the padded authentication value.
pub const FRAME_TRAILER_FIXED_LENGTH: usize = 16;

/// Every variable-length field is padded to this boundary.
pub const PAD_BOUNDARY: usize = 4;

// =============================================================================
// FRAME TYPE CODES
// =============================================================================

/// Connection request frame.
pub const FRAME_TYPE_CONNECTION_REQUEST: u32 = 1;

/// Connection response frame.
pub const FRAME_TYPE_CONNECTION_RESPONSE: u32 = 2;

/// Option request frame.
pub const FRAME_TYPE_OPTION_REQUEST: u32 = 3;

/// Option response frame.
pub const FRAME_TYPE_OPTION_RESPONSE: u32 = 4;

/// Data frame (waveform channel subframes).
pub const FRAME_TYPE_DATA: u32 = 5;

/// Acknack frame (acknowledgment / gap report / heartbeat).
pub const FRAME_TYPE_ACKNACK: u32 = 6;

/// Command request frame.
pub const FRAME_TYPE_COMMAND_REQUEST: u32 = 7;

/// Command response frame.
pub const FRAME_TYPE_COMMAND_RESPONSE: u32 = 8;

/// Alert frame.
pub const FRAME_TYPE_ALERT: u32 = 9;

/// Custom reset frame (non-standard; clears gap state on the consumer).
pub const FRAME_TYPE_CUSTOM_RESET: u32 = 13;

// =============================================================================
// FIXED FIELD WIDTHS
// =============================================================================

/// Frame creator / frame destination width in the header.
pub const FRAME_CREATOR_LENGTH: usize = 8;

/// Frame-set name width in the Acknack payload.
pub const FRAME_SET_NAME_LENGTH: usize = 20;

/// Station name width (command and connection payloads).
pub const STATION_NAME_LENGTH: usize = 8;

/// Station type width (connection exchange).
pub const STATION_TYPE_LENGTH: usize = 4;

/// Service type width (connection exchange).
pub const SERVICE_TYPE_LENGTH: usize = 4;

/// Site name width (subframes and command payloads).
pub const SITE_NAME_LENGTH: usize = 5;

/// Channel name width (subframes and command payloads).
pub const CHANNEL_NAME_LENGTH: usize = 3;

/// Location name width (subframes and command payloads).
pub const LOCATION_NAME_LENGTH: usize = 2;

/// Reserved filler after the location name in command payloads.
pub const COMMAND_RESERVED_LENGTH: usize = 2;

/// Sample data format code width (e.g. "s4").
pub const DATA_FORMAT_LENGTH: usize = 2;

/// Packed channel description width in a channel subframe.
pub const CHANNEL_DESCRIPTION_LENGTH: usize = 4;

/// One site/channel/location triple inside the subframe header's
/// channel string (5 + 3 + 2).
pub const CHANNEL_STRING_ENTRY_LENGTH: usize = 10;

/// ASCII Julian-date timestamp width (`yyyyddd hh:mm:ss.sss`).
pub const JULIAN_DATE_LENGTH: usize = 20;

// =============================================================================
// PAYLOAD SIZES AND BOUNDS
// =============================================================================

/// Connection exchange body length: two u16 versions, 8/4/4-byte identity
/// strings, primary IP + port, secondary IP + port (zero-filled if absent).
pub const CONNECTION_EXCHANGE_LENGTH: usize = 32;

/// Acknack body length before the gap-range array
/// (frame-set name + lowest + highest + gap count).
pub const ACKNACK_FIXED_LENGTH: usize = FRAME_SET_NAME_LENGTH + 8 + 8 + 4;

/// The protocol currently defines exactly one option.
pub const OPTION_COUNT: u32 = 1;

/// Option type code for "connection establishment".
pub const OPTION_TYPE_CONNECTION: u32 = 1;

/// Minimum option value length.
pub const OPTION_VALUE_MIN_LENGTH: usize = 1;

/// Maximum option value length.
pub const OPTION_VALUE_MAX_LENGTH: usize = 8;

/// Minimum channel subframe length including the channel-length field
/// itself (all fixed fields present, every variable block empty).
pub const MINIMUM_SUBFRAME_LENGTH: u32 = 80;
