//! Command request and response payloads.
//!
//! Both share a fixed identification block:
//! ```text
//! +0   Station  (8 bytes, null-padded ASCII)
//! +8   Site     (5 bytes)
//! +13  Channel  (3 bytes)
//! +16  Location (2 bytes)
//! +18  Reserved (2 null bytes)
//! +20  Timestamp (20 bytes, Julian date)
//! ```
//! followed by one (request) or two (response, which echoes the request
//! text) length-prefixed message strings padded to the 4-byte boundary.

use chrono::NaiveDateTime;

use crate::core::constants::{
    CHANNEL_NAME_LENGTH, COMMAND_RESERVED_LENGTH, JULIAN_DATE_LENGTH, LOCATION_NAME_LENGTH,
    SITE_NAME_LENGTH, STATION_NAME_LENGTH,
};
use crate::core::{BuildError, DecodeError};
use crate::frame::check_width;
use crate::wire::{ByteReader, ByteWriter, check_julian_encodable, format_julian, parse_julian};

/// Channel identification shared by both command payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    /// Station name (max 8 bytes).
    pub station: String,
    /// Site name (max 5 bytes).
    pub site: String,
    /// Channel name (max 3 bytes).
    pub channel: String,
    /// Location name (max 2 bytes; may be empty).
    pub location: String,
}

impl CommandTarget {
    /// Build a target, checking each field against its wire width.
    pub fn new(
        station: &str,
        site: &str,
        channel: &str,
        location: &str,
    ) -> Result<Self, BuildError> {
        check_width("station name", station, STATION_NAME_LENGTH)?;
        check_width("site name", site, SITE_NAME_LENGTH)?;
        check_width("channel name", channel, CHANNEL_NAME_LENGTH)?;
        check_width("location name", location, LOCATION_NAME_LENGTH)?;

        Ok(Self {
            station: station.to_owned(),
            site: site.to_owned(),
            channel: channel.to_owned(),
            location: location.to_owned(),
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.station, STATION_NAME_LENGTH);
        writer.write_string(&self.site, SITE_NAME_LENGTH);
        writer.write_string(&self.channel, CHANNEL_NAME_LENGTH);
        writer.write_string(&self.location, LOCATION_NAME_LENGTH);
        writer.write_bytes(&[0u8; COMMAND_RESERVED_LENGTH]);
    }

    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let station = reader.read_string(STATION_NAME_LENGTH)?;
        let site = reader.read_string(SITE_NAME_LENGTH)?;
        let channel = reader.read_string(CHANNEL_NAME_LENGTH)?;
        let location = reader.read_string(LOCATION_NAME_LENGTH)?;
        reader.skip(COMMAND_RESERVED_LENGTH)?;
        Ok(Self::new(&station, &site, &channel, &location)?)
    }
}

fn check_message(field: &'static str, message: &str) -> Result<(), BuildError> {
    if message.trim().is_empty() {
        return Err(BuildError::BlankField { field });
    }
    Ok(())
}

fn write_message(writer: &mut ByteWriter, message: &str) {
    writer.write_u32(message.len() as u32);
    writer.write_padded(message.as_bytes());
}

fn read_message(reader: &mut ByteReader<'_>) -> Result<String, DecodeError> {
    let size = reader.read_u32()? as usize;
    let raw = reader.read_padded(size)?;
    Ok(String::from_utf8_lossy(raw).into_owned())
}

/// Command request payload: a command sent to a station's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Addressed channel.
    pub target: CommandTarget,
    /// When the command was issued.
    pub time_stamp: NaiveDateTime,
    /// Command text; must not be blank.
    pub message: String,
}

impl CommandRequest {
    /// Build a command request.
    pub fn new(
        target: CommandTarget,
        time_stamp: NaiveDateTime,
        message: &str,
    ) -> Result<Self, BuildError> {
        check_julian_encodable(time_stamp)?;
        check_message("command message", message)?;
        Ok(Self { target, time_stamp, message: message.to_owned() })
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        self.target.encode(writer);
        writer.write_bytes(&format_julian(self.time_stamp));
        write_message(writer, &self.message);
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let target = CommandTarget::decode(reader)?;
        let time_stamp = parse_julian(reader.read_bytes(JULIAN_DATE_LENGTH)?)?;
        let message = read_message(reader)?;
        Ok(Self::new(target, time_stamp, &message)?)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}

/// Command response payload: echoes the request text alongside the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    /// Responding channel.
    pub target: CommandTarget,
    /// When the response was produced.
    pub time_stamp: NaiveDateTime,
    /// The original command text; must not be blank.
    pub request_message: String,
    /// The station's response text; must not be blank.
    pub response_message: String,
}

impl CommandResponse {
    /// Build a command response.
    pub fn new(
        target: CommandTarget,
        time_stamp: NaiveDateTime,
        request_message: &str,
        response_message: &str,
    ) -> Result<Self, BuildError> {
        check_julian_encodable(time_stamp)?;
        check_message("request message", request_message)?;
        check_message("response message", response_message)?;
        Ok(Self {
            target,
            time_stamp,
            request_message: request_message.to_owned(),
            response_message: response_message.to_owned(),
        })
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        self.target.encode(writer);
        writer.write_bytes(&format_julian(self.time_stamp));
        write_message(writer, &self.request_message);
        write_message(writer, &self.response_message);
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let target = CommandTarget::decode(reader)?;
        let time_stamp = parse_julian(reader.read_bytes(JULIAN_DATE_LENGTH)?)?;
        let request_message = read_message(reader)?;
        let response_message = read_message(reader)?;
        Ok(Self::new(target, time_stamp, &request_message, &response_message)?)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn target() -> CommandTarget {
        CommandTarget::new("KURK", "KUR01", "BHZ", "01").unwrap()
    }

    fn time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 4)
            .unwrap()
            .and_hms_milli_opt(12, 0, 1, 500)
            .unwrap()
    }

    #[test]
    fn test_request_round_trip() {
        let request = CommandRequest::new(target(), time(), "calibrate").unwrap();
        let parsed = CommandRequest::from_bytes(&request.to_bytes()).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_response_round_trip() {
        let response =
            CommandResponse::new(target(), time(), "calibrate", "calibration started").unwrap();
        let parsed = CommandResponse::from_bytes(&response.to_bytes()).unwrap();
        assert_eq!(parsed, response);
    }

    #[test]
    fn test_fixed_block_layout() {
        let request = CommandRequest::new(target(), time(), "x").unwrap();
        let bytes = request.to_bytes();
        assert_eq!(&bytes[0..8], b"KURK\0\0\0\0");
        assert_eq!(&bytes[8..13], b"KUR01");
        assert_eq!(&bytes[13..16], b"BHZ");
        assert_eq!(&bytes[16..18], b"01");
        assert_eq!(&bytes[18..20], &[0, 0]);
        // 20-byte timestamp, then size-prefixed message
        assert_eq!(u32::from_be_bytes(bytes[40..44].try_into().unwrap()), 1);
        assert_eq!(bytes.len(), 44 + 4);
    }

    #[test]
    fn test_reject_blank_message() {
        let err = CommandRequest::new(target(), time(), "   ").unwrap_err();
        assert_eq!(err, BuildError::BlankField { field: "command message" });

        let err = CommandResponse::new(target(), time(), "ok", "").unwrap_err();
        assert_eq!(err, BuildError::BlankField { field: "response message" });
    }

    #[test]
    fn test_reject_wide_fields() {
        assert!(matches!(
            CommandTarget::new("STATION09", "KUR01", "BHZ", "01"),
            Err(BuildError::FieldTooLong { field: "station name", .. })
        ));
        assert!(matches!(
            CommandTarget::new("KURK", "KUR01", "BHZZ", "01"),
            Err(BuildError::FieldTooLong { field: "channel name", .. })
        ));
    }

    #[test]
    fn test_empty_location_tolerated() {
        let target = CommandTarget::new("KURK", "KUR01", "BHZ", "").unwrap();
        let request = CommandRequest::new(target, time(), "status").unwrap();
        let parsed = CommandRequest::from_bytes(&request.to_bytes()).unwrap();
        assert_eq!(parsed.target.location, "");
    }

    #[test]
    fn test_reject_unencodable_year() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(
            CommandRequest::new(target(), far, "status").unwrap_err(),
            BuildError::TimestampOutOfRange { year: 10_000 }
        );
        assert_eq!(
            CommandResponse::new(target(), far, "status", "ok").unwrap_err(),
            BuildError::TimestampOutOfRange { year: 10_000 }
        );
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let request = CommandRequest::new(target(), time(), "status").unwrap();
        let mut bytes = request.to_bytes();
        bytes[20..40].copy_from_slice(b"XXXXXXX XXXXXXXXXXXX");

        assert!(matches!(
            CommandRequest::from_bytes(&bytes),
            Err(DecodeError::InvalidTimestamp(_))
        ));
    }
}
