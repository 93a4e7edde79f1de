//! Channel subframe header: the block that opens every Data payload.
//!
//! Wire format:
//! ```text
//! +0   Num Channels         (4 bytes)
//! +4   Frame Time Length    (4 bytes, milliseconds)
//! +8   Nominal Time         (20 bytes, Julian date)
//! +28  Channel String Count (4 bytes, unpadded)
//! +32  Channel String       (count bytes of 5+3+2 triples, padded to 4)
//! ```
//!
//! The channel string is descriptive only; the authoritative channel list is
//! the subframes that follow. Legacy producers are known to emit malformed
//! triples and ambiguous padding, so this decoder logs and continues instead
//! of failing.

use chrono::NaiveDateTime;

use crate::core::constants::{
    CHANNEL_NAME_LENGTH, CHANNEL_STRING_ENTRY_LENGTH, JULIAN_DATE_LENGTH, LOCATION_NAME_LENGTH,
    SITE_NAME_LENGTH,
};
use crate::core::{BuildError, DecodeError};
use crate::frame::check_width;
use crate::wire::{
    ByteReader, ByteWriter, check_julian_encodable, format_julian, pad_length, parse_julian,
};

/// A site/channel/location identification triple (10 bytes on the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelName {
    /// Site name (max 5 bytes, must not be blank).
    pub site: String,
    /// Channel name (max 3 bytes, must not be blank).
    pub channel: String,
    /// Location name (max 2 bytes; legacy producers may omit it).
    pub location: String,
}

impl ChannelName {
    /// Build a channel name, checking widths and requiring site/channel.
    pub fn new(site: &str, channel: &str, location: &str) -> Result<Self, BuildError> {
        let name = Self {
            site: site.to_owned(),
            channel: channel.to_owned(),
            location: location.to_owned(),
        };
        name.validate()?;
        Ok(name)
    }

    /// Check widths and the non-blank site/channel requirement.
    ///
    /// An empty location passes: producers in the field omit it, and the
    /// format reserves the bytes either way.
    pub fn validate(&self) -> Result<(), BuildError> {
        check_width("site name", &self.site, SITE_NAME_LENGTH)?;
        check_width("channel name", &self.channel, CHANNEL_NAME_LENGTH)?;
        check_width("location name", &self.location, LOCATION_NAME_LENGTH)?;
        if self.site.trim().is_empty() {
            return Err(BuildError::BlankField { field: "site name" });
        }
        if self.channel.trim().is_empty() {
            return Err(BuildError::BlankField { field: "channel name" });
        }
        Ok(())
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.site, SITE_NAME_LENGTH);
        writer.write_string(&self.channel, CHANNEL_NAME_LENGTH);
        writer.write_string(&self.location, LOCATION_NAME_LENGTH);
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let site = reader.read_string(SITE_NAME_LENGTH)?;
        let channel = reader.read_string(CHANNEL_NAME_LENGTH)?;
        let location = reader.read_string(LOCATION_NAME_LENGTH)?;
        Ok(Self { site, channel, location })
    }
}

/// Header block preceding the channel subframes in a Data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSubframeHeader {
    /// Number of subframes that follow this header.
    pub num_channels: u32,
    /// Nominal duration covered by the frame, in milliseconds.
    pub frame_time_length: u32,
    /// Nominal start time of the frame.
    pub nominal_time: NaiveDateTime,
    /// Channel triples advertised in the channel string.
    pub channel_names: Vec<ChannelName>,
}

impl ChannelSubframeHeader {
    /// Build a header; `num_channels` is derived from the name list.
    pub fn new(
        frame_time_length: u32,
        nominal_time: NaiveDateTime,
        channel_names: Vec<ChannelName>,
    ) -> Result<Self, BuildError> {
        check_julian_encodable(nominal_time)?;
        for name in &channel_names {
            name.validate()?;
        }
        Ok(Self {
            num_channels: channel_names.len() as u32,
            frame_time_length,
            nominal_time,
            channel_names,
        })
    }

    /// Encoded length, including channel-string padding.
    pub fn wire_length(&self) -> usize {
        let count = self.channel_names.len() * CHANNEL_STRING_ENTRY_LENGTH;
        12 + JULIAN_DATE_LENGTH + count + pad_length(count)
    }

    /// Serialize the header block.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.num_channels);
        writer.write_u32(self.frame_time_length);
        writer.write_bytes(&format_julian(self.nominal_time));

        let count = self.channel_names.len() * CHANNEL_STRING_ENTRY_LENGTH;
        writer.write_u32(count as u32);
        for name in &self.channel_names {
            name.encode(writer);
        }
        writer.write_bytes(&vec![0u8; pad_length(count)]);
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.wire_length());
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode the header block from the reader's current position.
    ///
    /// Malformed channel triples and mismatched counts are logged, not
    /// fatal: the subframes that follow are the authoritative channel list.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let num_channels = reader.read_u32()?;
        let frame_time_length = reader.read_u32()?;
        let nominal_time = parse_julian(reader.read_bytes(JULIAN_DATE_LENGTH)?)?;

        let string_count = reader.read_u32()? as usize;
        if string_count % CHANNEL_STRING_ENTRY_LENGTH != 0 {
            tracing::warn!(
                string_count,
                "channel string length is not a multiple of {}",
                CHANNEL_STRING_ENTRY_LENGTH
            );
        }

        let raw = reader.read_bytes(string_count)?.to_vec();
        let mut channel_names = Vec::with_capacity(string_count / CHANNEL_STRING_ENTRY_LENGTH);
        for chunk in raw.chunks_exact(CHANNEL_STRING_ENTRY_LENGTH) {
            let name = ChannelName::decode(&mut ByteReader::new(chunk))?;
            if let Err(error) = name.validate() {
                tracing::warn!(%error, "malformed channel string entry");
            }
            channel_names.push(name);
        }

        if channel_names.len() as u32 != num_channels {
            tracing::warn!(
                num_channels,
                advertised = channel_names.len(),
                "channel string disagrees with declared channel count"
            );
        }

        Self::skip_channel_string_padding(reader, string_count);

        Ok(Self { num_channels, frame_time_length, nominal_time, channel_names })
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }

    /// Best-effort consumption of channel-string padding.
    ///
    /// The legacy format is ambiguous about whether this padding is present:
    /// peek the would-be pad bytes, and consume them only if they are all
    /// zero. Anything else is assumed to be the first subframe's length
    /// field, so the cursor stays put and a warning is logged.
    fn skip_channel_string_padding(reader: &mut ByteReader<'_>, string_count: usize) {
        let pad = pad_length(string_count);
        if pad == 0 {
            return;
        }
        match reader.peek_bytes(pad) {
            Some(bytes) if bytes.iter().all(|&b| b == 0) => {
                // Cannot underflow: peek just proved the bytes are there.
                let _ = reader.skip(pad);
            }
            _ => {
                tracing::warn!(pad, "channel string padding absent or non-zero, leaving cursor");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn nominal() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2005, 1, 17)
            .unwrap()
            .and_hms_milli_opt(9, 32, 45, 123)
            .unwrap()
    }

    fn names() -> Vec<ChannelName> {
        vec![
            ChannelName::new("KUR01", "BHZ", "01").unwrap(),
            ChannelName::new("KUR02", "BHN", "").unwrap(),
        ]
    }

    #[test]
    fn test_round_trip() {
        let header = ChannelSubframeHeader::new(10_000, nominal(), names()).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), header.wire_length());

        let parsed = ChannelSubframeHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.num_channels, 2);
    }

    #[test]
    fn test_channel_string_is_padded() {
        let header = ChannelSubframeHeader::new(10_000, nominal(), names()).unwrap();
        let bytes = header.to_bytes();

        // 2 triples = 20 bytes string, no padding; fixed part is 32 bytes
        assert_eq!(u32::from_be_bytes(bytes[28..32].try_into().unwrap()), 20);
        assert_eq!(bytes.len(), 32 + 20);

        let one = ChannelSubframeHeader::new(
            10_000,
            nominal(),
            vec![ChannelName::new("KUR01", "BHZ", "01").unwrap()],
        )
        .unwrap();
        // 10-byte string pads to 12
        assert_eq!(one.to_bytes().len(), 32 + 12);
    }

    #[test]
    fn test_missing_padding_leaves_cursor() {
        let header = ChannelSubframeHeader::new(
            2_000,
            nominal(),
            vec![ChannelName::new("KUR01", "BHZ", "01").unwrap()],
        )
        .unwrap();
        let mut bytes = header.to_bytes();
        // Replace the 2 pad bytes with the start of a fake subframe length
        let len = bytes.len();
        bytes[len - 2..].copy_from_slice(&[0x01, 0x02]);

        let mut reader = ByteReader::new(&bytes);
        let parsed = ChannelSubframeHeader::decode(&mut reader).unwrap();
        assert_eq!(parsed.channel_names, header.channel_names);
        // The non-zero tail was not consumed
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_reject_unencodable_nominal_time() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert!(matches!(
            ChannelSubframeHeader::new(2_000, far, names()),
            Err(BuildError::TimestampOutOfRange { year: 10_000 })
        ));
    }

    #[test]
    fn test_blank_site_rejected_on_build() {
        assert!(matches!(
            ChannelName::new("  ", "BHZ", "01"),
            Err(BuildError::BlankField { field: "site name" })
        ));
        assert!(matches!(
            ChannelName::new("KUR01", "", "01"),
            Err(BuildError::BlankField { field: "channel name" })
        ));
    }

    #[test]
    fn test_malformed_entry_tolerated_on_decode() {
        let header = ChannelSubframeHeader::new(2_000, nominal(), names()).unwrap();
        let mut bytes = header.to_bytes();
        // Blank out the first triple's site name
        bytes[32..37].copy_from_slice(&[0u8; 5]);

        let parsed = ChannelSubframeHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.channel_names.len(), 2);
        assert_eq!(parsed.channel_names[0].site, "");
        assert_eq!(parsed.channel_names[1].site, "KUR02");
    }

    #[test]
    fn test_truncated_header_underflows() {
        let header = ChannelSubframeHeader::new(2_000, nominal(), names()).unwrap();
        let mut bytes = header.to_bytes();
        bytes.truncate(30);

        assert!(matches!(
            ChannelSubframeHeader::from_bytes(&bytes),
            Err(DecodeError::Underflow(_))
        ));
    }
}
