//! Data payload: a channel subframe header followed by the subframes.

use chrono::NaiveDateTime;

use crate::core::{BuildError, DecodeError};
use crate::payload::{ChannelSubframe, ChannelSubframeHeader};
use crate::wire::{ByteReader, ByteWriter};

/// Data payload body: waveform samples for one or more channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    /// Header block; its channel string is derived from the subframes.
    pub header: ChannelSubframeHeader,
    /// One subframe per channel, in wire order.
    pub subframes: Vec<ChannelSubframe>,
}

impl Data {
    /// Build a Data payload; the header's channel string and count are
    /// derived from the subframes so the two can never disagree.
    pub fn new(
        frame_time_length: u32,
        nominal_time: NaiveDateTime,
        subframes: Vec<ChannelSubframe>,
    ) -> Result<Self, BuildError> {
        if subframes.is_empty() {
            return Err(BuildError::NoSubframes);
        }

        let names = subframes.iter().map(|s| s.name.clone()).collect();
        let header = ChannelSubframeHeader::new(frame_time_length, nominal_time, names)?;
        Ok(Self { header, subframes })
    }

    /// Total encoded length.
    pub fn wire_length(&self) -> usize {
        self.header.wire_length() + self.subframes.iter().map(ChannelSubframe::wire_length).sum::<usize>()
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        self.header.encode(writer);
        for subframe in &self.subframes {
            subframe.encode(writer);
        }
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.wire_length());
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    ///
    /// The header's declared channel count drives how many subframes are
    /// read; the header is kept as decoded even when its channel string
    /// disagrees with the subframes (that mismatch is logged, not fatal).
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let header = ChannelSubframeHeader::decode(reader)?;
        if header.num_channels == 0 {
            return Err(BuildError::NoSubframes.into());
        }

        // No preallocation from the declared count: a hostile count hits
        // underflow before it can exhaust memory.
        let mut subframes = Vec::new();
        for _ in 0..header.num_channels {
            subframes.push(ChannelSubframe::decode(reader)?);
        }

        Ok(Self { header, subframes })
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
    use crate::payload::{ChannelDescription, ChannelName};

    fn time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 4)
            .unwrap()
            .and_hms_milli_opt(12, 0, 0, 0)
            .unwrap()
    }

    fn subframe(site: &str, channel: &str) -> ChannelSubframe {
        ChannelSubframe::new(
            ChannelDescription::default(),
            ChannelName::new(site, channel, "01").unwrap(),
            "s4",
            1.0,
            1.0,
            time(),
            10_000,
            400,
            vec![0; 4],
            vec![0x22; 1600],
            1,
            0,
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let data = Data::new(
            10_000,
            time(),
            vec![subframe("KUR01", "BHZ"), subframe("KUR02", "BHN")],
        )
        .unwrap();

        let bytes = data.to_bytes();
        assert_eq!(bytes.len(), data.wire_length());

        let parsed = Data::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, data);
        assert_eq!(parsed.header.num_channels, 2);
        assert_eq!(parsed.subframes.len(), 2);
    }

    #[test]
    fn test_header_derived_from_subframes() {
        let data = Data::new(10_000, time(), vec![subframe("KUR01", "BHZ")]).unwrap();
        assert_eq!(data.header.num_channels, 1);
        assert_eq!(data.header.channel_names[0].site, "KUR01");
        assert_eq!(data.header.channel_names[0].channel, "BHZ");
    }

    #[test]
    fn test_reject_empty() {
        assert!(matches!(Data::new(10_000, time(), vec![]), Err(BuildError::NoSubframes)));
    }

    #[test]
    fn test_reject_zero_channels_on_decode() {
        let data = Data::new(10_000, time(), vec![subframe("KUR01", "BHZ")]).unwrap();
        let mut bytes = data.to_bytes();
        bytes[0..4].copy_from_slice(&0u32.to_be_bytes());

        assert!(matches!(
            Data::from_bytes(&bytes),
            Err(DecodeError::Validation(BuildError::NoSubframes))
        ));
    }

    #[test]
    fn test_hostile_channel_count_underflows() {
        use crate::wire::{ByteWriter, format_julian};

        // A header claiming u32::MAX channels over an empty channel string
        let mut writer = ByteWriter::new();
        writer.write_u32(u32::MAX);
        writer.write_u32(10_000);
        writer.write_bytes(&format_julian(time()));
        writer.write_u32(0);

        assert!(matches!(
            Data::from_bytes(&writer.into_bytes()),
            Err(DecodeError::Underflow(_))
        ));
    }

    #[test]
    fn test_truncated_subframe_underflows() {
        let data = Data::new(10_000, time(), vec![subframe("KUR01", "BHZ")]).unwrap();
        let mut bytes = data.to_bytes();
        bytes.truncate(bytes.len() - 100);

        assert!(matches!(
            Data::from_bytes(&bytes),
            Err(DecodeError::Underflow(_))
        ));
    }
}
