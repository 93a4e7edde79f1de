//! Channel subframe codec: one channel's samples inside a Data payload.
//!
//! Wire format:
//! ```text
//! +0   Channel Length   (4 bytes, subframe length excluding this field)
//! +4   Auth Offset      (4 bytes, from subframe start to Auth Key Id)
//! +8   Description      (4 bytes: auth flag, compression, sensor, calib)
//! +12  Site             (5 bytes)   Channel (3 bytes)   Location (2 bytes)
//! +22  Data Format      (2 bytes, e.g. "s4")
//! +24  Calib Factor     (4 bytes, f32)
//! +28  Calib Period     (4 bytes, f32)
//! +32  Timestamp        (20 bytes, Julian date)
//! +52  Time Length      (4 bytes, milliseconds)
//! +56  Samples          (4 bytes)
//! +60  Status Size      (4 bytes) + status bytes padded to 4
//! +..  Data Size        (4 bytes) + sample bytes padded to 4
//! +..  Subframe Count   (4 bytes)
//! +..  Auth Key Id      (4 bytes)
//! +..  Auth Size        (4 bytes) + signature bytes padded to 4
//! ```
//!
//! `sample_rate` and `end_time` are derived at construction and never
//! settable, so they cannot drift from the stored sample count and time
//! length. The sample period is truncated to whole microseconds; with 100
//! samples over 1000 ms the last sample lands at +990 ms, one period short
//! of the nominal length.

use chrono::{Duration, NaiveDateTime};

use crate::core::constants::{
    DATA_FORMAT_LENGTH, JULIAN_DATE_LENGTH, MINIMUM_SUBFRAME_LENGTH,
};
use crate::core::{BuildError, DecodeError};
use crate::frame::check_width;
use crate::payload::ChannelName;
use crate::wire::{
    ByteReader, ByteWriter, check_julian_encodable, format_julian, padded_length, parse_julian,
};

/// Fixed bytes from the channel-length field through the sample count.
const FIXED_THROUGH_SAMPLES: usize = 60;

/// The five u32 fields after the sample count: status size, data size,
/// subframe count, auth key id, auth size.
const FIXED_AFTER_SAMPLES: usize = 20;

/// Packed 4-byte channel description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelDescription {
    /// Non-zero when the subframe carries an authentication signature.
    pub authentication: u8,
    /// Sample compression format code.
    pub compression: u8,
    /// Sensor type code.
    pub sensor_type: u8,
    /// Non-zero when the calibration factor/period are meaningful.
    pub calibration: u8,
}

impl ChannelDescription {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.authentication);
        writer.write_u8(self.compression);
        writer.write_u8(self.sensor_type);
        writer.write_u8(self.calibration);
    }

    fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            authentication: reader.read_u8()?,
            compression: reader.read_u8()?,
            sensor_type: reader.read_u8()?,
            calibration: reader.read_u8()?,
        })
    }
}

/// One channel's worth of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSubframe {
    /// Packed description flags.
    pub description: ChannelDescription,
    /// Site/channel/location identification.
    pub name: ChannelName,
    /// Sample encoding code (max 2 bytes, e.g. "s4").
    pub data_format: String,
    /// Calibration factor.
    pub calibration_factor: f32,
    /// Calibration period, seconds.
    pub calibration_period: f32,
    /// Time of the first sample.
    pub time_stamp: NaiveDateTime,
    /// Duration covered by the samples, in milliseconds.
    pub subframe_time_length: u32,
    /// Number of samples in the data block.
    pub samples: u32,
    /// Channel status bytes (opaque to the codec).
    pub channel_status: Vec<u8>,
    /// Sample data in `data_format` encoding (opaque to the codec).
    pub data: Vec<u8>,
    /// Producer-assigned subframe counter.
    pub subframe_count: u32,
    /// Key identifier for the authentication signature.
    pub auth_key_id: u32,
    /// Authentication signature bytes (empty when unauthenticated).
    pub auth_value: Vec<u8>,

    // Derived at construction, immutable afterwards.
    sample_rate: f64,
    end_time: NaiveDateTime,
}

impl ChannelSubframe {
    /// Build a subframe, deriving `sample_rate` and `end_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        description: ChannelDescription,
        name: ChannelName,
        data_format: &str,
        calibration_factor: f32,
        calibration_period: f32,
        time_stamp: NaiveDateTime,
        subframe_time_length: u32,
        samples: u32,
        channel_status: Vec<u8>,
        data: Vec<u8>,
        subframe_count: u32,
        auth_key_id: u32,
        auth_value: Vec<u8>,
    ) -> Result<Self, BuildError> {
        name.validate()?;
        check_width("data format", data_format, DATA_FORMAT_LENGTH)?;
        check_julian_encodable(time_stamp)?;

        let sample_rate = derive_sample_rate(samples, subframe_time_length);
        let end_time = derive_end_time(time_stamp, samples, subframe_time_length);
        if end_time < time_stamp {
            return Err(BuildError::EndTimeBeforeStart);
        }

        Ok(Self {
            description,
            name,
            data_format: data_format.to_owned(),
            calibration_factor,
            calibration_period,
            time_stamp,
            subframe_time_length,
            samples,
            channel_status,
            data,
            subframe_count,
            auth_key_id,
            auth_value,
            sample_rate,
            end_time,
        })
    }

    /// Samples per second, derived from the sample count and time length.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Time of the last sample: one sample period short of
    /// `time_stamp + subframe_time_length`.
    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    /// Declared subframe length, excluding the channel-length field itself.
    pub fn channel_length(&self) -> u32 {
        (FIXED_THROUGH_SAMPLES + FIXED_AFTER_SAMPLES - 4
            + padded_length(self.channel_status.len())
            + padded_length(self.data.len())
            + padded_length(self.auth_value.len())) as u32
    }

    /// Offset from the subframe start to the Auth Key Id field.
    pub fn auth_offset(&self) -> u32 {
        // Status size + status block + data size + data block + subframe
        // count sit between the sample count and the auth key id.
        (FIXED_THROUGH_SAMPLES + 12
            + padded_length(self.channel_status.len())
            + padded_length(self.data.len())) as u32
    }

    /// Total encoded length, including the channel-length field.
    pub fn wire_length(&self) -> usize {
        self.channel_length() as usize + 4
    }

    /// Serialize the subframe.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.channel_length());
        writer.write_u32(self.auth_offset());
        self.description.encode(writer);
        self.name.encode(writer);
        writer.write_string(&self.data_format, DATA_FORMAT_LENGTH);
        writer.write_f32(self.calibration_factor);
        writer.write_f32(self.calibration_period);
        writer.write_bytes(&format_julian(self.time_stamp));
        writer.write_u32(self.subframe_time_length);
        writer.write_u32(self.samples);
        writer.write_u32(self.channel_status.len() as u32);
        writer.write_padded(&self.channel_status);
        writer.write_u32(self.data.len() as u32);
        writer.write_padded(&self.data);
        writer.write_u32(self.subframe_count);
        writer.write_u32(self.auth_key_id);
        writer.write_u32(self.auth_value.len() as u32);
        writer.write_padded(&self.auth_value);
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.wire_length());
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode a subframe from the reader's current position.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let channel_length = reader.read_u32()?;
        let auth_offset = reader.read_u32()?;

        if (channel_length as u64 + 4) < MINIMUM_SUBFRAME_LENGTH as u64 {
            return Err(BuildError::SubframeTooShort {
                length: channel_length + 4,
                minimum: MINIMUM_SUBFRAME_LENGTH,
            }
            .into());
        }
        if channel_length % 4 != 0 {
            return Err(BuildError::SubframeMisaligned { length: channel_length }.into());
        }
        let limit = channel_length - 4;
        if auth_offset > limit {
            return Err(BuildError::AuthOffsetOutOfRange { offset: auth_offset, limit }.into());
        }

        let description = ChannelDescription::decode(reader)?;
        let name = ChannelName::decode(reader)?;
        if name.location.is_empty() {
            tracing::debug!(site = %name.site, channel = %name.channel, "missing location name");
        }
        let data_format = reader.read_string(DATA_FORMAT_LENGTH)?;
        let calibration_factor = reader.read_f32()?;
        let calibration_period = reader.read_f32()?;
        let time_stamp = parse_julian(reader.read_bytes(JULIAN_DATE_LENGTH)?)?;
        let subframe_time_length = reader.read_u32()?;
        let samples = reader.read_u32()?;

        let status_size = reader.read_u32()? as usize;
        let channel_status = reader.read_padded(status_size)?.to_vec();
        let data_size = reader.read_u32()? as usize;
        let data = reader.read_padded(data_size)?.to_vec();
        let subframe_count = reader.read_u32()?;
        let auth_key_id = reader.read_u32()?;
        let auth_size = reader.read_u32()? as usize;
        let auth_value = reader.read_padded(auth_size)?.to_vec();

        let subframe = Self::new(
            description,
            name,
            &data_format,
            calibration_factor,
            calibration_period,
            time_stamp,
            subframe_time_length,
            samples,
            channel_status,
            data,
            subframe_count,
            auth_key_id,
            auth_value,
        )?;

        // The structure is self-describing; declared offsets that disagree
        // with it come from sloppy producers and are logged, not fatal.
        if channel_length != subframe.channel_length() {
            tracing::warn!(
                declared = channel_length,
                actual = subframe.channel_length(),
                "channel length field disagrees with subframe contents"
            );
        }
        if auth_offset != subframe.auth_offset() {
            tracing::warn!(
                declared = auth_offset,
                actual = subframe.auth_offset(),
                "auth offset field disagrees with subframe contents"
            );
        }

        Ok(subframe)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}

fn derive_sample_rate(samples: u32, time_length_ms: u32) -> f64 {
    if time_length_ms == 0 {
        return 0.0;
    }
    f64::from(samples) / f64::from(time_length_ms) * 1000.0
}

fn derive_end_time(time_stamp: NaiveDateTime, samples: u32, time_length_ms: u32) -> NaiveDateTime {
    if samples == 0 {
        return time_stamp + Duration::milliseconds(i64::from(time_length_ms));
    }
    // Whole-microsecond sample period; the last sample sits one period
    // short of the nominal subframe length.
    let period_us = i64::from(time_length_ms) * 1000 / i64::from(samples);
    time_stamp + Duration::microseconds(i64::from(samples - 1) * period_us)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 4)
            .unwrap()
            .and_hms_milli_opt(12, 0, 0, 0)
            .unwrap()
    }

    fn sample_subframe() -> ChannelSubframe {
        ChannelSubframe::new(
            ChannelDescription { authentication: 1, compression: 0, sensor_type: 1, calibration: 0 },
            ChannelName::new("KUR01", "BHZ", "01").unwrap(),
            "s4",
            1.0,
            1.0,
            time(),
            1000,
            100,
            vec![0xA5; 5],
            vec![0x11; 400],
            7,
            3,
            vec![0xEE; 10],
        )
        .unwrap()
    }

    #[test]
    fn test_derived_fields() {
        let subframe = sample_subframe();
        assert_eq!(subframe.sample_rate(), 100.0);
        assert_eq!(subframe.end_time(), time() + Duration::milliseconds(990));
    }

    #[test]
    fn test_zero_samples_derivation() {
        let subframe = ChannelSubframe::new(
            ChannelDescription::default(),
            ChannelName::new("KUR01", "BHZ", "").unwrap(),
            "s4",
            0.0,
            0.0,
            time(),
            1000,
            0,
            vec![],
            vec![],
            0,
            0,
            vec![],
        )
        .unwrap();
        assert_eq!(subframe.sample_rate(), 0.0);
        assert_eq!(subframe.end_time(), time() + Duration::milliseconds(1000));
    }

    #[test]
    fn test_declared_lengths() {
        let subframe = sample_subframe();
        // status 5 -> 8, data 400 -> 400, auth 10 -> 12
        assert_eq!(subframe.auth_offset(), 72 + 8 + 400);
        assert_eq!(subframe.channel_length(), 76 + 8 + 400 + 12);
        assert_eq!(subframe.wire_length(), subframe.to_bytes().len());
    }

    #[test]
    fn test_round_trip() {
        let subframe = sample_subframe();
        let parsed = ChannelSubframe::from_bytes(&subframe.to_bytes()).unwrap();
        assert_eq!(parsed, subframe);
        assert_eq!(parsed.sample_rate(), subframe.sample_rate());
        assert_eq!(parsed.end_time(), subframe.end_time());
    }

    #[test]
    fn test_minimum_length_enforced() {
        let mut bytes = sample_subframe().to_bytes();
        bytes[0..4].copy_from_slice(&40u32.to_be_bytes());

        assert!(matches!(
            ChannelSubframe::from_bytes(&bytes),
            Err(DecodeError::Validation(BuildError::SubframeTooShort { length: 44, .. }))
        ));
    }

    #[test]
    fn test_alignment_enforced() {
        let mut bytes = sample_subframe().to_bytes();
        bytes[0..4].copy_from_slice(&497u32.to_be_bytes());

        assert!(matches!(
            ChannelSubframe::from_bytes(&bytes),
            Err(DecodeError::Validation(BuildError::SubframeMisaligned { length: 497 }))
        ));
    }

    #[test]
    fn test_auth_offset_bound_enforced() {
        let subframe = sample_subframe();
        let mut bytes = subframe.to_bytes();
        let bad = subframe.channel_length(); // limit is channel_length - 4
        bytes[4..8].copy_from_slice(&bad.to_be_bytes());

        assert!(matches!(
            ChannelSubframe::from_bytes(&bytes),
            Err(DecodeError::Validation(BuildError::AuthOffsetOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_empty_location_tolerated() {
        let mut subframe = sample_subframe();
        subframe.name.location = String::new();
        let reencoded = subframe.to_bytes();

        let parsed = ChannelSubframe::from_bytes(&reencoded).unwrap();
        assert_eq!(parsed.name.location, "");
    }

    #[test]
    fn test_reject_unencodable_year() {
        let far = NaiveDate::from_ymd_opt(12_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let result = ChannelSubframe::new(
            ChannelDescription::default(),
            ChannelName::new("KUR01", "BHZ", "01").unwrap(),
            "s4",
            1.0,
            1.0,
            far,
            1000,
            100,
            vec![],
            vec![],
            0,
            0,
            vec![],
        );
        assert!(matches!(result, Err(BuildError::TimestampOutOfRange { year: 12_000 })));
    }

    #[test]
    fn test_blank_site_rejected() {
        let mut bytes = sample_subframe().to_bytes();
        bytes[12..17].copy_from_slice(&[0u8; 5]);

        assert!(matches!(
            ChannelSubframe::from_bytes(&bytes),
            Err(DecodeError::Validation(BuildError::BlankField { field: "site name" }))
        ));
    }

    #[test]
    fn test_truncated_subframe_underflows() {
        let mut bytes = sample_subframe().to_bytes();
        bytes.truncate(bytes.len() - 6);

        assert!(matches!(
            ChannelSubframe::from_bytes(&bytes),
            Err(DecodeError::Underflow(_))
        ));
    }
}
