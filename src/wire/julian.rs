//! 20-byte ASCII Julian-date timestamp fields.
//!
//! CD-1.1 carries every timestamp as a fixed 20-byte string of the form
//! `yyyyddd hh:mm:ss.sss` (day-of-year, millisecond precision), e.g.
//! `2005017 09:32:45.123`. Decode rejects anything that does not parse as a
//! valid Julian date.

use chrono::{Datelike, NaiveDateTime};

use crate::core::constants::JULIAN_DATE_LENGTH;
use crate::core::{BuildError, JulianDateError};

const JULIAN_FORMAT: &str = "%Y%j %H:%M:%S%.3f";

/// Check that `time` fits the fixed-width field.
///
/// `%Y` zero-pads to 4 digits, so years 0 through 9999 encode to exactly
/// 20 bytes; anything outside would change the field width and produce
/// bytes [`parse_julian`] rejects. Builders call this so a timestamp that
/// cannot round-trip is never constructed into a payload.
pub fn check_julian_encodable(time: NaiveDateTime) -> Result<(), BuildError> {
    let year = time.year();
    if !(0..=9999).contains(&year) {
        return Err(BuildError::TimestampOutOfRange { year });
    }
    Ok(())
}

/// Format a timestamp as the fixed 20-byte wire field.
pub fn format_julian(time: NaiveDateTime) -> [u8; JULIAN_DATE_LENGTH] {
    let s = time.format(JULIAN_FORMAT).to_string();
    let mut out = [0u8; JULIAN_DATE_LENGTH];
    let bytes = s.as_bytes();
    // %Y%j %H:%M:%S%.3f always yields exactly 20 bytes for 4-digit years
    let take = bytes.len().min(JULIAN_DATE_LENGTH);
    out[..take].copy_from_slice(&bytes[..take]);
    out
}

/// Parse a 20-byte wire field back into a timestamp.
pub fn parse_julian(raw: &[u8]) -> Result<NaiveDateTime, JulianDateError> {
    if raw.len() != JULIAN_DATE_LENGTH {
        return Err(JulianDateError::WrongLength {
            expected: JULIAN_DATE_LENGTH,
            actual: raw.len(),
        });
    }

    let text = std::str::from_utf8(raw)
        .map_err(|_| JulianDateError::Unparseable(String::from_utf8_lossy(raw).into_owned()))?;

    NaiveDateTime::parse_from_str(text, JULIAN_FORMAT)
        .map_err(|_| JulianDateError::Unparseable(text.to_owned()))
}
