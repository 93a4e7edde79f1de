//! Connection exchange payload (connection request and response).
//!
//! Fixed 32-byte body, identical layout in both directions:
//! ```text
//! +0   Major Version  (2 bytes)
//! +2   Minor Version  (2 bytes)
//! +4   Station Name   (8 bytes, null-padded ASCII)
//! +12  Station Type   (4 bytes)
//! +16  Service Type   (4 bytes)
//! +20  IP Address     (4 bytes)
//! +24  Port           (2 bytes)
//! +26  Second IP      (4 bytes, zero if absent)
//! +30  Second Port    (2 bytes, zero if absent)
//! ```
//!
//! The secondary address is always written so the body keeps its fixed
//! length. On decode, an all-zero secondary IP and port maps to `None`; the
//! wire format cannot distinguish "explicitly zero" from "absent".

use std::net::Ipv4Addr;

use crate::core::constants::{
    CONNECTION_EXCHANGE_LENGTH, SERVICE_TYPE_LENGTH, STATION_NAME_LENGTH, STATION_TYPE_LENGTH,
};
use crate::core::{BuildError, DecodeError};
use crate::frame::check_width;
use crate::payload::ExchangeKind;
use crate::wire::{ByteReader, ByteWriter};

/// Connection exchange payload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionExchange {
    /// Whether this body travels in a request or a response frame.
    pub kind: ExchangeKind,
    /// Protocol major version.
    pub major_version: u16,
    /// Protocol minor version.
    pub minor_version: u16,
    /// Station identity (max 8 bytes, alphanumeric).
    pub station_name: String,
    /// Station type, e.g. "IMS" (max 4 bytes).
    pub station_type: String,
    /// Service type, e.g. "TCP" (max 4 bytes).
    pub service_type: String,
    /// Primary address of the answering/contacted endpoint.
    pub ip_address: Ipv4Addr,
    /// Primary port.
    pub port: u16,
    /// Optional standby address and port.
    pub secondary: Option<(Ipv4Addr, u16)>,
}

fn check_identity(field: &'static str, value: &str, max: usize) -> Result<(), BuildError> {
    check_width(field, value, max)?;
    if value.is_empty() {
        return Err(BuildError::BlankField { field });
    }
    if !value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
        return Err(BuildError::InvalidCharacters { field });
    }
    Ok(())
}

impl ConnectionExchange {
    /// Fixed body length on the wire.
    pub const LENGTH: usize = CONNECTION_EXCHANGE_LENGTH;

    /// Build a connection exchange body.
    pub fn new(
        kind: ExchangeKind,
        major_version: u16,
        minor_version: u16,
        station_name: &str,
        station_type: &str,
        service_type: &str,
        ip_address: Ipv4Addr,
        port: u16,
        secondary: Option<(Ipv4Addr, u16)>,
    ) -> Result<Self, BuildError> {
        check_identity("station name", station_name, STATION_NAME_LENGTH)?;
        check_identity("station type", station_type, STATION_TYPE_LENGTH)?;
        check_identity("service type", service_type, SERVICE_TYPE_LENGTH)?;

        Ok(Self {
            kind,
            major_version,
            minor_version,
            station_name: station_name.to_owned(),
            station_type: station_type.to_owned(),
            service_type: service_type.to_owned(),
            ip_address,
            port,
            secondary,
        })
    }

    /// Serialize the payload body (always exactly 32 bytes).
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.major_version);
        writer.write_u16(self.minor_version);
        writer.write_string(&self.station_name, STATION_NAME_LENGTH);
        writer.write_string(&self.station_type, STATION_TYPE_LENGTH);
        writer.write_string(&self.service_type, SERVICE_TYPE_LENGTH);
        writer.write_u32(u32::from(self.ip_address));
        writer.write_u16(self.port);

        let (second_ip, second_port) = self.secondary.unwrap_or((Ipv4Addr::UNSPECIFIED, 0));
        writer.write_u32(u32::from(second_ip));
        writer.write_u16(second_port);
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(Self::LENGTH);
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    pub fn decode(kind: ExchangeKind, reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let major_version = reader.read_u16()?;
        let minor_version = reader.read_u16()?;
        let station_name = reader.read_string(STATION_NAME_LENGTH)?;
        let station_type = reader.read_string(STATION_TYPE_LENGTH)?;
        let service_type = reader.read_string(SERVICE_TYPE_LENGTH)?;
        let ip_address = Ipv4Addr::from(reader.read_u32()?);
        let port = reader.read_u16()?;
        let second_ip = reader.read_u32()?;
        let second_port = reader.read_u16()?;

        let secondary = if second_ip == 0 && second_port == 0 {
            None
        } else {
            Some((Ipv4Addr::from(second_ip), second_port))
        };

        Ok(Self::new(
            kind,
            major_version,
            minor_version,
            &station_name,
            &station_type,
            &service_type,
            ip_address,
            port,
            secondary,
        )?)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(kind: ExchangeKind, bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(kind, &mut ByteReader::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(secondary: Option<(Ipv4Addr, u16)>) -> ConnectionExchange {
        ConnectionExchange::new(
            ExchangeKind::Request,
            1,
            1,
            "KURK",
            "IMS",
            "TCP",
            Ipv4Addr::new(198, 51, 100, 7),
            8080,
            secondary,
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_with_secondary() {
        let exchange = sample(Some((Ipv4Addr::new(203, 0, 113, 9), 8081)));
        let bytes = exchange.to_bytes();
        assert_eq!(bytes.len(), ConnectionExchange::LENGTH);

        let parsed = ConnectionExchange::from_bytes(ExchangeKind::Request, &bytes).unwrap();
        assert_eq!(parsed, exchange);
    }

    #[test]
    fn test_absent_secondary_is_zero_filled_fixed_length() {
        let exchange = sample(None);
        let bytes = exchange.to_bytes();
        assert_eq!(bytes.len(), ConnectionExchange::LENGTH);
        assert_eq!(&bytes[26..32], &[0u8; 6]);

        let parsed = ConnectionExchange::from_bytes(ExchangeKind::Request, &bytes).unwrap();
        assert_eq!(parsed.secondary, None);
    }

    #[test]
    fn test_reject_blank_station() {
        assert!(matches!(
            ConnectionExchange::new(
                ExchangeKind::Response,
                1,
                0,
                "",
                "IMS",
                "TCP",
                Ipv4Addr::LOCALHOST,
                0,
                None,
            ),
            Err(BuildError::BlankField { field: "station name" })
        ));
    }

    #[test]
    fn test_reject_bad_characters() {
        assert!(matches!(
            ConnectionExchange::new(
                ExchangeKind::Request,
                1,
                0,
                "KU RK",
                "IMS",
                "TCP",
                Ipv4Addr::LOCALHOST,
                0,
                None,
            ),
            Err(BuildError::InvalidCharacters { field: "station name" })
        ));
    }

    #[test]
    fn test_reject_long_station_type() {
        assert!(matches!(
            ConnectionExchange::new(
                ExchangeKind::Request,
                1,
                0,
                "KURK",
                "IMSXX",
                "TCP",
                Ipv4Addr::LOCALHOST,
                0,
                None,
            ),
            Err(BuildError::FieldTooLong { field: "station type", .. })
        ));
    }

    #[test]
    fn test_short_buffer_underflows() {
        assert!(matches!(
            ConnectionExchange::from_bytes(ExchangeKind::Request, &[0u8; 16]),
            Err(DecodeError::Underflow(_))
        ));
    }
}
