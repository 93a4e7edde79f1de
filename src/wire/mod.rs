//! Wire primitives: binary cursor, Julian-date fields, checksum engine.
//!
//! Every higher codec layer is built on these. Nothing here knows about
//! frames or payloads; the cursor understands only CD-1.1's primitive
//! encodings (big-endian integers, null-padded fixed-width ASCII, 4-byte
//! aligned variable-length blocks).

mod checksum;
mod cursor;
mod julian;

pub use checksum::checksum;
pub use cursor::{ByteReader, ByteWriter, pad_length, padded_length};
pub use julian::{check_julian_encodable, format_julian, parse_julian};
