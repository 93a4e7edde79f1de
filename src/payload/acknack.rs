//! Acknack payload: acknowledgment, gap report, and keep-alive.
//!
//! Wire format:
//! ```text
//! +0   Frame Set Acked (20 bytes, null-padded ASCII)
//! +20  Lowest Seq      (8 bytes)
//! +28  Highest Seq     (8 bytes)
//! +36  Gap Count       (4 bytes)
//! +40  Gap Ranges      (gap count * 2 * 8 bytes, [start, end] pairs)
//! ```
//!
//! An Acknack reports the sequence numbers *not yet received* for one frame
//! set. It carries no meaningful sequence number of its own and must never
//! itself be acknowledged.

use crate::core::constants::{ACKNACK_FIXED_LENGTH, FRAME_SET_NAME_LENGTH};
use crate::core::{BuildError, DecodeError};
use crate::frame::check_width;
use crate::gaps::GapList;
use crate::wire::{ByteReader, ByteWriter};

/// Acknack payload body.
///
/// Prefer [`Acknack::from_gap_list`]: it derives lowest/highest/gap fields
/// directly from a [`GapList`], so the two representations can never
/// diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknack {
    /// Name of the frame set being acknowledged (max 20 bytes).
    pub frame_set_acked: String,
    /// Lowest sequence number observed in the frame set.
    pub lowest_seq: u64,
    /// Highest sequence number observed in the frame set.
    pub highest_seq: u64,
    /// Flattened `[start, end]` pairs of missing sequence ranges.
    gap_ranges: Vec<u64>,
}

impl Acknack {
    /// Build an Acknack from explicit fields.
    ///
    /// Fails if the declared `gap_count` disagrees with the flattened range
    /// array, if the array length is odd, or if the pairs are not sorted,
    /// non-overlapping ascending ranges.
    pub fn new(
        frame_set_acked: &str,
        lowest_seq: u64,
        highest_seq: u64,
        gap_count: u32,
        gap_ranges: Vec<u64>,
    ) -> Result<Self, BuildError> {
        check_width("frame set name", frame_set_acked, FRAME_SET_NAME_LENGTH)?;

        if gap_ranges.len() % 2 != 0 {
            return Err(BuildError::OddGapRanges { len: gap_ranges.len() });
        }
        if gap_count as usize * 2 != gap_ranges.len() {
            return Err(BuildError::GapCountMismatch {
                count: gap_count,
                ranges: gap_ranges.len(),
            });
        }

        let mut previous_end: Option<u64> = None;
        for pair in gap_ranges.chunks_exact(2) {
            let (start, end) = (pair[0], pair[1]);
            if start > end || previous_end.is_some_and(|p| start <= p) {
                return Err(BuildError::UnorderedGapRanges);
            }
            previous_end = Some(end);
        }

        Ok(Self {
            frame_set_acked: frame_set_acked.to_owned(),
            lowest_seq,
            highest_seq,
            gap_ranges,
        })
    }

    /// Project a [`GapList`] into an Acknack.
    ///
    /// This is the only bridge between the two representations; the derived
    /// lowest/highest/count/ranges always agree with the list.
    pub fn from_gap_list(frame_set_acked: &str, gaps: &GapList) -> Result<Self, BuildError> {
        let flattened = gaps.flattened();
        let count = (flattened.len() / 2) as u32;
        Self::new(
            frame_set_acked,
            gaps.lowest().unwrap_or(0),
            gaps.highest().unwrap_or(0),
            count,
            flattened,
        )
    }

    /// Number of missing-sequence ranges.
    pub fn gap_count(&self) -> u32 {
        (self.gap_ranges.len() / 2) as u32
    }

    /// Flattened `[start, end]` range pairs (always even length).
    pub fn gap_ranges(&self) -> &[u64] {
        &self.gap_ranges
    }

    /// Serialize the payload body.
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.frame_set_acked, FRAME_SET_NAME_LENGTH);
        writer.write_u64(self.lowest_seq);
        writer.write_u64(self.highest_seq);
        writer.write_u32(self.gap_count());
        for &value in &self.gap_ranges {
            writer.write_u64(value);
        }
    }

    /// Serialize to a standalone buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer =
            ByteWriter::with_capacity(ACKNACK_FIXED_LENGTH + self.gap_ranges.len() * 8);
        self.encode(&mut writer);
        writer.into_bytes()
    }

    /// Decode from the reader's current position.
    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let frame_set_acked = reader.read_string(FRAME_SET_NAME_LENGTH)?;
        let lowest_seq = reader.read_u64()?;
        let highest_seq = reader.read_u64()?;
        let gap_count = reader.read_u32()?;

        // No preallocation from the declared count: a hostile count hits
        // underflow before it can exhaust memory.
        let mut gap_ranges = Vec::new();
        for _ in 0..gap_count as usize * 2 {
            gap_ranges.push(reader.read_u64()?);
        }

        Ok(Self::new(&frame_set_acked, lowest_seq, highest_seq, gap_count, gap_ranges)?)
    }

    /// Decode from a standalone buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode(&mut ByteReader::new(bytes))
    }
}
