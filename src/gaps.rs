//! Sequence-number gap tracking for one frame set.
//!
//! A [`GapList`] records, for a single producer/consumer pair, which
//! sequence numbers have *not* yet been received, as a minimal sorted list
//! of non-overlapping closed ranges, together with the lowest and highest
//! sequence number ever observed. The Acknack payload is a pure projection
//! of this state (`Acknack::from_gap_list`).
//!
//! The list is plain mutable state owned by one connection; the codec
//! provides no synchronization. Acknack frames themselves are exempt from
//! gap tracking (`FrameType::is_gap_tracked`).

/// Missing-sequence bookkeeping for one frame set.
#[derive(Debug, Clone, Default)]
pub struct GapList {
    /// Sorted, non-overlapping closed ranges of missing sequence numbers.
    gaps: Vec<(u64, u64)>,
    /// Lowest sequence number observed, if any frame has arrived.
    lowest: Option<u64>,
    /// Highest sequence number observed, if any frame has arrived.
    highest: Option<u64>,
}

impl GapList {
    /// Create an empty gap list (no frames observed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest sequence number observed.
    pub fn lowest(&self) -> Option<u64> {
        self.lowest
    }

    /// Highest sequence number observed.
    pub fn highest(&self) -> Option<u64> {
        self.highest
    }

    /// Number of missing ranges.
    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }

    /// Whether every sequence number in `[lowest, highest]` has arrived.
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// The missing ranges as closed `[start, end]` intervals.
    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.gaps
    }

    /// Flattened wire representation: `start, end, start, end, ...`.
    ///
    /// Always even length.
    pub fn flattened(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.gaps.len() * 2);
        for &(start, end) in &self.gaps {
            out.push(start);
            out.push(end);
        }
        out
    }

    /// Record a received sequence number.
    ///
    /// Returns `true` if the number was new, `false` for a duplicate.
    pub fn record_received(&mut self, seq: u64) -> bool {
        let (Some(lowest), Some(highest)) = (self.lowest, self.highest) else {
            self.lowest = Some(seq);
            self.highest = Some(seq);
            return true;
        };

        if seq > highest {
            if seq > highest + 1 {
                self.gaps.push((highest + 1, seq - 1));
            }
            self.highest = Some(seq);
            return true;
        }

        if seq < lowest {
            if seq + 1 < lowest {
                self.gaps.insert(0, (seq + 1, lowest - 1));
            }
            self.lowest = Some(seq);
            return true;
        }

        // Inside [lowest, highest]: new only if it falls in a gap
        let Some(index) = self.gaps.iter().position(|&(s, e)| s <= seq && seq <= e) else {
            return false;
        };

        let (start, end) = self.gaps[index];
        match (seq == start, seq == end) {
            (true, true) => {
                self.gaps.remove(index);
            }
            (true, false) => self.gaps[index] = (start + 1, end),
            (false, true) => self.gaps[index] = (start, end - 1),
            (false, false) => {
                self.gaps[index] = (start, seq - 1);
                self.gaps.insert(index + 1, (seq + 1, end));
            }
        }
        true
    }

    /// Clear all state, as demanded by a custom reset frame.
    pub fn reset(&mut self) {
        self.gaps.clear();
        self.lowest = None;
        self.highest = None;
    }
}
