//! Chunk width controller: halve on overflow, double over empty stretches.

use crate::OutcomeTag;
use crate::error::SweepError;

/// Width transition for one outcome, clamped to `[w_min, w_max]`.
pub fn next_width(w: u64, tag: OutcomeTag, w_min: u64, w_max: u64) -> u64 {
    match tag {
        OutcomeTag::Overflow => (w / 2).max(w_min),
        OutcomeTag::OkEmpty => w.saturating_mul(2).min(w_max),
        OutcomeTag::OkNonEmpty => w,
    }
}

/// Holds the current chunk width `w` within `[w_min, w_max]`.
#[derive(Clone, Debug)]
pub struct ChunkSizeController {
    w: u64,
    w_min: u64,
    w_max: u64,
}

impl ChunkSizeController {
    /// Requires `1 <= w_min <= w0 <= w_max`.
    pub fn new(w0: u64, w_min: u64, w_max: u64) -> Result<Self, SweepError> {
        if w_min < 1 {
            return Err(SweepError::invalid("min_width must be at least 1"));
        }
        if w_min > w_max {
            return Err(SweepError::invalid(format!(
                "min_width {w_min} exceeds max_width {w_max}"
            )));
        }
        if !(w_min..=w_max).contains(&w0) {
            return Err(SweepError::invalid(format!(
                "initial_width {w0} outside [{w_min}, {w_max}]"
            )));
        }
        Ok(Self { w: w0, w_min, w_max })
    }

    pub fn current(&self) -> u64 {
        self.w
    }

    pub fn bounds(&self) -> (u64, u64) {
        (self.w_min, self.w_max)
    }

    /// True when an overflow can no longer be answered by shrinking.
    pub fn at_floor(&self) -> bool {
        self.w == self.w_min
    }

    /// Apply one outcome and return the new width.
    pub fn on_outcome(&mut self, tag: OutcomeTag) -> u64 {
        self.w = next_width(self.w, tag, self.w_min, self.w_max);
        self.w
    }
}
