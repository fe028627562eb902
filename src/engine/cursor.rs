//! Range cursor: walks `[lo, hi]` forward in caller-sized inclusive steps.

use crate::KeyRange;
use crate::error::CursorError;

/// Next uncovered key plus the inclusive end of the sweep.
///
/// `lo` only moves forward, and only through [`advance`](Self::advance).
#[derive(Clone, Debug)]
pub struct RangeCursor {
    lo: u64,
    hi: u64,
    exhausted: bool,
}

impl RangeCursor {
    pub fn new(lo: u64, hi: u64) -> Result<Self, CursorError> {
        if lo > hi {
            return Err(CursorError::InvalidRange { lo, hi });
        }
        Ok(Self {
            lo,
            hi,
            exhausted: false,
        })
    }

    /// Next range of width `w`: `[lo, min(lo + w, hi)]`.
    pub fn peek(&self, w: u64) -> Result<KeyRange, CursorError> {
        if self.exhausted {
            return Err(CursorError::Exhausted {
                lo: self.lo,
                hi: self.hi,
            });
        }
        Ok(KeyRange {
            lo: self.lo,
            hi: self.lo.saturating_add(w).min(self.hi),
        })
    }

    /// Consume `width` keys. Consuming exactly [`remaining`](Self::remaining) exhausts the cursor.
    pub fn advance(&mut self, width: u64) -> Result<(), CursorError> {
        let remaining = self.remaining();
        if width > remaining {
            return Err(CursorError::InvalidAdvance {
                lo: self.lo,
                width,
                remaining,
            });
        }
        if width == 0 {
            return Ok(());
        }
        // lo + width - 1 <= hi here, so only the step past hi itself can overflow.
        let last = self.lo + (width - 1);
        if last == self.hi {
            self.exhausted = true;
            self.lo = self.hi;
        } else {
            self.lo = last + 1;
        }
        Ok(())
    }

    /// Keys not yet covered. Saturates at `u64::MAX` when the cursor spans the whole key space.
    pub fn remaining(&self) -> u64 {
        if self.exhausted {
            0
        } else {
            (self.hi - self.lo).saturating_add(1)
        }
    }

    /// Next uncovered key (or `hi` once exhausted).
    pub fn position(&self) -> u64 {
        self.lo
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
