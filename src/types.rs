//! Public and internal types for the rangesweep API and collection loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utils::config::ChunkConsts;

/// Inclusive key range `[lo, hi]` handed to the upstream. Never built with `lo > hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyRange {
    pub lo: u64,
    pub hi: u64,
}

impl KeyRange {
    /// Build a range; `None` when `lo > hi`.
    pub fn new(lo: u64, hi: u64) -> Option<Self> {
        (lo <= hi).then_some(Self { lo, hi })
    }

    /// Number of keys covered. Saturates at `u64::MAX` for the full key space.
    pub fn key_count(&self) -> u64 {
        (self.hi - self.lo).saturating_add(1)
    }

    /// Distance from `lo` to `hi`; the width the controller asked for (or less at the tail).
    pub fn span(&self) -> u64 {
        self.hi - self.lo
    }

    pub fn contains(&self, key: u64) -> bool {
        self.lo <= key && key <= self.hi
    }
}

impl std::fmt::Display for KeyRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// Classified result of one upstream call.
///
/// `Records` always carries at least one record; `Overflow` carries none.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<R> {
    Empty,
    Records(Vec<R>),
    Overflow,
}

/// Record-free tag of an [`Outcome`]; all the controller needs to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeTag {
    OkEmpty,
    OkNonEmpty,
    Overflow,
}

impl<R> Outcome<R> {
    pub fn tag(&self) -> OutcomeTag {
        match self {
            Outcome::Empty => OutcomeTag::OkEmpty,
            Outcome::Records(_) => OutcomeTag::OkNonEmpty,
            Outcome::Overflow => OutcomeTag::Overflow,
        }
    }

    /// True for anything that advances the cursor.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Outcome::Overflow)
    }
}

/// Cooperative cancellation flag, checked between two upstream calls.
///
/// Clones share the flag, so one can be handed to a Ctrl+C handler while another goes into [`SweepOpts`].
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for [`collect_all`](crate::collect_all) and friends.
#[derive(Clone, Debug)]
pub struct SweepOpts {
    /// Width of the first range requested (`w0`).
    pub initial_width: u64,
    /// Smallest width the controller may shrink to (`w_min`, at least 1).
    pub min_width: u64,
    /// Largest width the controller may grow to (`w_max`).
    pub max_width: u64,
    /// Case-insensitive substrings that mark an upstream error message as "too many results".
    /// A [`TooManyResults`](crate::TooManyResults) anywhere in the error chain always counts.
    pub overflow_markers: Vec<String>,
    /// Checked at every loop head. `None` disables cancellation.
    pub cancel: Option<CancelToken>,
}

impl Default for SweepOpts {
    fn default() -> Self {
        Self {
            initial_width: ChunkConsts::INITIAL_WIDTH,
            min_width: ChunkConsts::MIN_WIDTH,
            max_width: ChunkConsts::MAX_WIDTH,
            overflow_markers: vec![ChunkConsts::DEFAULT_OVERFLOW_MARKER.to_string()],
            cancel: None,
        }
    }
}

impl SweepOpts {
    /// Options with the given widths and default markers.
    pub fn with_widths(initial_width: u64, min_width: u64, max_width: u64) -> Self {
        Self {
            initial_width,
            min_width,
            max_width,
            ..Self::default()
        }
    }
}

/// Counters kept by the collection loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Upstream calls issued, overflowing ones included.
    pub upstream_calls: u64,
    /// Ranges accepted (empty or not).
    pub accepted_chunks: u64,
    /// Accepted ranges that came back empty.
    pub empty_chunks: u64,
    /// Calls the upstream refused as too large.
    pub overflows: u64,
    /// Records collected.
    pub records: u64,
    /// Controller width when the loop ended.
    pub final_width: u64,
}

/// Result of a complete sweep: every record in range order plus loop counters.
#[derive(Clone, Debug)]
pub struct Sweep<R> {
    pub records: Vec<R>,
    pub stats: SweepStats,
}
