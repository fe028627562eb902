//! Rangesweep: pull every record out of a capped range-query upstream.
//!
//! The upstream answers inclusive key ranges (block numbers, row ids, ...) but refuses any range
//! whose answer would exceed its hard cap. The sweep halves the chunk width on every refusal,
//! doubles it across empty stretches, and keeps it steady while records flow.

pub mod engine;
pub mod error;
pub mod source;
pub mod sweep;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::executor::{Upstream, UpperBound};
pub use engine::progress::{ProgressSink, progress_sink};
pub use error::{CursorError, SweepError, TooManyResults};

use log::debug;

use engine::{
    ChunkSizeController, CollectionLoop, OverflowMatcher, ProgressReporter, QueryExecutor,
    RangeCursor,
};

/// Collect every record the upstream holds for the inclusive range `[lo0, hi0]`.
///
/// - **`on_progress: None`** → no progress callbacks.
/// - **`on_progress: Some(f)`** → `f(processed, total)` after each accepted chunk, where `processed`
///   is the offset of the last covered key and `total == hi0 - lo0`. An error from `f` aborts the sweep.
///
/// Records come back in range order, upstream order within a range. On any error nothing is returned.
///
/// ```ignore
/// let opts = rangesweep::SweepOpts::with_widths(4, 1, 16);
/// let upstream = |lo: u64, hi: u64| -> anyhow::Result<Vec<u64>> { Ok((lo..=hi).collect()) };
/// let records = rangesweep::collect_all(0, 9, upstream, &opts, None)?;
/// ```
pub fn collect_all<U: Upstream>(
    lo0: u64,
    hi0: u64,
    upstream: U,
    opts: &SweepOpts,
    on_progress: Option<ProgressSink<'_>>,
) -> Result<Vec<U::Record>, SweepError> {
    collect_with_stats(lo0, hi0, upstream, opts, on_progress).map(|sweep| sweep.records)
}

/// Same as [`collect_all`], also returning the loop counters.
pub fn collect_with_stats<U: Upstream>(
    lo0: u64,
    hi0: u64,
    upstream: U,
    opts: &SweepOpts,
    on_progress: Option<ProgressSink<'_>>,
) -> Result<Sweep<U::Record>, SweepError> {
    if lo0 > hi0 {
        return Err(SweepError::invalid(format!("lo0 {lo0} exceeds hi0 {hi0}")));
    }
    let controller = ChunkSizeController::new(opts.initial_width, opts.min_width, opts.max_width)?;
    let cursor = RangeCursor::new(lo0, hi0)?;
    let executor = QueryExecutor::new(upstream, OverflowMatcher::new(&opts.overflow_markers));
    let reporter = ProgressReporter::new(hi0 - lo0, on_progress);

    debug!(
        "{} sweep [{lo0}, {hi0}] opts:{:?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    CollectionLoop::new(cursor, controller, executor, reporter, opts.cancel.clone()).run()
}

/// Sweep from `lo0` up to the oracle's current upper bound, read once before the first query.
pub fn collect_to_head<U: Upstream, B: UpperBound>(
    lo0: u64,
    mut oracle: B,
    upstream: U,
    opts: &SweepOpts,
    on_progress: Option<ProgressSink<'_>>,
) -> Result<Sweep<U::Record>, SweepError> {
    let hi0 = oracle.upper_bound().map_err(SweepError::UpperBound)?;
    debug!("upper bound resolved to {hi0}");
    collect_with_stats(lo0, hi0, upstream, opts, on_progress)
}
