//! Sweep error types

use thiserror::Error;

/// Errors surfaced by [`collect_all`](crate::collect_all). None of them carry partial records.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    #[error("Upstream still overflows at the minimum width {width} for range [{lo}, {hi}]")]
    FatalOverflowAtMin { lo: u64, hi: u64, width: u64 },

    #[error("Upstream query for range [{lo}, {hi}] failed at width {width}")]
    Upstream {
        lo: u64,
        hi: u64,
        width: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("Sweep cancelled before range starting at {next_lo} (width {width})")]
    Cancelled { next_lo: u64, width: u64 },

    #[error("Progress sink failed")]
    Progress(#[source] anyhow::Error),

    #[error("Upper-bound oracle failed")]
    UpperBound(#[source] anyhow::Error),

    #[error(transparent)]
    Cursor(#[from] CursorError),
}

impl SweepError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SweepError::InvalidArguments {
            reason: reason.into(),
        }
    }
}

/// Range cursor misuse. The collection loop never triggers these.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CursorError {
    #[error("Cursor exhausted at {lo} (end {hi})")]
    Exhausted { lo: u64, hi: u64 },

    #[error("Cannot advance {width} keys from {lo}: only {remaining} remain")]
    InvalidAdvance { lo: u64, width: u64, remaining: u64 },

    #[error("Invalid cursor range: lo {lo} > hi {hi}")]
    InvalidRange { lo: u64, hi: u64 },
}

/// Typed "too many results" signal an upstream may return instead of a message.
///
/// The executor treats this (anywhere in the error chain) as an overflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("query returned more than {cap} results")]
pub struct TooManyResults {
    pub cap: u64,
}
