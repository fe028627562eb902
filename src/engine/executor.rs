//! Query executor: calls the upstream and sorts its answer into an [`Outcome`].
//!
//! This is the only place that knows how an upstream says "too many results".

use log::debug;

use crate::error::{SweepError, TooManyResults};
use crate::{KeyRange, Outcome};

/// Source of records for an inclusive key range.
///
/// Return an error to refuse the range; the executor decides whether that error is an overflow.
pub trait Upstream {
    type Record;

    fn query(&mut self, lo: u64, hi: u64) -> anyhow::Result<Vec<Self::Record>>;
}

impl<F, R> Upstream for F
where
    F: FnMut(u64, u64) -> anyhow::Result<Vec<R>>,
{
    type Record = R;

    fn query(&mut self, lo: u64, hi: u64) -> anyhow::Result<Vec<R>> {
        self(lo, hi)
    }
}

/// Current maximum valid range end (e.g. the chain head).
pub trait UpperBound {
    fn upper_bound(&mut self) -> anyhow::Result<u64>;
}

impl<F> UpperBound for F
where
    F: FnMut() -> anyhow::Result<u64>,
{
    fn upper_bound(&mut self) -> anyhow::Result<u64> {
        self()
    }
}

/// Decides whether an upstream error means "narrow the range and retry".
#[derive(Clone, Debug, Default)]
pub struct OverflowMatcher {
    markers: Vec<String>,
}

impl OverflowMatcher {
    /// Markers are matched case-insensitively against every message in the error chain.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.as_ref().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn is_overflow(&self, err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            if cause.downcast_ref::<TooManyResults>().is_some() {
                return true;
            }
            let msg = cause.to_string().to_lowercase();
            self.markers.iter().any(|m| msg.contains(m.as_str()))
        })
    }
}

/// Wraps an [`Upstream`] and classifies each call.
pub struct QueryExecutor<U> {
    upstream: U,
    matcher: OverflowMatcher,
}

impl<U: Upstream> QueryExecutor<U> {
    pub fn new(upstream: U, matcher: OverflowMatcher) -> Self {
        Self { upstream, matcher }
    }

    /// Query `range`, requested at chunk width `width` (the range is narrower at the tail).
    /// Errors other than overflow come back as [`SweepError::Upstream`] with the source untouched.
    pub fn run(&mut self, range: KeyRange, width: u64) -> Result<Outcome<U::Record>, SweepError> {
        match self.upstream.query(range.lo, range.hi) {
            Ok(records) if records.is_empty() => Ok(Outcome::Empty),
            Ok(records) => Ok(Outcome::Records(records)),
            Err(e) if self.matcher.is_overflow(&e) => {
                debug!("overflow on {range}: {e}");
                Ok(Outcome::Overflow)
            }
            Err(source) => Err(SweepError::Upstream {
                lo: range.lo,
                hi: range.hi,
                width,
                source,
            }),
        }
    }
}
