//! Collection loop: cursor + executor + controller + reporter.

use log::{debug, info};

use crate::error::SweepError;
use crate::{CancelToken, Outcome, Sweep, SweepStats};

use super::controller::ChunkSizeController;
use super::cursor::RangeCursor;
use super::executor::{QueryExecutor, Upstream};
use super::progress::ProgressReporter;

/// One sweep over `[lo0, hi0]`. Built per call and consumed by [`run`](Self::run); nothing is shared between sweeps.
pub struct CollectionLoop<'a, U: Upstream> {
    lo0: u64,
    cursor: RangeCursor,
    controller: ChunkSizeController,
    executor: QueryExecutor<U>,
    reporter: ProgressReporter<'a>,
    cancel: Option<CancelToken>,
    output: Vec<U::Record>,
    stats: SweepStats,
}

impl<'a, U: Upstream> CollectionLoop<'a, U> {
    pub fn new(
        cursor: RangeCursor,
        controller: ChunkSizeController,
        executor: QueryExecutor<U>,
        reporter: ProgressReporter<'a>,
        cancel: Option<CancelToken>,
    ) -> Self {
        Self {
            lo0: cursor.position(),
            cursor,
            controller,
            executor,
            reporter,
            cancel,
            output: Vec::new(),
            stats: SweepStats::default(),
        }
    }

    /// Run until every key is covered. Any error drops the records gathered so far.
    pub fn run(mut self) -> Result<Sweep<U::Record>, SweepError> {
        while self.cursor.remaining() > 0 {
            let w = self.controller.current();
            if let Some(cancel) = &self.cancel
                && cancel.is_cancelled()
            {
                return Err(SweepError::Cancelled {
                    next_lo: self.cursor.position(),
                    width: w,
                });
            }

            let range = self.cursor.peek(w)?;
            self.stats.upstream_calls += 1;
            let outcome = self.executor.run(range, w)?;
            let tag = outcome.tag();

            match outcome {
                Outcome::Overflow => {
                    self.stats.overflows += 1;
                    if self.controller.at_floor() {
                        return Err(SweepError::FatalOverflowAtMin {
                            lo: range.lo,
                            hi: range.hi,
                            width: w,
                        });
                    }
                    let mut narrowed = self.controller.on_outcome(tag);
                    // A tail range clamped to hi stays the same until the width drops below its span.
                    while narrowed >= range.span() && !self.controller.at_floor() {
                        narrowed = self.controller.on_outcome(tag);
                    }
                    info!("Too many results in {range}: narrowing chunk width {w} -> {narrowed}");
                    continue;
                }
                Outcome::Empty => {
                    self.stats.empty_chunks += 1;
                    debug!("{range}: empty");
                }
                Outcome::Records(records) => {
                    debug!("{range}: {} records", records.len());
                    self.stats.records += records.len() as u64;
                    self.output.extend(records);
                }
            }

            self.cursor.advance(range.key_count())?;
            self.stats.accepted_chunks += 1;
            let next = self.controller.on_outcome(tag);
            if next != w {
                debug!("chunk width {w} -> {next}");
            }
            self.reporter.update(range.hi - self.lo0)?;
        }

        self.stats.final_width = self.controller.current();
        debug!("sweep done: {:?}", self.stats);
        Ok(Sweep {
            records: self.output,
            stats: self.stats,
        })
    }
}

