//! Progress reporting: a monotonic reporter for the loop and a kdam bar sink for the CLI.

use kdam::{Animation, Bar, BarExt};
use log::debug;
use std::sync::{Arc, Mutex};

use crate::error::SweepError;

/// Boxed progress sink: `(processed, total)`. An error aborts the sweep.
pub type ProgressSink<'a> = Box<dyn FnMut(u64, u64) -> anyhow::Result<()> + 'a>;

/// Box a closure as a [`ProgressSink`] (lets the closure's argument types be inferred).
pub fn progress_sink<'a, F>(f: F) -> ProgressSink<'a>
where
    F: FnMut(u64, u64) -> anyhow::Result<()> + 'a,
{
    Box::new(f)
}

/// Forwards accepted-chunk progress to an optional sink.
///
/// `total` is fixed at construction; `processed` must never go backwards.
pub struct ProgressReporter<'a> {
    total: u64,
    last: Option<u64>,
    sink: Option<ProgressSink<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(total: u64, sink: Option<ProgressSink<'a>>) -> Self {
        Self {
            total,
            last: None,
            sink,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn last(&self) -> Option<u64> {
        self.last
    }

    pub fn update(&mut self, processed: u64) -> Result<(), SweepError> {
        debug_assert!(
            self.last.is_none_or(|prev| processed >= prev),
            "progress went backwards: {:?} -> {processed}",
            self.last
        );
        debug_assert!(processed <= self.total);
        self.last = Some(processed);
        debug!("progress {processed}/{}", self.total);
        match self.sink.as_mut() {
            Some(sink) => sink(processed, self.total).map_err(SweepError::Progress),
            None => Ok(()),
        }
    }
}

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: u64,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    pub fn new(total: u64, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = usize::try_from(config.total).unwrap_or(usize::MAX),
        desc = config.desc,
        animation = config.animation,
        unit = " keys"
    )))
}

/// Move the bar to `processed`. Uses try_lock so a contended bar just skips a frame.
pub fn set_bar_position(pb: &ProgressBar, processed: u64) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update_to(usize::try_from(processed).unwrap_or(usize::MAX));
    }
}

/// Update the bar's total (the sweep's total is only known once the upper bound resolves).
pub fn set_bar_total(pb: &ProgressBar, total: u64) {
    if let Ok(mut bar) = pb.try_lock() {
        bar.total = usize::try_from(total).unwrap_or(usize::MAX);
        let _ = bar.refresh();
    }
}

/// Sink that drives `bar` from `(processed, total)` updates. Offsets are 0-based, so
/// `processed + 1` keys are covered after each update and the bar spans `total + 1` keys.
pub fn bar_sink<'a>(bar: &ProgressBar) -> ProgressSink<'a> {
    let bar = Arc::clone(bar);
    let mut sized = false;
    Box::new(move |processed: u64, total: u64| {
        if !sized {
            set_bar_total(&bar, total.saturating_add(1));
            sized = true;
        }
        set_bar_position(&bar, processed.saturating_add(1));
        Ok(())
    })
}

/// Final refresh so the bar shows its last state before other output.
pub fn finish_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.refresh();
        eprintln!();
    }
}
