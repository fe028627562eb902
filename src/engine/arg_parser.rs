use clap::Parser;
use std::path::PathBuf;

/// Adaptive chunked range sweeper.
#[derive(Clone, Debug, Parser)]
#[command(name = "rangesweep")]
#[command(
    about = "Sweep every row of an SQLite table by key range, narrowing the window whenever a query exceeds the cap."
)]
pub struct Cli {
    /// SQLite database to read.
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// Table to sweep.
    #[arg(long, short)]
    pub table: Option<String>,

    /// Integer key column ranges are taken over.
    #[arg(long, short)]
    pub key: Option<String>,

    /// First key to sweep. Default: smallest key in the table.
    #[arg(long)]
    pub from: Option<u64>,

    /// Last key to sweep (inclusive). Default: largest key in the table at start.
    #[arg(long)]
    pub to: Option<u64>,

    /// Rows a single range query may return before it counts as "too many results".
    #[arg(long, short = 'c')]
    pub cap: Option<u64>,

    /// Width of the first range requested.
    #[arg(long, short = 'w')]
    pub initial_width: Option<u64>,

    /// Smallest width to shrink to; overflowing at this width is fatal.
    #[arg(long)]
    pub min_width: Option<u64>,

    /// Largest width to grow to over empty stretches.
    #[arg(long)]
    pub max_width: Option<u64>,

    /// Write records as JSON lines here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Verbose output (debug logs and progress bar).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
