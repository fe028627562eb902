//! Table sweep: the CLI operation wrapped around the library core.

use anyhow::{Context, Result};
use kdam::Animation;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::engine::progress::{ProgressBarConfig, bar_sink, create_progress_bar, finish_bar};
use crate::source::{SqliteUpstream, open_source_db};
use crate::utils::config::DEFAULT_QUERY_CAP;
use crate::{CancelToken, Sweep, SweepOpts, SweepStats, collect_to_head, collect_with_stats};

/// Everything a table sweep needs: defaults, then `.rangesweep.toml`, then CLI flags.
#[derive(Clone, Debug)]
pub struct SweepSettings {
    pub db_path: PathBuf,
    pub table: Option<String>,
    pub key: Option<String>,
    /// First key; `None` → smallest key in the table.
    pub from: Option<u64>,
    /// Last key (inclusive); `None` → largest key when the sweep starts.
    pub to: Option<u64>,
    pub cap: u64,
    /// JSON-lines destination; `None` → stdout.
    pub output: Option<PathBuf>,
    /// Debug logs plus progress bar.
    pub verbose: bool,
    pub opts: SweepOpts,
}

impl SweepSettings {
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            table: None,
            key: None,
            from: None,
            to: None,
            cap: DEFAULT_QUERY_CAP,
            output: None,
            verbose: false,
            opts: SweepOpts::default(),
        }
    }
}

/// Sweep the configured table and write every row as a JSON line. Ctrl+C stops at the next chunk boundary.
pub fn sweep_table(settings: &SweepSettings) -> Result<SweepStats> {
    let table = settings
        .table
        .as_deref()
        .context("no table given (use --table or `table` in the config file)")?;
    let key = settings
        .key
        .as_deref()
        .context("no key column given (use --key or `key` in the config file)")?;

    let conn = open_source_db(&settings.db_path)?;
    let cancel = CancelToken::new();
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || cancel_handler.cancel()).context("set Ctrl+C handler")?;
    let mut opts = settings.opts.clone();
    opts.cancel = Some(cancel);

    let sweep = sweep_rows(&conn, table, key, settings, &opts)?;
    let Some(sweep) = sweep else {
        info!("{table} has no rows; nothing to sweep");
        return Ok(SweepStats::default());
    };

    let written = match &settings.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            write_json_lines(BufWriter::new(file), &sweep.records)?
        }
        None => write_json_lines(std::io::stdout().lock(), &sweep.records)?,
    };
    let stats = sweep.stats;
    info!(
        "Collected {} rows from {table} in {} queries ({} overflows, {} empty chunks, final width {})",
        written, stats.upstream_calls, stats.overflows, stats.empty_chunks, stats.final_width
    );
    Ok(stats)
}

/// Run the sweep against an open connection. `None` when the table is empty and no `from` was given.
pub fn sweep_rows(
    conn: &rusqlite::Connection,
    table: &str,
    key: &str,
    settings: &SweepSettings,
    opts: &SweepOpts,
) -> Result<Option<Sweep<crate::source::Row>>> {
    let probe = SqliteUpstream::new(conn, table, key, settings.cap);
    let upstream = SqliteUpstream::new(conn, table, key, settings.cap);

    let lo = match settings.from {
        Some(lo) => lo,
        None => match probe.key_bounds()? {
            Some((min, _)) => min,
            None => return Ok(None),
        },
    };
    debug!("sweeping {table}.{key} from {lo} with cap {}", settings.cap);

    let bar = settings
        .verbose
        .then(|| create_progress_bar(ProgressBarConfig::new(0, "Sweeping", Animation::Classic)));
    let sink = bar.as_ref().map(bar_sink);

    let sweep = match settings.to {
        Some(hi) => collect_with_stats(lo, hi, upstream, opts, sink)?,
        None => collect_to_head(lo, || probe.head(), upstream, opts, sink)?,
    };
    if let Some(bar) = &bar {
        finish_bar(bar);
    }
    Ok(Some(sweep))
}

/// Serialize each record on its own line and flush. Returns the number of lines written.
pub fn write_json_lines<W: Write, T: Serialize>(mut out: W, records: &[T]) -> Result<usize> {
    for record in records {
        serde_json::to_writer(&mut out, record).context("serialize record")?;
        out.write_all(b"\n").context("write record")?;
    }
    out.flush().context("flush output")?;
    Ok(records.len())
}
