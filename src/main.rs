//! Rangesweep CLI: sweep an SQLite table by key range under a per-query row cap.

use anyhow::Result;
use clap::Parser;
use rangesweep::engine::arg_parser::Cli;
use rangesweep::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
