//! SQLite source tests: capped range queries, key bounds, table sweeps, and CLI settings layering.

use clap::Parser;
use rangesweep::engine::Cli;
use rangesweep::engine::cli::resolve_settings;
use rangesweep::source::{SqliteUpstream, quote_ident, value_to_json};
use rangesweep::sweep::{SweepSettings, sweep_rows, sweep_table, write_json_lines};
use rangesweep::utils::{load_sweep_toml, parse_sweep_toml};
use rangesweep::{SweepError, SweepOpts, TooManyResults, Upstream};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

const CREATE_EVENTS_SQL: &str = "CREATE TABLE events (block INTEGER NOT NULL, tx TEXT, amount REAL, payload BLOB)";
const INSERT_EVENT_SQL: &str = "INSERT INTO events (block, tx, amount, payload) VALUES (?1, ?2, ?3, ?4)";

/// One event per block in `blocks`, tx named after the block.
fn events_db(blocks: &[i64]) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute(CREATE_EVENTS_SQL, []).unwrap();
    for (i, b) in blocks.iter().enumerate() {
        conn.execute(
            INSERT_EVENT_SQL,
            rusqlite::params![b, format!("0x{b:04x}-{i}"), 1.5_f64, vec![0xabu8, 0x01]],
        )
        .unwrap();
    }
    conn
}

fn blocks_of(rows: &[rangesweep::source::Row]) -> Vec<i64> {
    rows.iter().map(|r| r["block"].as_i64().unwrap()).collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn settings_for(table: &str, key: &str, cap: u64) -> SweepSettings {
    let mut settings = SweepSettings::new(Path::new(":memory:"));
    settings.table = Some(table.to_string());
    settings.key = Some(key.to_string());
    settings.cap = cap;
    settings
}

// --- SqliteUpstream ---

#[test]
fn test_query_returns_rows_in_key_order() {
    let conn = events_db(&[7, 3, 5, 12]);
    let mut src = SqliteUpstream::new(&conn, "events", "block", 10);
    let rows = src.query(3, 7).unwrap();
    assert_eq!(blocks_of(&rows), vec![3, 5, 7]);
    assert_eq!(rows[0]["amount"], json!(1.5));
    assert_eq!(rows[0]["payload"], json!("ab01"));
    assert!(src.query(8, 11).unwrap().is_empty());
}

#[test]
fn test_query_over_cap_is_too_many_results() {
    let conn = events_db(&[1, 2, 3, 4]);
    let mut src = SqliteUpstream::new(&conn, "events", "block", 3);
    let err = src.query(0, 10).unwrap_err();
    assert_eq!(err.downcast_ref::<TooManyResults>(), Some(&TooManyResults { cap: 3 }));
    // Exactly at the cap is fine.
    assert_eq!(src.query(1, 3).unwrap().len(), 3);
}

#[test]
fn test_key_bounds_and_head() {
    let conn = events_db(&[40, 10, 25]);
    let src = SqliteUpstream::new(&conn, "events", "block", 10);
    assert_eq!(src.key_bounds().unwrap(), Some((10, 40)));
    assert_eq!(src.head().unwrap(), 40);

    let empty = events_db(&[]);
    let src = SqliteUpstream::new(&empty, "events", "block", 10);
    assert_eq!(src.key_bounds().unwrap(), None);
    assert!(src.head().is_err());
}

#[test]
fn test_negative_keys_are_rejected() {
    let conn = events_db(&[-3, 4]);
    let src = SqliteUpstream::new(&conn, "events", "block", 10);
    assert!(src.key_bounds().is_err());
}

#[test]
fn test_quote_ident_escapes_quotes() {
    assert_eq!(quote_ident("events"), "\"events\"");
    assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
}

#[test]
fn test_value_to_json() {
    assert_eq!(value_to_json(ValueRef::Null), Value::Null);
    assert_eq!(value_to_json(ValueRef::Integer(-4)), json!(-4));
    assert_eq!(value_to_json(ValueRef::Real(f64::NAN)), Value::Null);
    assert_eq!(value_to_json(ValueRef::Text(b"hi")), json!("hi"));
    assert_eq!(value_to_json(ValueRef::Blob(&[0, 255])), json!("00ff"));
}

// --- sweep_rows ---

#[test]
fn test_sweep_rows_collects_whole_table() {
    let blocks: Vec<i64> = (0..200).filter(|b| b % 7 == 0 || (90..100).contains(b)).collect();
    let conn = events_db(&blocks);
    let settings = settings_for("events", "block", 4);
    let opts = SweepOpts::with_widths(64, 1, 256);

    let sweep = sweep_rows(&conn, "events", "block", &settings, &opts)
        .unwrap()
        .unwrap();
    assert_eq!(blocks_of(&sweep.records), blocks);
    assert!(sweep.stats.overflows > 0);
    assert_eq!(sweep.stats.records, blocks.len() as u64);
}

#[test]
fn test_sweep_rows_explicit_window() {
    let conn = events_db(&[1, 5, 9, 13, 17]);
    let mut settings = settings_for("events", "block", 10);
    settings.from = Some(4);
    settings.to = Some(13);
    let sweep = sweep_rows(&conn, "events", "block", &settings, &SweepOpts::with_widths(2, 1, 8))
        .unwrap()
        .unwrap();
    assert_eq!(blocks_of(&sweep.records), vec![5, 9, 13]);
}

#[test]
fn test_sweep_rows_empty_table() {
    let conn = events_db(&[]);
    let settings = settings_for("events", "block", 10);
    let sweep = sweep_rows(&conn, "events", "block", &settings, &SweepOpts::default()).unwrap();
    assert!(sweep.is_none());
}

#[test]
fn test_sweep_rows_fatal_when_one_key_exceeds_cap() {
    let conn = events_db(&[2, 6, 6, 6, 9]);
    let settings = settings_for("events", "block", 2);
    let err = sweep_rows(&conn, "events", "block", &settings, &SweepOpts::with_widths(8, 1, 8))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SweepError>(),
        Some(SweepError::FatalOverflowAtMin { width: 1, .. })
    ));
}

// --- write_json_lines / sweep_table ---

#[test]
fn test_write_json_lines() {
    let mut buf = Vec::new();
    let n = write_json_lines(&mut buf, &[json!({"a": 1}), json!({"a": 2})]).unwrap();
    assert_eq!(n, 2);
    assert_eq!(String::from_utf8(buf).unwrap(), "{\"a\":1}\n{\"a\":2}\n");
}

/// Only test that calls `sweep_table`: it installs the process-wide Ctrl+C handler.
#[test]
fn test_sweep_table_writes_output_file() {
    let dir = scratch_dir("sweep_table");
    let db_path = dir.join("events.db");
    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute(CREATE_EVENTS_SQL, []).unwrap();
        for b in [3_i64, 4, 10, 11, 12, 30] {
            conn.execute(
                INSERT_EVENT_SQL,
                rusqlite::params![b, "tx", 0.0_f64, None::<Vec<u8>>],
            )
            .unwrap();
        }
    }
    let out_path = dir.join("out.jsonl");
    let mut settings = SweepSettings::new(&db_path);
    settings.table = Some("events".into());
    settings.key = Some("block".into());
    settings.cap = 2;
    settings.output = Some(out_path.clone());
    settings.opts = SweepOpts::with_widths(16, 1, 64);

    let stats = sweep_table(&settings).unwrap();
    assert_eq!(stats.records, 6);

    let text = std::fs::read_to_string(&out_path).unwrap();
    let blocks: Vec<i64> = text
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["block"].as_i64().unwrap())
        .collect();
    assert_eq!(blocks, vec![3, 4, 10, 11, 12, 30]);
}

// --- config layering ---

#[test]
fn test_parse_sweep_toml_rejects_unknown_keys() {
    assert!(parse_sweep_toml("[sweep]\ncap = 5\n").is_ok());
    assert!(parse_sweep_toml("[sweep]\nchunk = 5\n").is_err());
    assert!(parse_sweep_toml("").is_ok());
}

#[test]
fn test_resolve_settings_file_then_flags() {
    let dir = scratch_dir("resolve_settings");
    std::fs::write(
        dir.join(".rangesweep.toml"),
        "[sweep]\ntable = \"transfers\"\nkey = \"block\"\ncap = 500\ninitial_width = 64\nmax_width = 4096\noverflow_markers = [\"limit exceeded\"]\n",
    )
    .unwrap();

    let file = load_sweep_toml(&dir).unwrap();
    assert!(file.is_some());
    let cli = Cli::parse_from(["rangesweep", "chain.db", "--cap", "100", "--from", "7"]);
    let settings = resolve_settings(&cli, file.as_ref());
    assert_eq!(settings.table.as_deref(), Some("transfers"));
    assert_eq!(settings.key.as_deref(), Some("block"));
    assert_eq!(settings.cap, 100);
    assert_eq!(settings.from, Some(7));
    assert_eq!(settings.to, None);
    assert_eq!(settings.opts.initial_width, 64);
    assert_eq!(settings.opts.min_width, 1);
    assert_eq!(settings.opts.max_width, 4096);
    assert_eq!(settings.opts.overflow_markers, vec!["limit exceeded".to_string()]);
    assert!(!settings.verbose);
}

#[test]
fn test_resolve_settings_without_file() {
    let dir = scratch_dir("resolve_settings_bare");
    let file = load_sweep_toml(&dir).unwrap();
    assert!(file.is_none());
    let cli = Cli::parse_from(["rangesweep", "chain.db", "-t", "logs", "-k", "n", "-v"]);
    let settings = resolve_settings(&cli, file.as_ref());
    assert_eq!(settings.db_path, PathBuf::from("chain.db"));
    assert_eq!(settings.table.as_deref(), Some("logs"));
    assert_eq!(settings.cap, rangesweep::utils::DEFAULT_QUERY_CAP);
    assert!(settings.verbose);
}

#[test]
fn test_load_sweep_toml_reports_invalid_file() {
    let dir = scratch_dir("invalid_config");
    std::fs::write(
        dir.join(".rangesweep.toml"),
        "[sweep]\ntable = \"ev\"\nkey = \"block\"\ncapp = 3\n",
    )
    .unwrap();

    let err = load_sweep_toml(&dir).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains(".rangesweep.toml"), "{msg}");
    assert!(msg.contains("capp"), "{msg}");

    // Flags still resolve when the file is rejected.
    let cli = Cli::parse_from(["rangesweep", "t.db", "-t", "ev", "-k", "block", "-c", "5"]);
    let settings = resolve_settings(&cli, None);
    assert_eq!(settings.cap, 5);
}
