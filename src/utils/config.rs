//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Optional per-directory config file (e.g. `.rangesweep.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Chunk widths ----

/// Chunk width defaults for the controller.
pub struct ChunkConsts;

impl ChunkConsts {
    /// First range width requested.
    pub const INITIAL_WIDTH: u64 = 5000;
    /// Floor; an overflow at this width is fatal.
    pub const MIN_WIDTH: u64 = 1;
    /// Ceiling for doubling over empty stretches.
    pub const MAX_WIDTH: u64 = 1_000_000;
    /// JSON-RPC `eth_getLogs` refusal text.
    pub const DEFAULT_OVERFLOW_MARKER: &'static str = "query returned more than";
}

// ---- Upstream cap ----

/// Rows a single query may return in the SQLite source before it reports overflow.
pub const DEFAULT_QUERY_CAP: u64 = 10_000;
