//! Load `.rangesweep.toml` from a directory (CLI only). The library takes its settings through `SweepOpts`.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::sweep::SweepSettings;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct SweepToml {
    #[serde(default)]
    sweep: SweepSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SweepSection {
    table: Option<String>,
    key: Option<String>,
    cap: Option<u64>,
    initial_width: Option<u64>,
    min_width: Option<u64>,
    max_width: Option<u64>,
    overflow_markers: Option<Vec<String>>,
    verbose: Option<bool>,
}

/// Parse config text. Errors are returned so callers decide whether to warn or fail.
pub fn parse_sweep_toml(s: &str) -> Result<SweepToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the config file from `dir`. `Ok(None)` when there is no file; a file that cannot be
/// read or parsed is an error so the caller can report it once logging is up.
pub fn load_sweep_toml(dir: &Path) -> anyhow::Result<Option<SweepToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let file = parse_sweep_toml(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite a settings field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $settings:expr, $field:ident => opt) => {
        if let Some(v) = $sec.$field.clone() {
            $settings.$field = Some(v);
        }
    };
    ($sec:expr, $settings:expr, $field:ident) => {
        if let Some(v) = $sec.$field.clone() {
            $settings.$field = v;
        }
    };
}

/// Apply file config to settings (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_settings(file: &SweepToml, settings: &mut SweepSettings) {
    let sec = &file.sweep;
    apply_file_opt!(sec, settings, table => opt);
    apply_file_opt!(sec, settings, key => opt);
    apply_file_opt!(sec, settings, cap);
    apply_file_opt!(sec, settings.opts, initial_width);
    apply_file_opt!(sec, settings.opts, min_width);
    apply_file_opt!(sec, settings.opts, max_width);
    apply_file_opt!(sec, settings.opts, overflow_markers);
    apply_file_opt!(sec, settings, verbose);
}
