//! CLI command handler: resolve settings (defaults → config file → flags) and run the table sweep.

use anyhow::Result;
use log::{debug, warn};
use std::path::Path;

use crate::engine::arg_parser::Cli;
use crate::sweep::{SweepSettings, sweep_table};
use crate::utils::{SweepToml, apply_file_to_settings, load_sweep_toml, setup_logging};

/// Overwrite a settings field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $settings:expr, $field:ident) => {
        if let Some(v) = $cli.$field.clone() {
            $settings.$field = v;
        }
    };
}

/// Build settings from defaults, then `file` (if any), then `cli`.
pub fn resolve_settings(cli: &Cli, file: Option<&SweepToml>) -> SweepSettings {
    let mut settings = SweepSettings::new(&cli.db);
    if let Some(file) = file {
        apply_file_to_settings(file, &mut settings);
    }
    if cli.table.is_some() {
        settings.table = cli.table.clone();
    }
    if cli.key.is_some() {
        settings.key = cli.key.clone();
    }
    settings.from = cli.from.or(settings.from);
    settings.to = cli.to.or(settings.to);
    settings.output = cli.output.clone().or(settings.output);
    apply_cli_opt!(cli, settings, cap);
    apply_cli_opt!(cli, settings, verbose);
    apply_cli_opt!(cli, settings.opts, initial_width);
    apply_cli_opt!(cli, settings.opts, min_width);
    apply_cli_opt!(cli, settings.opts, max_width);
    settings
}

/// Run the sweep described by `cli`, reading `.rangesweep.toml` from the current directory.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let file = load_sweep_toml(Path::new("."));
    let settings = resolve_settings(cli, file.as_ref().ok().and_then(Option::as_ref));
    setup_logging(settings.verbose);
    if let Err(e) = &file {
        warn!("{e:#}; config file ignored");
    }
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        settings
    );
    sweep_table(&settings)?;
    Ok(())
}
