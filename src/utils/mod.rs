pub mod config;
pub mod logger;
pub mod sweep_toml;

pub use config::*;
pub use logger::setup_logging;
pub use sweep_toml::{SweepToml, apply_file_to_settings, load_sweep_toml, parse_sweep_toml};
