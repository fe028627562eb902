//! Engine module: the sweep machinery plus CLI parsing and handlers

pub mod arg_parser;
pub mod cli;
pub mod controller;
pub mod core;
pub mod cursor;
pub mod executor;
pub mod progress;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use controller::{ChunkSizeController, next_width};
pub use self::core::CollectionLoop;
pub use cursor::RangeCursor;
pub use executor::{OverflowMatcher, QueryExecutor, Upstream, UpperBound};
pub use progress::{ProgressReporter, ProgressSink, progress_sink};
