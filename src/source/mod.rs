//! Concrete upstreams. The library core works with any [`Upstream`](crate::Upstream); the CLI sweeps SQLite tables.

pub mod sqlite;

pub use sqlite::{Row, SqliteUpstream, open_source_db, quote_ident, value_to_json};
