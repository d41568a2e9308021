// SQLite driver. Split into:
// - config: open options
// - params: RowValues -> rusqlite values
// - query: rusqlite rows -> RowValues
// - connection: the Connection/Statement/ExecutionOutcome impls

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::{SqliteConnection, SqliteOutcome, SqliteStatement};
