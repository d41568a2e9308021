//! Fluent SQL statement builder with positional `?` parameter binding.
//!
//! A [`Session`] owns a driver connection. Each statement starts with [`Session::builder`],
//! accumulates conditions, joins, ordering, grouping and pagination, and ends with a terminal
//! call that compiles the fragments into one parameterized statement, runs it, and shapes the
//! outcome as a [`QueryResult`]. Values only ever reach the database through bound
//! placeholders; field and table names are embedded verbatim and must be trusted.
//!
//! ```rust,no_run
//! use sql_fluent::prelude::*;
//!
//! # fn main() -> Result<(), SqlFluentError> {
//! let cfg = ConnectionConfig::builder("app.db").finish();
//! let mut session = Session::<SqliteConnection>::connect(&cfg)?;
//!
//! let id = session
//!     .builder()
//!     .insert("users", RowData::new().set("name", "ada").set("active", true))?;
//!
//! let users = session
//!     .builder()
//!     .where_clause("active", true)
//!     .order_by("name", "asc")?
//!     .get("users", &["id", "name"])?
//!     .into_rows()?;
//! # let _ = (id, users);
//! # Ok(())
//! # }
//! ```

pub mod async_session;
pub mod compiler;
pub mod config;
pub mod driver;
pub mod error;
pub mod placeholders;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod session;
pub mod state;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use async_session::AsyncSession;
pub use compiler::{CompiledQuery, StatementBase, compile};
pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use error::{DbFailure, DriverError, SqlFluentError};
pub use query_builder::QueryBuilder;
pub use results::{AssocRow, CustomDbRow, QueryResult, Record, ResultSet};
pub use session::Session;
pub use state::{JoinType, OrderDirection, Predicate, QueryState};
pub use types::{BindValue, OutputMode, ParamType, RowData, RowValues};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteOptions, SqliteOptionsBuilder};
