//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and traits
//! to make it easier to get started with the library.

pub use crate::async_session::AsyncSession;
pub use crate::config::{ConnectionConfig, ConnectionConfigBuilder};
pub use crate::driver::{Connect, Connection, ExecutionOutcome, Statement, StatementKind};
pub use crate::error::{DbFailure, DriverError, SqlFluentError};
pub use crate::query_builder::QueryBuilder;
pub use crate::results::{AssocRow, CustomDbRow, QueryResult, Record, ResultSet};
pub use crate::session::Session;
pub use crate::state::{JoinType, OrderDirection, Predicate};
pub use crate::types::{OutputMode, RowData, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteOptions, SqliteOptionsBuilder};
