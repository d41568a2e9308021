//! Collaborator interfaces the builder consumes.
//!
//! A driver owns transport, authentication and statement execution. The builder only hands it
//! SQL text with positional `?` markers and a bind list in the same order.

use crate::config::ConnectionConfig;
use crate::error::{DriverError, SqlFluentError};
use crate::types::{BindValue, RowValues};

/// Result of executing a prepared statement.
pub trait ExecutionOutcome {
    /// Output column names in driver order, or `None` when the statement produces no result set.
    fn metadata(&self) -> Option<&[String]>;

    /// Next row of values, one per metadata column.
    ///
    /// # Errors
    /// Returns `DriverError` if the driver fails while stepping the result set.
    fn fetch_next(&mut self) -> Result<Option<Vec<RowValues>>, DriverError>;

    fn affected_row_count(&self) -> u64;

    /// Id generated by an INSERT, 0 when none was produced.
    fn last_insert_id(&self) -> u64;
}

/// A statement prepared against a connection.
pub trait Statement {
    type Outcome<'s>: ExecutionOutcome
    where
        Self: 's;

    /// Number of positional parameters the driver parsed out of the SQL text.
    fn param_count(&self) -> usize;

    /// Bind all values positionally, first value to the first marker.
    ///
    /// # Errors
    /// Returns `DriverError` if the driver refuses a value.
    fn bind(&mut self, values: &[BindValue]) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if execution fails.
    fn execute(&mut self) -> Result<Self::Outcome<'_>, DriverError>;
}

/// An open session with a database server.
pub trait Connection {
    type Statement<'c>: Statement
    where
        Self: 'c;

    /// # Errors
    /// Returns `DriverError` when the driver rejects the SQL text.
    fn prepare(&mut self, sql: &str) -> Result<Self::Statement<'_>, DriverError>;

    /// Escape text for embedding inside a quoted literal. Not used by the builder.
    fn escape_literal(&self, text: &str) -> String;

    /// # Errors
    /// Returns `DriverError` if the driver cannot switch modes.
    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the commit fails.
    fn commit(&mut self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if the rollback fails.
    fn rollback(&mut self) -> Result<(), DriverError>;

    /// # Errors
    /// Returns `DriverError` if a transaction cannot be started.
    fn begin_transaction(&mut self) -> Result<(), DriverError> {
        self.set_autocommit(false)
    }
}

/// Establish a connection from configuration.
pub trait Connect: Connection + Sized {
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the connection cannot be opened.
    fn connect(config: &ConnectionConfig) -> Result<Self, SqlFluentError>;
}

/// Statement kind, read from the leading keyword of the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    #[must_use]
    pub fn detect(sql: &str) -> Self {
        let keyword = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();
        if keyword.eq_ignore_ascii_case("select") {
            StatementKind::Select
        } else if keyword.eq_ignore_ascii_case("insert") {
            StatementKind::Insert
        } else if keyword.eq_ignore_ascii_case("update") {
            StatementKind::Update
        } else if keyword.eq_ignore_ascii_case("delete") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }
}
