use crate::config::ConnectionConfig;
use crate::driver::{Connect, Connection, ExecutionOutcome, Statement, StatementKind};
use crate::error::{DriverError, SqlFluentError};
use crate::types::{BindValue, RowValues};

use super::config::SqliteOptions;
use super::params::row_value_to_sqlite_value;
use super::query::sqlite_extract_row;

/// A single `SQLite` connection driven through the blocking rusqlite API.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Open the database described by `options`, applying WAL pragmas to file databases.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the file cannot be opened or configured.
    pub fn open(options: &SqliteOptions) -> Result<Self, SqlFluentError> {
        let conn = if options.is_memory() {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(&options.db_path)
        }
        .map_err(|e| {
            SqlFluentError::ConnectionError(format!(
                "Failed to open SQLite database {}: {e}",
                options.db_path
            ))
        })?;

        if options.wal && !options.is_memory() {
            conn.execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(|e| SqlFluentError::ConnectionError(format!("WAL pragma failed: {e}")))?;
        }
        tracing::debug!(path = %options.db_path, "sqlite connection opened");
        Ok(Self { conn })
    }

    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqlFluentError> {
        Self::open(&SqliteOptions::in_memory())
    }

    /// Wrap an already-open rusqlite connection.
    #[must_use]
    pub fn from_rusqlite(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Run one or more `;`-separated statements without parameters or results.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ExecuteFailed` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SqlFluentError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| SqlFluentError::ExecuteFailed(e.to_string()))
    }

    #[must_use]
    pub fn as_rusqlite(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl Connect for SqliteConnection {
    fn connect(config: &ConnectionConfig) -> Result<Self, SqlFluentError> {
        Self::open(&SqliteOptions::from(config))
    }
}

impl Connection for SqliteConnection {
    type Statement<'c> = SqliteStatement<'c>;

    fn prepare(&mut self, sql: &str) -> Result<SqliteStatement<'_>, DriverError> {
        let conn = &self.conn;
        let stmt = conn.prepare(sql)?;
        Ok(SqliteStatement {
            conn,
            stmt,
            is_insert: StatementKind::detect(sql) == StatementKind::Insert,
        })
    }

    fn escape_literal(&self, text: &str) -> String {
        text.replace('\'', "''")
    }

    fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError> {
        match (enabled, self.conn.is_autocommit()) {
            (false, true) => self.conn.execute_batch("BEGIN")?,
            (true, false) => self.conn.execute_batch("COMMIT")?,
            _ => {}
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}

/// A prepared `SQLite` statement.
pub struct SqliteStatement<'c> {
    conn: &'c rusqlite::Connection,
    stmt: rusqlite::Statement<'c>,
    is_insert: bool,
}

impl Statement for SqliteStatement<'_> {
    type Outcome<'s>
        = SqliteOutcome<'s>
    where
        Self: 's;

    fn param_count(&self) -> usize {
        self.stmt.parameter_count()
    }

    fn bind(&mut self, values: &[BindValue]) -> Result<(), DriverError> {
        for (idx, bind) in values.iter().enumerate() {
            // rusqlite parameters are 1-based
            self.stmt
                .raw_bind_parameter(idx + 1, row_value_to_sqlite_value(&bind.value))?;
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<SqliteOutcome<'_>, DriverError> {
        if self.stmt.column_count() > 0 {
            let columns: Vec<String> = self
                .stmt
                .column_names()
                .into_iter()
                .map(ToString::to_string)
                .collect();
            let rows = self.stmt.raw_query();
            return Ok(SqliteOutcome::Rows { columns, rows });
        }

        // WITHOUT ROWID inserts leave last_insert_rowid untouched
        let rowid_before = self.conn.last_insert_rowid();
        let affected = self.stmt.raw_execute()?;
        let rowid_after = self.conn.last_insert_rowid();
        let insert_id = if self.is_insert && affected > 0 && rowid_after != rowid_before {
            u64::try_from(rowid_after).unwrap_or(0)
        } else {
            0
        };
        Ok(SqliteOutcome::Done {
            affected: affected as u64,
            insert_id,
        })
    }
}

/// Outcome of a `SQLite` statement: either a live row cursor or the counters of a finished
/// statement.
pub enum SqliteOutcome<'s> {
    Rows {
        columns: Vec<String>,
        rows: rusqlite::Rows<'s>,
    },
    Done {
        affected: u64,
        insert_id: u64,
    },
}

impl ExecutionOutcome for SqliteOutcome<'_> {
    fn metadata(&self) -> Option<&[String]> {
        match self {
            SqliteOutcome::Rows { columns, .. } => Some(columns),
            SqliteOutcome::Done { .. } => None,
        }
    }

    fn fetch_next(&mut self) -> Result<Option<Vec<RowValues>>, DriverError> {
        match self {
            SqliteOutcome::Rows { columns, rows } => match rows.next()? {
                Some(row) => Ok(Some(sqlite_extract_row(row, columns.len())?)),
                None => Ok(None),
            },
            SqliteOutcome::Done { .. } => Ok(None),
        }
    }

    fn affected_row_count(&self) -> u64 {
        match self {
            SqliteOutcome::Done { affected, .. } => *affected,
            SqliteOutcome::Rows { .. } => 0,
        }
    }

    fn last_insert_id(&self) -> u64 {
        match self {
            SqliteOutcome::Done { insert_id, .. } => *insert_id,
            SqliteOutcome::Rows { .. } => 0,
        }
    }
}
