use crate::compiler::StatementBase;
use crate::driver::Connection;
use crate::error::SqlFluentError;
use crate::results::QueryResult;
use crate::types::RowData;

use super::QueryBuilder;

impl<C: Connection> QueryBuilder<'_, C> {
    /// INSERT one row. Yields `GeneratedId` when the driver reports a new id, else
    /// `Success(true)`.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConfigError` when `data` is empty.
    pub fn insert(self, table: &str, data: RowData) -> Result<QueryResult, SqlFluentError> {
        self.run(StatementBase::Insert {
            table: table.to_string(),
            data,
        })
    }

    /// UPDATE the rows matching the accumulated conditions. Yields `AffectedCount`.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConfigError` when `data` is empty.
    pub fn update(self, table: &str, data: RowData) -> Result<QueryResult, SqlFluentError> {
        self.run(StatementBase::Update {
            table: table.to_string(),
            data,
        })
    }

    /// DELETE the rows matching the accumulated conditions. Yields `AffectedCount`.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConfigError` for an invalid condition such as an empty IN list.
    pub fn delete(self, table: &str) -> Result<QueryResult, SqlFluentError> {
        self.run(StatementBase::Delete {
            table: table.to_string(),
        })
    }
}
