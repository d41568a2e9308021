use crate::compiler::StatementBase;
use crate::driver::Connection;
use crate::error::SqlFluentError;
use crate::results::QueryResult;
use crate::types::RowValues;

use super::QueryBuilder;

impl<C: Connection> QueryBuilder<'_, C> {
    /// SELECT `columns` (all columns when empty) from `table`.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConfigError` for an invalid fragment such as an empty IN list.
    /// Driver failures come back as `Ok(QueryResult::Failure(_))`.
    pub fn get(self, table: &str, columns: &[&str]) -> Result<QueryResult, SqlFluentError> {
        self.run(StatementBase::select(table, columns))
    }

    /// Like [`QueryBuilder::get`] with `LIMIT 1`, keeping at most one record.
    ///
    /// # Errors
    /// See [`QueryBuilder::get`].
    pub fn get_one(self, table: &str, columns: &[&str]) -> Result<QueryResult, SqlFluentError> {
        Ok(self.limit(1).get(table, columns)?.first_row_only())
    }

    /// Values of a single column across all matching rows.
    ///
    /// # Errors
    /// Returns configuration errors as [`QueryBuilder::get`] does, and driver failures as
    /// `PrepareFailed` / `ExecuteFailed`.
    pub fn get_col(self, table: &str, column: &str) -> Result<Vec<RowValues>, SqlFluentError> {
        self.get(table, &[column])?.into_column(column)
    }

    /// The named column of the first matching row.
    ///
    /// # Errors
    /// See [`QueryBuilder::get_col`].
    pub fn get_var(self, table: &str, column: &str) -> Result<Option<RowValues>, SqlFluentError> {
        self.limit(1).get(table, &[column])?.into_scalar(column)
    }
}
