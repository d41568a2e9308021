//! Interpretation of a driver's execution outcome.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::{AssocRow, CustomDbRow, Record};

use crate::driver::{ExecutionOutcome, StatementKind};
use crate::error::{DbFailure, SqlFluentError};
use crate::types::{OutputMode, RowValues};

/// What a statement produced.
#[derive(Debug, Clone)]
pub enum QueryResult {
    Rows(ResultSet),
    AffectedCount(u64),
    GeneratedId(u64),
    Success(bool),
    Failure(DbFailure),
}

impl QueryResult {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, QueryResult::Failure(_))
    }

    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            QueryResult::Rows(rs) => Some(rs),
            _ => None,
        }
    }

    /// Turn a captured failure into an error for `?` callers.
    ///
    /// # Errors
    /// Returns the `PrepareFailed` / `ExecuteFailed` error held by a `Failure`.
    pub fn into_result(self) -> Result<QueryResult, SqlFluentError> {
        match self {
            QueryResult::Failure(failure) => Err(failure.into()),
            other => Ok(other),
        }
    }

    /// The row set, or an error for failures and non-row outcomes.
    ///
    /// # Errors
    /// Returns the captured failure, or `SqlFluentError::Other` when the statement produced no
    /// result set.
    pub fn into_rows(self) -> Result<ResultSet, SqlFluentError> {
        match self.into_result()? {
            QueryResult::Rows(rs) => Ok(rs),
            other => Err(SqlFluentError::Other(format!(
                "statement produced no result set: {other:?}"
            ))),
        }
    }

    /// Keep at most one record. Non-row outcomes pass through untouched.
    #[must_use]
    pub fn first_row_only(self) -> Self {
        match self {
            QueryResult::Rows(mut rs) => {
                rs.truncate_to_first();
                QueryResult::Rows(rs)
            }
            other => other,
        }
    }

    /// Project one column across all records.
    ///
    /// # Errors
    /// See [`QueryResult::into_rows`].
    pub fn into_column(self, name: &str) -> Result<Vec<RowValues>, SqlFluentError> {
        Ok(self.into_rows()?.column(name))
    }

    /// The named column of the first record, `None` when there are no rows.
    ///
    /// # Errors
    /// See [`QueryResult::into_rows`].
    pub fn into_scalar(self, name: &str) -> Result<Option<RowValues>, SqlFluentError> {
        Ok(self.into_rows()?.scalar(name))
    }
}

/// Build a [`QueryResult`] from an executed statement.
///
/// Without result-set metadata the statement kind decides the shape: SELECT yields empty rows,
/// UPDATE/DELETE the affected count, INSERT the generated id (or `Success(true)` when none),
/// anything else `Success(true)`. A fetch error discards any rows already read.
pub fn materialize<O: ExecutionOutcome>(
    outcome: &mut O,
    sql: &str,
    mode: OutputMode,
) -> QueryResult {
    let Some(columns) = outcome.metadata() else {
        return match StatementKind::detect(sql) {
            StatementKind::Select => QueryResult::Rows(ResultSet::empty(mode)),
            StatementKind::Update | StatementKind::Delete => {
                QueryResult::AffectedCount(outcome.affected_row_count())
            }
            StatementKind::Insert => match outcome.last_insert_id() {
                0 => QueryResult::Success(true),
                id => QueryResult::GeneratedId(id),
            },
            StatementKind::Other => QueryResult::Success(true),
        };
    };

    let mut result_set = ResultSet::new(columns.to_vec(), mode);
    loop {
        match outcome.fetch_next() {
            Ok(Some(values)) => result_set.add_row_values(values),
            Ok(None) => break,
            Err(e) => {
                return QueryResult::Failure(DbFailure::ExecuteFailed {
                    message: e.to_string(),
                });
            }
        }
    }
    QueryResult::Rows(result_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use std::collections::VecDeque;

    struct FakeOutcome {
        columns: Option<Vec<String>>,
        rows: VecDeque<Result<Vec<RowValues>, DriverError>>,
        affected: u64,
        insert_id: u64,
    }

    impl FakeOutcome {
        fn no_metadata(affected: u64, insert_id: u64) -> Self {
            Self {
                columns: None,
                rows: VecDeque::new(),
                affected,
                insert_id,
            }
        }
    }

    impl ExecutionOutcome for FakeOutcome {
        fn metadata(&self) -> Option<&[String]> {
            self.columns.as_deref()
        }

        fn fetch_next(&mut self) -> Result<Option<Vec<RowValues>>, DriverError> {
            self.rows.pop_front().transpose()
        }

        fn affected_row_count(&self) -> u64 {
            self.affected
        }

        fn last_insert_id(&self) -> u64 {
            self.insert_id
        }
    }

    #[test]
    fn classification_without_metadata() {
        let mode = OutputMode::Object;
        let r = materialize(&mut FakeOutcome::no_metadata(0, 0), "SELECT a FROM t", mode);
        assert!(matches!(r, QueryResult::Rows(rs) if rs.is_empty()));

        let r = materialize(&mut FakeOutcome::no_metadata(0, 0), "UPDATE t SET a = ?", mode);
        assert!(matches!(r, QueryResult::AffectedCount(0)));

        let r = materialize(&mut FakeOutcome::no_metadata(3, 0), "DELETE FROM t", mode);
        assert!(matches!(r, QueryResult::AffectedCount(3)));

        let r = materialize(&mut FakeOutcome::no_metadata(1, 42), "INSERT INTO t(a) VALUES(?)", mode);
        assert!(matches!(r, QueryResult::GeneratedId(42)));

        let r = materialize(&mut FakeOutcome::no_metadata(1, 0), "INSERT INTO t(a) VALUES(?)", mode);
        assert!(matches!(r, QueryResult::Success(true)));

        let r = materialize(&mut FakeOutcome::no_metadata(0, 0), "CREATE TABLE t (a)", mode);
        assert!(matches!(r, QueryResult::Success(true)));
    }

    #[test]
    fn streams_rows_in_column_order() {
        let mut outcome = FakeOutcome {
            columns: Some(vec!["id".into(), "name".into()]),
            rows: VecDeque::from(vec![
                Ok(vec![RowValues::Int(1), RowValues::Text("a".into())]),
                Ok(vec![RowValues::Int(2), RowValues::Text("b".into())]),
            ]),
            affected: 0,
            insert_id: 0,
        };
        let rs = materialize(&mut outcome, "SELECT id, name FROM t", OutputMode::AssocArray)
            .into_rows()
            .unwrap();
        assert_eq!(rs.len(), 2);
        let first = rs.results[0].as_assoc().unwrap();
        let order: Vec<&str> = first.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["id", "name"]);
    }

    #[test]
    fn fetch_error_returns_no_partial_rows() {
        let mut outcome = FakeOutcome {
            columns: Some(vec!["id".into()]),
            rows: VecDeque::from(vec![
                Ok(vec![RowValues::Int(1)]),
                Err(DriverError::new("disk I/O error")),
            ]),
            affected: 0,
            insert_id: 0,
        };
        let r = materialize(&mut outcome, "SELECT id FROM t", OutputMode::Object);
        assert!(matches!(
            r,
            QueryResult::Failure(DbFailure::ExecuteFailed { ref message }) if message.contains("disk")
        ));
    }

    #[test]
    fn convenience_views() {
        let mut rs = ResultSet::new(vec!["v".into()], OutputMode::Object);
        rs.add_row_values(vec![RowValues::Int(1)]);
        rs.add_row_values(vec![RowValues::Int(2)]);
        let result = QueryResult::Rows(rs);

        let first = result.clone().first_row_only();
        assert_eq!(first.rows().map(ResultSet::len), Some(1));
        assert_eq!(
            result.clone().into_column("v").unwrap(),
            vec![RowValues::Int(1), RowValues::Int(2)]
        );
        assert_eq!(result.into_scalar("v").unwrap(), Some(RowValues::Int(1)));

        let failed = QueryResult::Failure(DbFailure::ExecuteFailed {
            message: "x".into(),
        });
        assert!(matches!(
            failed.into_column("v"),
            Err(SqlFluentError::ExecuteFailed(_))
        ));
        assert!(QueryResult::AffectedCount(1).into_rows().is_err());
    }
}
