use crate::compiler::CompiledQuery;
use crate::config::ConnectionConfig;
use crate::driver::{Connect, Connection, Statement};
use crate::error::{DbFailure, SqlFluentError};
use crate::placeholders::count_placeholders;
use crate::query_builder::QueryBuilder;
use crate::results::{QueryResult, materialize};
use crate::types::{BindValue, OutputMode, RowValues};

/// A connection plus the bookkeeping of the statements run on it.
///
/// One statement is in flight at a time: [`Session::builder`] borrows the session mutably until
/// the builder's terminal call consumes it.
pub struct Session<C: Connection> {
    conn: C,
    output_mode: OutputMode,
    last_query: Option<String>,
    last_error: Option<DbFailure>,
    last_insert_id: u64,
    in_transaction: bool,
}

impl<C: Connect> Session<C> {
    /// Open a connection through the driver and wrap it.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the driver cannot connect.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, SqlFluentError> {
        let conn = C::connect(config)?;
        Ok(Self::new(conn).with_output_mode(config.output_mode))
    }
}

impl<C: Connection> Session<C> {
    #[must_use]
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            output_mode: OutputMode::default(),
            last_query: None,
            last_error: None,
            last_insert_id: 0,
            in_transaction: false,
        }
    }

    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Record shape for raw queries and for new builders.
    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Start a fresh statement.
    pub fn builder(&mut self) -> QueryBuilder<'_, C> {
        QueryBuilder::new(self)
    }

    /// Run hand-written SQL, binding `params` to its `?` markers in order.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ParameterError` when the number of markers differs from
    /// `params.len()`. Driver failures come back as `Ok(QueryResult::Failure(_))`.
    pub fn raw_query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryResult, SqlFluentError> {
        let markers = count_placeholders(sql);
        if markers != params.len() {
            return Err(SqlFluentError::ParameterError(format!(
                "query has {markers} placeholders but {} params were supplied",
                params.len()
            )));
        }
        let binds: Vec<BindValue> = params.iter().cloned().map(BindValue::new).collect();
        let mode = self.output_mode;
        self.execute(sql, &binds, mode).map_err(|err| match err {
            SqlFluentError::BindArityMismatch {
                placeholders,
                values,
                ..
            } => SqlFluentError::ParameterError(format!(
                "driver expects {placeholders} params but {values} were supplied"
            )),
            other => other,
        })
    }

    /// Run a statement without parameters.
    ///
    /// # Errors
    /// See [`Session::raw_query`].
    pub fn query(&mut self, sql: &str) -> Result<QueryResult, SqlFluentError> {
        self.raw_query(sql, &[])
    }

    pub(crate) fn execute_compiled(
        &mut self,
        compiled: &CompiledQuery,
        mode: OutputMode,
    ) -> Result<QueryResult, SqlFluentError> {
        self.execute(&compiled.sql, &compiled.binds, mode)
    }

    fn execute(
        &mut self,
        sql: &str,
        binds: &[BindValue],
        mode: OutputMode,
    ) -> Result<QueryResult, SqlFluentError> {
        tracing::debug!(sql, binds = binds.len(), "executing statement");
        self.last_query = Some(sql.to_string());
        self.last_error = None;

        let result = match run_statement(&mut self.conn, sql, binds, mode) {
            Ok(result) => result,
            Err(err) => {
                self.last_error = Some(DbFailure::ExecuteFailed {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };
        match &result {
            QueryResult::Failure(failure) => {
                tracing::warn!(sql, error = %failure, "statement failed");
                self.last_error = Some(failure.clone());
            }
            QueryResult::GeneratedId(id) => self.last_insert_id = *id,
            _ => {}
        }
        Ok(result)
    }

    /// SQL text of the most recent statement, successful or not.
    #[must_use]
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Failure of the most recent statement, cleared when the next one starts.
    #[must_use]
    pub fn last_error(&self) -> Option<&DbFailure> {
        self.last_error.as_ref()
    }

    /// Id generated by the most recent INSERT that produced one.
    #[must_use]
    pub fn insert_id(&self) -> u64 {
        self.last_insert_id
    }

    /// Escape text for use inside a quoted literal in hand-written SQL.
    #[must_use]
    pub fn escape(&self, text: &str) -> String {
        self.conn.escape_literal(text)
    }

    #[must_use]
    pub fn connection(&self) -> &C {
        &self.conn
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Switch the connection out of autocommit.
    ///
    /// Returns `Ok(false)` if a transaction is already open.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the driver refuses.
    pub fn begin_transaction(&mut self) -> Result<bool, SqlFluentError> {
        if self.in_transaction {
            return Ok(false);
        }
        self.conn
            .begin_transaction()
            .map_err(|e| SqlFluentError::ConnectionError(format!("begin transaction: {e}")))?;
        self.in_transaction = true;
        tracing::debug!("transaction started");
        Ok(true)
    }

    /// Commit and return to autocommit. `Ok(false)` outside a transaction.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the commit fails.
    pub fn commit_transaction(&mut self) -> Result<bool, SqlFluentError> {
        if !self.in_transaction {
            return Ok(false);
        }
        self.in_transaction = false;
        self.conn
            .commit()
            .map_err(|e| SqlFluentError::ConnectionError(format!("commit: {e}")))?;
        self.conn
            .set_autocommit(true)
            .map_err(|e| SqlFluentError::ConnectionError(format!("restore autocommit: {e}")))?;
        tracing::debug!("transaction committed");
        Ok(true)
    }

    /// Roll back and return to autocommit. `Ok(false)` outside a transaction.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConnectionError` if the rollback fails.
    pub fn rollback_transaction(&mut self) -> Result<bool, SqlFluentError> {
        if !self.in_transaction {
            return Ok(false);
        }
        self.in_transaction = false;
        self.conn
            .rollback()
            .map_err(|e| SqlFluentError::ConnectionError(format!("rollback: {e}")))?;
        self.conn
            .set_autocommit(true)
            .map_err(|e| SqlFluentError::ConnectionError(format!("restore autocommit: {e}")))?;
        tracing::debug!("transaction rolled back");
        Ok(true)
    }
}

impl<C: Connection> Drop for Session<C> {
    fn drop(&mut self) {
        if self.in_transaction {
            tracing::warn!("session dropped inside a transaction; rolling back");
            if let Err(e) = self.rollback_transaction() {
                tracing::warn!(error = %e, "rollback on drop failed");
            }
        }
    }
}

/// prepare → bind → execute → materialize. Only a marker/value disagreement is an `Err`.
fn run_statement<C: Connection>(
    conn: &mut C,
    sql: &str,
    binds: &[BindValue],
    mode: OutputMode,
) -> Result<QueryResult, SqlFluentError> {
    let mut stmt = match conn.prepare(sql) {
        Ok(stmt) => stmt,
        Err(e) => {
            return Ok(QueryResult::Failure(DbFailure::PrepareFailed {
                sql: sql.to_string(),
                message: e.to_string(),
            }));
        }
    };

    let expected = stmt.param_count();
    if expected != binds.len() {
        tracing::error!(sql, placeholders = expected, values = binds.len(), "bind arity mismatch");
        return Err(SqlFluentError::BindArityMismatch {
            sql: sql.to_string(),
            placeholders: expected,
            values: binds.len(),
        });
    }

    if let Err(e) = stmt.bind(binds) {
        return Ok(QueryResult::Failure(DbFailure::ExecuteFailed {
            message: e.to_string(),
        }));
    }

    let mut outcome = match stmt.execute() {
        Ok(outcome) => outcome,
        Err(e) => {
            return Ok(QueryResult::Failure(DbFailure::ExecuteFailed {
                message: e.to_string(),
            }));
        }
    };
    Ok(materialize(&mut outcome, sql, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ExecutionOutcome;
    use crate::error::DriverError;

    // Records the calls it receives; every statement reports `params` markers.
    #[derive(Default)]
    struct ScriptedConnection {
        params: usize,
        calls: Vec<String>,
    }

    struct ScriptedStatement<'c> {
        conn: &'c mut ScriptedConnection,
    }

    struct Finished;

    impl ExecutionOutcome for Finished {
        fn metadata(&self) -> Option<&[String]> {
            None
        }

        fn fetch_next(&mut self) -> Result<Option<Vec<RowValues>>, DriverError> {
            Ok(None)
        }

        fn affected_row_count(&self) -> u64 {
            4
        }

        fn last_insert_id(&self) -> u64 {
            0
        }
    }

    impl Statement for ScriptedStatement<'_> {
        type Outcome<'s>
            = Finished
        where
            Self: 's;

        fn param_count(&self) -> usize {
            self.conn.params
        }

        fn bind(&mut self, values: &[BindValue]) -> Result<(), DriverError> {
            self.conn.calls.push(format!("bind {}", values.len()));
            Ok(())
        }

        fn execute(&mut self) -> Result<Finished, DriverError> {
            self.conn.calls.push("execute".into());
            Ok(Finished)
        }
    }

    impl Connection for ScriptedConnection {
        type Statement<'c> = ScriptedStatement<'c>;

        fn prepare(&mut self, sql: &str) -> Result<ScriptedStatement<'_>, DriverError> {
            self.calls.push(format!("prepare {sql}"));
            Ok(ScriptedStatement { conn: self })
        }

        fn escape_literal(&self, text: &str) -> String {
            text.to_string()
        }

        fn set_autocommit(&mut self, enabled: bool) -> Result<(), DriverError> {
            self.calls.push(format!("autocommit {enabled}"));
            Ok(())
        }

        fn commit(&mut self) -> Result<(), DriverError> {
            self.calls.push("commit".into());
            Ok(())
        }

        fn rollback(&mut self) -> Result<(), DriverError> {
            self.calls.push("rollback".into());
            Ok(())
        }
    }

    #[test]
    fn builder_statement_runs_prepare_bind_execute() {
        let mut session = Session::new(ScriptedConnection {
            params: 2,
            ..ScriptedConnection::default()
        });
        let result = session
            .builder()
            .where_clause("id", 3)
            .update("t", crate::types::RowData::new().set("a", 5))
            .unwrap();
        assert!(matches!(result, QueryResult::AffectedCount(4)));
        assert_eq!(
            session.connection().calls,
            vec!["prepare UPDATE t SET a = ? WHERE id = ?", "bind 2", "execute"]
        );
    }

    #[test]
    fn driver_marker_count_disagreement_is_arity_error() {
        let mut session = Session::new(ScriptedConnection {
            params: 1,
            ..ScriptedConnection::default()
        });
        let err = session
            .builder()
            .where_clause("a", 1)
            .where_clause("b", 2)
            .delete("t")
            .unwrap_err();
        assert!(matches!(
            err,
            SqlFluentError::BindArityMismatch {
                placeholders: 1,
                values: 2,
                ..
            }
        ));
        // nothing bound or executed
        assert_eq!(session.connection().calls.len(), 1);
        assert_eq!(session.last_query(), Some("DELETE FROM t WHERE a = ? AND b = ?"));
        assert!(matches!(
            session.last_error(),
            Some(DbFailure::ExecuteFailed { message }) if message.contains("arity")
        ));
    }

    #[test]
    fn transactions_pass_through_and_restore_autocommit() {
        let mut session = Session::new(ScriptedConnection::default());
        assert!(session.begin_transaction().unwrap());
        assert!(session.commit_transaction().unwrap());
        assert!(session.begin_transaction().unwrap());
        assert!(session.rollback_transaction().unwrap());
        assert_eq!(
            session.connection().calls,
            vec![
                "autocommit false",
                "commit",
                "autocommit true",
                "autocommit false",
                "rollback",
                "autocommit true",
            ]
        );
    }

    #[test]
    fn insert_without_generated_id_is_success() {
        let mut session = Session::new(ScriptedConnection {
            params: 1,
            ..ScriptedConnection::default()
        });
        let result = session
            .builder()
            .insert("t", crate::types::RowData::new().set("a", 1))
            .unwrap();
        assert!(matches!(result, QueryResult::Success(true)));
        assert_eq!(session.insert_id(), 0);
    }
}
