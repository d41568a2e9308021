use crate::compiler::{StatementBase, compile};
use crate::driver::Connection;
use crate::error::SqlFluentError;
use crate::results::QueryResult;
use crate::session::Session;
use crate::state::{JoinType, OrderDirection, Predicate, QueryState};
use crate::types::OutputMode;

mod dml;
mod select;

/// Fluent accumulator for one statement.
///
/// Chain methods add fragments; a terminal call (`get`, `insert`, `update`, `delete`, ...)
/// compiles them, runs the statement on the session and consumes the builder, so nothing carries
/// over into the next statement.
/// ```rust
/// # use sql_fluent::prelude::*;
/// # fn demo(session: &mut Session<SqliteConnection>) -> Result<(), SqlFluentError> {
/// let rows = session
///     .builder()
///     .join("orders o", "o.user_id = u.id", "left")?
///     .where_clause("u.status", Predicate::in_list(["active", "pending"]))
///     .order_by("u.id", "desc")?
///     .limit(10)
///     .get("users u", &["u.id", "o.total"])?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
pub struct QueryBuilder<'s, C: Connection> {
    pub(crate) session: &'s mut Session<C>,
    pub(crate) state: QueryState,
}

impl<'s, C: Connection> QueryBuilder<'s, C> {
    pub(crate) fn new(session: &'s mut Session<C>) -> Self {
        let mut state = QueryState::new();
        state.set_output(session.output_mode());
        Self { session, state }
    }

    /// Add a condition. Bare values compare with `=`; see [`Predicate`] for IN, BETWEEN and
    /// custom operators.
    #[must_use]
    pub fn where_clause(mut self, field: impl Into<String>, predicate: impl Into<Predicate>) -> Self {
        self.state.add_condition(field, predicate.into());
        self
    }

    /// Raw WHERE text, ANDed after the structured conditions. Never parameterized.
    #[must_use]
    pub fn custom_where(mut self, fragment: impl Into<String>) -> Self {
        self.state.set_custom_where(fragment);
        self
    }

    /// Join `table` on `condition`. `join_type` is one of LEFT, RIGHT, OUTER, INNER,
    /// LEFT OUTER, RIGHT OUTER in any case, or empty for a plain JOIN.
    ///
    /// # Errors
    /// Returns `SqlFluentError::ConfigError` for any other join type.
    pub fn join(
        mut self,
        table: impl Into<String>,
        condition: impl Into<String>,
        join_type: &str,
    ) -> Result<Self, SqlFluentError> {
        let join_type: JoinType = join_type.parse()?;
        self.state.add_join(table, condition, join_type);
        Ok(self)
    }

    /// # Errors
    /// Returns `SqlFluentError::ConfigError` unless `direction` is ASC or DESC (any case).
    pub fn order_by(
        mut self,
        field: impl Into<String>,
        direction: &str,
    ) -> Result<Self, SqlFluentError> {
        let direction: OrderDirection = direction.parse()?;
        self.state.add_order_by(field, direction);
        Ok(self)
    }

    #[must_use]
    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.state.add_group_by(field);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.state.set_limit(limit);
        self
    }

    /// Rows to skip. Negative values clamp to zero. Only rendered together with a limit.
    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.state.set_offset(offset);
        self
    }

    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.state.set_output(mode);
        self
    }

    /// Fragments accumulated so far.
    #[must_use]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    fn run(self, base: StatementBase) -> Result<QueryResult, SqlFluentError> {
        let QueryBuilder { session, state } = self;
        let compiled = compile(&base, &state)?;
        session.execute_compiled(&compiled, state.output())
    }
}
