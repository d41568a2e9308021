//! Serialization of a [`QueryState`] into one parameterized statement.
//!
//! Fragment order is fixed: base clause, joins, conditions, custom where, group by, order by,
//! insert column/value lists, limit. Bind values are row data first, then condition values.

use crate::error::SqlFluentError;
use crate::placeholders::count_placeholders;
use crate::state::{Predicate, QueryState};
use crate::types::{BindValue, RowData, RowValues};

/// Leading clause of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementBase {
    Select { table: String, columns: Vec<String> },
    Insert { table: String, data: RowData },
    Update { table: String, data: RowData },
    Delete { table: String },
}

impl StatementBase {
    /// SELECT with `*` when `columns` is empty.
    ///
    /// A single entry containing commas is split on them and trimmed, so `["id, name"]` and
    /// `["id", "name"]` render the same column list.
    pub fn select<S: AsRef<str>>(table: impl Into<String>, columns: &[S]) -> Self {
        StatementBase::Select {
            table: table.into(),
            columns: split_columns(columns),
        }
    }
}

fn split_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .flat_map(|c| c.as_ref().split(','))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// SQL text plus its positional bind list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl CompiledQuery {
    /// Concatenated per-value type codes, e.g. `"is"` for `[Int, String]`.
    #[must_use]
    pub fn type_string(&self) -> String {
        self.binds.iter().map(|b| b.tag.code()).collect()
    }

    /// Raw values in bind order.
    #[must_use]
    pub fn values(&self) -> Vec<RowValues> {
        self.binds.iter().map(|b| b.value.clone()).collect()
    }
}

/// Compile `state` on top of `base`.
///
/// # Errors
/// Returns `SqlFluentError::ConfigError` for INSERT/UPDATE without row data or an empty IN list,
/// and `SqlFluentError::BindArityMismatch` if the rendered placeholders disagree with the bind
/// list.
pub fn compile(base: &StatementBase, state: &QueryState) -> Result<CompiledQuery, SqlFluentError> {
    let mut sql = String::with_capacity(128);
    let mut data_binds: Vec<BindValue> = Vec::new();
    let mut where_binds: Vec<BindValue> = Vec::new();

    // 1. base clause
    match base {
        StatementBase::Select { table, columns } => {
            sql.push_str("SELECT ");
            if columns.is_empty() {
                sql.push('*');
            } else {
                sql.push_str(&columns.join(", "));
            }
            sql.push_str(" FROM ");
            sql.push_str(table);
        }
        StatementBase::Insert { table, data } => {
            require_data("INSERT", table, data)?;
            sql.push_str("INSERT INTO ");
            sql.push_str(table);
        }
        StatementBase::Update { table, data } => {
            require_data("UPDATE", table, data)?;
            sql.push_str("UPDATE ");
            sql.push_str(table);
            sql.push_str(" SET ");
            let assignments: Vec<String> = data
                .iter()
                .map(|(field, value)| {
                    data_binds.push(BindValue::new(value.clone()));
                    format!("{field} = ?")
                })
                .collect();
            sql.push_str(&assignments.join(", "));
        }
        StatementBase::Delete { table } => {
            sql.push_str("DELETE FROM ");
            sql.push_str(table);
        }
    }

    // 2. joins
    for join in &state.joins {
        sql.push(' ');
        let qualifier = join.join_type.as_sql();
        if !qualifier.is_empty() {
            sql.push_str(qualifier);
            sql.push(' ');
        }
        sql.push_str("JOIN ");
        sql.push_str(&join.table);
        sql.push_str(" ON ");
        sql.push_str(&join.condition);
    }

    // 3. conditions
    if !state.conditions.is_empty() {
        let mut clauses = Vec::with_capacity(state.conditions.len());
        for condition in &state.conditions {
            let field = &condition.field;
            let clause = match &condition.predicate {
                Predicate::Equals(value) => {
                    where_binds.push(BindValue::new(value.clone()));
                    format!("{field} = ?")
                }
                Predicate::In(values) => {
                    if values.is_empty() {
                        return Err(SqlFluentError::ConfigError(format!(
                            "IN list for field {field} is empty"
                        )));
                    }
                    where_binds.extend(values.iter().cloned().map(BindValue::new));
                    format!("{field} IN ( {} )", vec!["?"; values.len()].join(", "))
                }
                Predicate::Between(low, high) => {
                    where_binds.push(BindValue::new(low.clone()));
                    where_binds.push(BindValue::new(high.clone()));
                    format!("{field} BETWEEN ? AND ?")
                }
                Predicate::Operator(op, value) => {
                    where_binds.push(BindValue::new(value.clone()));
                    format!("{field} {} ?", op.trim())
                }
            };
            clauses.push(clause);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    // 4. custom where
    if let Some(fragment) = &state.custom_where {
        sql.push_str(if state.conditions.is_empty() {
            " WHERE "
        } else {
            " AND "
        });
        sql.push_str(fragment);
    }

    // 5. group by
    if !state.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&state.group_by.join(", "));
    }

    // 6. order by
    if !state.order_by.is_empty() {
        let specs: Vec<String> = state
            .order_by
            .iter()
            .map(|o| format!("{} {}", o.field, o.direction))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&specs.join(", "));
    }

    // 7. insert column and value lists
    if let StatementBase::Insert { data, .. } = base {
        let fields: Vec<&str> = data.fields().collect();
        sql.push('(');
        sql.push_str(&fields.join(", "));
        sql.push_str(") VALUES(");
        sql.push_str(&vec!["?"; data.len()].join(", "));
        sql.push(')');
        data_binds.extend(data.iter().map(|(_, value)| BindValue::new(value.clone())));
    }

    // 8. limit / offset
    if let Some(limit) = state.limit {
        if state.offset > 0 {
            sql.push_str(&format!(" LIMIT {}, {limit}", state.offset));
        } else {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
    }

    let mut binds = data_binds;
    binds.append(&mut where_binds);

    let placeholders = count_placeholders(&sql);
    if placeholders != binds.len() {
        tracing::error!(
            sql = %sql,
            placeholders,
            values = binds.len(),
            "compiled statement does not match its bind list"
        );
        return Err(SqlFluentError::BindArityMismatch {
            sql,
            placeholders,
            values: binds.len(),
        });
    }

    Ok(CompiledQuery { sql, binds })
}

fn require_data(verb: &str, table: &str, data: &RowData) -> Result<(), SqlFluentError> {
    if data.is_empty() {
        Err(SqlFluentError::ConfigError(format!(
            "{verb} into {table} requires at least one field"
        )))
    } else {
        Ok(())
    }
}
