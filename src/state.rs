//! Clause fragments accumulated for one in-flight statement.

use std::fmt;
use std::str::FromStr;

use crate::error::SqlFluentError;
use crate::types::{OutputMode, RowValues};

/// Comparison applied to a condition's field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field = ?`
    Equals(RowValues),
    /// `field IN ( ?, ?, ... )`, one placeholder per element
    In(Vec<RowValues>),
    /// `field BETWEEN ? AND ?`
    Between(RowValues, RowValues),
    /// `field <op> ?` for a caller-supplied single-value operator such as `>=` or `LIKE`
    Operator(String, RowValues),
}

impl Predicate {
    pub fn in_list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Predicate::In(values.into_iter().map(Into::into).collect())
    }

    pub fn between(low: impl Into<RowValues>, high: impl Into<RowValues>) -> Self {
        Predicate::Between(low.into(), high.into())
    }

    pub fn op(operator: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Predicate::Operator(operator.into(), value.into())
    }

    /// Number of placeholders this predicate renders.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        match self {
            Predicate::Equals(_) | Predicate::Operator(_, _) => 1,
            Predicate::In(values) => values.len(),
            Predicate::Between(_, _) => 2,
        }
    }
}

impl<T: Into<RowValues>> From<T> for Predicate {
    fn from(value: T) -> Self {
        Predicate::Equals(value.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
    LeftOuter,
    RightOuter,
    /// Plain `JOIN` with no qualifier.
    None,
}

impl JoinType {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Outer => "OUTER",
            JoinType::LeftOuter => "LEFT OUTER",
            JoinType::RightOuter => "RIGHT OUTER",
            JoinType::None => "",
        }
    }
}

impl FromStr for JoinType {
    type Err = SqlFluentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" => Ok(JoinType::None),
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "OUTER" => Ok(JoinType::Outer),
            "LEFT OUTER" => Ok(JoinType::LeftOuter),
            "RIGHT OUTER" => Ok(JoinType::RightOuter),
            other => Err(SqlFluentError::ConfigError(format!(
                "Wrong JOIN type: {other}"
            ))),
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub join_type: JoinType,
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = SqlFluentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(OrderDirection::Asc),
            "DESC" => Ok(OrderDirection::Desc),
            other => Err(SqlFluentError::ConfigError(format!(
                "Wrong order direction: {other}"
            ))),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub field: String,
    pub direction: OrderDirection,
}

/// Fragments for exactly one statement.
///
/// Conditions, joins and order specs keep insertion order. Re-adding an existing key (field
/// for conditions and order specs, type + table for joins) replaces the entry where it stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub(crate) conditions: Vec<Condition>,
    pub(crate) custom_where: Option<String>,
    pub(crate) joins: Vec<Join>,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<OrderSpec>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: u64,
    pub(crate) output: OutputMode,
}

impl QueryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_condition(&mut self, field: impl Into<String>, predicate: Predicate) {
        let field = field.into();
        match self.conditions.iter_mut().find(|c| c.field == field) {
            Some(existing) => existing.predicate = predicate,
            None => self.conditions.push(Condition { field, predicate }),
        }
    }

    /// Replaces any earlier custom fragment. Empty text clears it.
    pub fn set_custom_where(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        self.custom_where = if fragment.trim().is_empty() {
            None
        } else {
            Some(fragment)
        };
    }

    pub fn add_join(
        &mut self,
        table: impl Into<String>,
        condition: impl Into<String>,
        join_type: JoinType,
    ) {
        let table = table.into();
        let condition = condition.into();
        match self
            .joins
            .iter_mut()
            .find(|j| j.table == table && j.join_type == join_type)
        {
            Some(existing) => existing.condition = condition,
            None => self.joins.push(Join {
                table,
                join_type,
                condition,
            }),
        }
    }

    pub fn add_group_by(&mut self, field: impl Into<String>) {
        self.group_by.push(field.into());
    }

    pub fn add_order_by(&mut self, field: impl Into<String>, direction: OrderDirection) {
        let field = field.into();
        match self.order_by.iter_mut().find(|o| o.field == field) {
            Some(existing) => existing.direction = direction,
            None => self.order_by.push(OrderSpec { field, direction }),
        }
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    /// Negative offsets clamp to zero.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = u64::try_from(offset).unwrap_or(0);
    }

    pub fn set_output(&mut self, mode: OutputMode) {
        self.output = mode;
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub fn output(&self) -> OutputMode {
        self.output
    }

    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }
}
