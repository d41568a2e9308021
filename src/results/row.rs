use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::types::RowValues;

/// A positional row whose column names are shared across its result set.
///
/// This is the record shape for [`OutputMode::Object`](crate::types::OutputMode).
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    // name -> index lookup, built once per result set
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `rows` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = Arc::new(build_index(&column_names));
        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    pub(crate) fn with_cache(
        column_names: Arc<Vec<String>>,
        rows: Vec<RowValues>,
        column_index_cache: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            rows,
            column_index_cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }
}

/// Ordered name → value record, the shape for
/// [`OutputMode::AssocArray`](crate::types::OutputMode).
///
/// Duplicate column names collapse into one entry at the first position holding the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssocRow {
    fields: Vec<(String, RowValues)>,
}

impl AssocRow {
    #[must_use]
    pub fn from_columns(column_names: &[String], values: Vec<RowValues>) -> Self {
        let mut row = AssocRow {
            fields: Vec::with_capacity(column_names.len()),
        };
        for (name, value) in column_names.iter().zip(values) {
            match row.fields.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value,
                None => row.fields.push((name.clone(), value)),
            }
        }
        row
    }

    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.fields
            .iter()
            .find(|(name, _)| name == column_name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One materialized row in either output shape.
#[derive(Debug, Clone)]
pub enum Record {
    Object(CustomDbRow),
    Assoc(AssocRow),
}

impl Record {
    /// Value of a named column in either shape.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        match self {
            Record::Object(row) => row.get(column_name),
            Record::Assoc(row) => row.get(column_name),
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&CustomDbRow> {
        match self {
            Record::Object(row) => Some(row),
            Record::Assoc(_) => None,
        }
    }

    #[must_use]
    pub fn as_assoc(&self) -> Option<&AssocRow> {
        match self {
            Record::Assoc(row) => Some(row),
            Record::Object(_) => None,
        }
    }

    /// Render as a JSON object keyed by column name.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        match self {
            Record::Object(row) => {
                for (name, value) in row.column_names.iter().zip(&row.rows) {
                    map.insert(name.clone(), value.to_json());
                }
            }
            Record::Assoc(row) => {
                for (name, value) in row.iter() {
                    map.insert(name.to_string(), value.to_json());
                }
            }
        }
        JsonValue::Object(map)
    }
}

pub(crate) fn build_index(column_names: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    index
}
