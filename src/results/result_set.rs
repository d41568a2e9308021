use std::collections::HashMap;
use std::sync::Arc;

use super::row::{AssocRow, CustomDbRow, Record, build_index};
use crate::types::{OutputMode, RowValues};

/// Rows returned by a SELECT, shaped per the [`OutputMode`] captured at execution time.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Record>,
    mode: OutputMode,
    // shared by all rows
    column_names: Option<Arc<Vec<String>>>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns.
    #[must_use]
    pub fn new(column_names: Vec<String>, mode: OutputMode) -> Self {
        let column_index_cache = Arc::new(build_index(&column_names));
        Self {
            results: Vec::with_capacity(10),
            mode,
            column_names: Some(Arc::new(column_names)),
            column_index_cache,
        }
    }

    /// An empty result set with no column metadata.
    #[must_use]
    pub fn empty(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Add a row in driver column order.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        let Some(column_names) = &self.column_names else {
            return;
        };
        let record = match self.mode {
            OutputMode::Object => Record::Object(CustomDbRow::with_cache(
                Arc::clone(column_names),
                row_values,
                Arc::clone(&self.column_index_cache),
            )),
            OutputMode::AssocArray => {
                Record::Assoc(AssocRow::from_columns(column_names, row_values))
            }
        };
        self.results.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Keep at most the first record.
    pub fn truncate_to_first(&mut self) {
        self.results.truncate(1);
    }

    /// Project one named column from every record. Records missing it contribute nothing.
    #[must_use]
    pub fn column(&self, name: &str) -> Vec<RowValues> {
        self.results
            .iter()
            .filter_map(|record| record.get(name).cloned())
            .collect()
    }

    /// Named column of the first record.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<RowValues> {
        self.results.first().and_then(|r| r.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> Vec<String> {
        vec!["id".into(), "name".into()]
    }

    #[test]
    fn rows_follow_output_mode() {
        let mut object = ResultSet::new(cols(), OutputMode::Object);
        object.add_row_values(vec![RowValues::Int(1), RowValues::Text("a".into())]);
        assert!(object.results[0].as_object().is_some());

        let mut assoc = ResultSet::new(cols(), OutputMode::AssocArray);
        assoc.add_row_values(vec![RowValues::Int(1), RowValues::Text("a".into())]);
        assert!(assoc.results[0].as_assoc().is_some());
        assert_eq!(assoc.results[0].get("name"), Some(&RowValues::Text("a".into())));
    }

    #[test]
    fn views_are_post_processing() {
        let mut rs = ResultSet::new(cols(), OutputMode::Object);
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("a".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("b".into())]);
        assert_eq!(rs.column("id"), vec![RowValues::Int(1), RowValues::Int(2)]);
        assert_eq!(rs.scalar("name"), Some(RowValues::Text("a".into())));
        assert_eq!(rs.column("nope"), Vec::<RowValues>::new());
        rs.truncate_to_first();
        assert_eq!(rs.len(), 1);
    }

    #[test]
    fn rows_without_columns_are_ignored() {
        let mut rs = ResultSet::empty(OutputMode::Object);
        rs.add_row_values(vec![RowValues::Int(1)]);
        assert!(rs.is_empty());
        assert_eq!(rs.scalar("id"), None);
    }
}
