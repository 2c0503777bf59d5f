//! Result Rows
//!
//! A row maps result-column names to graph values. Columns are kept in a
//! sorted map so rows compare and serialize deterministically.

use crate::models::GraphValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One result record: column name → value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, GraphValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    ///
    /// ```rust
    /// use neo4j_mcp_core::models::Row;
    ///
    /// let row = Row::new().with("name", "Ada").with("age", 36_i64);
    /// assert_eq!(row.get("name").and_then(|v| v.as_str()), Some("Ada"));
    /// ```
    pub fn with(mut self, column: impl Into<String>, value: impl Into<GraphValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<GraphValue>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&GraphValue> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GraphValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, GraphValue> {
        self.columns
    }
}

impl<K: Into<String>> FromIterator<(K, GraphValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, GraphValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
