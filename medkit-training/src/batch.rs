//! Column-oriented batches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named columns of values, readable by column or by row.
///
/// Used both for collated model inputs/outputs and for the data gathered to
/// compute metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchData {
    columns: BTreeMap<String, Vec<Value>>,
}

impl BatchData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous one with the same name.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<Value>) {
        self.columns.insert(key.into(), values);
    }

    pub fn with_column(mut self, key: impl Into<String>, values: Vec<Value>) -> Self {
        self.insert(key, values);
        self
    }

    pub fn column(&self, key: &str) -> Option<&[Value]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    /// Values at `index` in every column long enough to have one.
    pub fn row(&self, index: usize) -> BTreeMap<&str, &Value> {
        self.columns
            .iter()
            .filter_map(|(key, values)| Some((key.as_str(), values.get(index)?)))
            .collect()
    }

    /// Append the columns of `other`, creating missing ones.
    pub fn extend(&mut self, other: BatchData) {
        for (key, values) in other.columns {
            self.columns.entry(key).or_default().extend(values);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows, the length of the longest column.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(String, Vec<Value>)> for BatchData {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Value>)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
