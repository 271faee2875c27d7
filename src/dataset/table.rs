use super::Value;
use serde::{Deserialize, Serialize};

/// A small, row-oriented result table.
///
/// Tables are what views produce and what pages, charts and exports consume.
/// Every row has exactly one cell per header.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with missing cells and long rows
    /// are cut to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<Value>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(col).and_then(Option::as_ref))
    }

    pub fn column_f64(&self, col: usize) -> Vec<Option<f64>> {
        self.column(col).map(|v| v.and_then(Value::as_f64)).collect()
    }
}
