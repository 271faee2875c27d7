use super::temporal::{format_datetime, parse_datetime};
use crate::error::{DeckError, Result};
use crate::utils::format_number;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Declared kind of a dataset column.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Debug)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Temporal,
    Unknown,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "Numeric",
            Self::Categorical => "Categorical",
            Self::Temporal => "Temporal",
            Self::Unknown => "Unknown",
        }
    }
}

/// A single present cell value. Missing cells are `None` at the column level.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub enum Value {
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Orders two values of the same variant. Values of different variants
    /// are incomparable and yield `None`.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Some(a.total_cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub(crate) fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::Text(s) => f.write_str(s),
            Self::DateTime(dt) => f.write_str(&format_datetime(dt)),
        }
    }
}

/// Parses a raw cell as a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Classifies raw string values.
///
/// Numeric if every present value parses as a number, temporal if every
/// present value parses as a date/time, categorical otherwise. A column with
/// no present values is `Unknown`.
pub fn infer_kind<S: AsRef<str>>(raw: &[Option<S>]) -> ColumnKind {
    let mut present = raw
        .iter()
        .flatten()
        .map(AsRef::as_ref)
        .filter(|s| !s.trim().is_empty())
        .peekable();

    if present.peek().is_none() {
        return ColumnKind::Unknown;
    }

    let values: Vec<&str> = present.collect();
    if values.iter().all(|s| parse_number(s).is_some()) {
        ColumnKind::Numeric
    } else if values.iter().all(|s| parse_datetime(s).is_some()) {
        ColumnKind::Temporal
    } else {
        ColumnKind::Categorical
    }
}

/// A named, typed column of optional values.
#[derive(Clone, PartialEq, Debug)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Option<Value>>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn numeric<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()).map(Value::Number))
            .collect();
        Self::new(name, ColumnKind::Numeric, values)
    }

    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| v.map(|s| Value::Text(s.into())))
            .collect();
        Self::new(name, ColumnKind::Categorical, values)
    }

    pub fn temporal<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<NaiveDateTime>>,
    {
        let values = values.into_iter().map(|v| v.map(Value::DateTime)).collect();
        Self::new(name, ColumnKind::Temporal, values)
    }

    /// Builds a column from raw strings, inferring its kind.
    ///
    /// Blank strings count as missing.
    pub fn from_raw<S: AsRef<str>>(name: impl Into<String>, raw: &[Option<S>]) -> Self {
        let kind = infer_kind(raw);
        let values = raw
            .iter()
            .map(|cell| {
                let s = cell.as_ref()?.as_ref();
                if s.trim().is_empty() {
                    return None;
                }
                match kind {
                    ColumnKind::Numeric => parse_number(s).map(Value::Number),
                    ColumnKind::Temporal => parse_datetime(s).map(Value::DateTime),
                    ColumnKind::Categorical => Some(Value::Text(s.to_owned())),
                    ColumnKind::Unknown => None,
                }
            })
            .collect();
        Self::new(name, kind, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Numeric view of the column; non-numeric cells read as missing.
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|v| v.as_ref().and_then(Value::as_f64))
            .collect()
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row).and_then(Option::as_ref)
    }
}

/// An in-memory table of equally long, uniquely named columns.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// # Errors
    ///
    /// Returns [`DeckError::InvalidDataset`] if column lengths differ or a
    /// column name repeats.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::new();
        for col in &columns {
            if col.len() != row_count {
                return Err(DeckError::InvalidDataset(format!(
                    "column '{}' has {} rows, expected {row_count}",
                    col.name,
                    col.len()
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(DeckError::InvalidDataset(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The first `n` rows as a display table.
    pub fn head(&self, n: usize) -> super::Table {
        let headers = self.columns.iter().map(|c| c.name.clone()).collect();
        let mut table = super::Table::new(headers);
        for row in 0..self.row_count.min(n) {
            table.push_row(self.columns.iter().map(|c| c.get(row).cloned()).collect());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            infer_kind(&[Some("1"), Some("2.5"), None, Some(" -3 ")]),
            ColumnKind::Numeric
        );
        assert_eq!(
            infer_kind(&[Some("2024-01-01"), Some("2024-02-01")]),
            ColumnKind::Temporal
        );
        assert_eq!(infer_kind(&[Some("A"), Some("1")]), ColumnKind::Categorical);
        assert_eq!(infer_kind::<&str>(&[None, None]), ColumnKind::Unknown);
        assert_eq!(infer_kind(&[Some(""), Some("  ")]), ColumnKind::Unknown);
    }

    #[test]
    fn test_from_raw_converts_values() {
        let col = Column::from_raw("sales", &[Some("10"), Some(""), Some("2.5")]);
        assert_eq!(col.kind(), ColumnKind::Numeric);
        assert_eq!(col.numbers(), vec![Some(10.0), None, Some(2.5)]);
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn test_dataset_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            Column::numeric("a", [Some(1.0), Some(2.0)]),
            Column::numeric("b", [Some(1.0)]),
        ]);
        assert!(matches!(result, Err(DeckError::InvalidDataset(_))));
    }

    #[test]
    fn test_dataset_rejects_duplicate_names() {
        let result = Dataset::new(vec![
            Column::numeric("a", [Some(1.0)]),
            Column::categorical("a", [Some("x")]),
        ]);
        assert!(matches!(result, Err(DeckError::InvalidDataset(_))));
    }

    #[test]
    fn test_value_compare_mixed_variants() {
        let n = Value::Number(1.0);
        let t = Value::text("a");
        assert_eq!(n.compare(&Value::Number(2.0)), Some(Ordering::Less));
        assert_eq!(n.compare(&t), None);
    }

    #[test]
    fn test_head_limits_rows() {
        let ds = Dataset::new(vec![Column::numeric(
            "x",
            (0..10).map(|i| Some(f64::from(i))),
        )])
        .expect("valid dataset");
        let head = ds.head(5);
        assert_eq!(head.row_count(), 5);
        assert_eq!(head.headers(), ["x".to_owned()]);
    }
}
