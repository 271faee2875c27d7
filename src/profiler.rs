//! Per-column statistical profiling.
//!
//! [`profile`] is a pure function of the dataset: it classifies every column
//! and computes the statistics its kind calls for.
//!
//! - Numeric: count, mean, sample standard deviation, min, quartiles, max.
//! - Categorical: count, unique count, most frequent value and its frequency.
//! - Temporal: count, unique count, earliest and latest value.
//!
//! Numeric statistics are computed with Polars chunked arrays. A column
//! without any present values still gets a profile; every statistic is
//! simply `None`.

use crate::dataset::{Column, ColumnKind, Dataset, Table, Value};
use chrono::NaiveDateTime;
use polars::prelude::{
    ChunkAgg as _, ChunkQuantile as _, ChunkVar as _, Float64Chunked, QuantileMethod,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct NumericStats {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug, Default)]
pub struct CategoricalStats {
    pub unique: usize,
    pub top_value: Option<String>,
    pub top_frequency: Option<usize>,
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug, Default)]
pub struct TemporalStats {
    pub unique: usize,
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub enum ProfileStats {
    Numeric(NumericStats),
    Categorical(CategoricalStats),
    Temporal(TemporalStats),
    /// Column with no usable values.
    Empty,
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Non-missing values.
    pub count: usize,
    pub missing: usize,
    pub stats: ProfileStats,
}

/// Profiles of every column, in dataset order.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct DatasetProfile {
    pub row_count: usize,
    columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn get(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns(&self) -> &[ColumnProfile] {
        &self.columns
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.get(name).map(|c| c.kind)
    }

    /// Names of all columns of `kind`, in dataset order.
    pub fn names_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.as_str())
            .collect()
    }
}

pub fn profile(dataset: &Dataset) -> DatasetProfile {
    let columns = dataset.columns().iter().map(profile_column).collect();
    DatasetProfile {
        row_count: dataset.row_count(),
        columns,
    }
}

pub fn profile_column(col: &Column) -> ColumnProfile {
    let missing = col.missing_count();
    let count = col.len() - missing;

    let stats = match col.kind() {
        ColumnKind::Numeric => {
            let values: Vec<f64> = col.numbers().into_iter().flatten().collect();
            ProfileStats::Numeric(numeric_stats(&values))
        }
        ColumnKind::Categorical => ProfileStats::Categorical(categorical_stats(col)),
        ColumnKind::Temporal => ProfileStats::Temporal(temporal_stats(col)),
        ColumnKind::Unknown => ProfileStats::Empty,
    };

    tracing::debug!("Profiled column '{}' as {} ({count} values)", col.name(), col.kind());

    ColumnProfile {
        name: col.name().to_owned(),
        kind: col.kind(),
        count,
        missing,
        stats,
    }
}

/// Summary statistics over present values. Empty input gives all-`None`.
pub fn numeric_stats(values: &[f64]) -> NumericStats {
    if values.is_empty() {
        return NumericStats::default();
    }

    let ca = Float64Chunked::from_vec("values".into(), values.to_vec());
    let quantile = |q: f64| ca.quantile(q, QuantileMethod::Linear).unwrap_or(None);

    NumericStats {
        mean: ca.mean(),
        std_dev: ca.std(1).filter(|s| s.is_finite()),
        min: ca.min(),
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: ca.max(),
    }
}

fn categorical_stats(col: &Column) -> CategoricalStats {
    // first-seen order breaks frequency ties
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for v in col.values().iter().flatten() {
        let Some(s) = v.as_text() else { continue };
        if let Some(&i) = index.get(s) {
            if let Some(entry) = order.get_mut(i) {
                entry.1 += 1;
            }
        } else {
            index.insert(s, order.len());
            order.push((s, 1));
        }
    }

    let mut top: Option<(&str, usize)> = None;
    for &(value, n) in &order {
        if top.is_none_or(|(_, best)| n > best) {
            top = Some((value, n));
        }
    }

    CategoricalStats {
        unique: order.len(),
        top_value: top.map(|(v, _)| v.to_owned()),
        top_frequency: top.map(|(_, n)| n),
    }
}

fn temporal_stats(col: &Column) -> TemporalStats {
    let stamps: Vec<NaiveDateTime> = col
        .values()
        .iter()
        .flatten()
        .filter_map(|v| match v {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        })
        .collect();

    TemporalStats {
        unique: stamps.iter().collect::<HashSet<_>>().len(),
        min: stamps.iter().min().copied(),
        max: stamps.iter().max().copied(),
    }
}

const SUMMARY_HEADERS: [&str; 14] = [
    "column", "kind", "count", "missing", "unique", "top", "freq", "mean", "std", "min", "25%",
    "50%", "75%", "max",
];

/// The global summary as a table, one row per column.
pub fn summary_table(profile: &DatasetProfile) -> Table {
    let mut table = Table::new(SUMMARY_HEADERS.iter().map(|h| (*h).to_owned()).collect());
    let num = |v: Option<f64>| v.map(Value::Number);
    let count = |n: usize| Some(Value::Number(n as f64));

    for col in profile.columns() {
        let mut row = vec![
            Some(Value::text(&col.name)),
            Some(Value::text(col.kind.as_str())),
            count(col.count),
            count(col.missing),
        ];

        match &col.stats {
            ProfileStats::Numeric(s) => {
                row.extend([None, None, None]);
                row.extend([s.mean, s.std_dev, s.min, s.q1, s.median, s.q3, s.max].map(num));
            }
            ProfileStats::Categorical(s) => {
                row.push(count(s.unique));
                row.push(s.top_value.clone().map(Value::Text));
                row.push(s.top_frequency.and_then(count));
            }
            ProfileStats::Temporal(s) => {
                row.push(count(s.unique));
                row.extend([None, None, None, None]);
                row.push(s.min.map(Value::DateTime));
                row.extend([None, None, None]);
                row.push(s.max.map(Value::DateTime));
            }
            ProfileStats::Empty => {}
        }

        table.push_row(row);
    }
    table
}
