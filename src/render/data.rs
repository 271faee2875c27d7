//! Reads plot-ready series out of a view's table.
//!
//! Every chart kind reads fixed column positions (see [`ChartSpec`]). Nothing
//! here looks at the source dataset.

use crate::dataset::temporal::format_datetime;
use crate::dataset::{Table, Value};
use crate::error::RenderError;
use crate::utils::format_number;
use crate::views::{ChartKind, ChartSpec, Histogram, density_curve, histogram};

#[derive(Clone, PartialEq, Debug)]
pub struct PieSlice {
    pub label: String,
    pub count: f64,
    /// Share of the table's total count, 0..=100.
    pub percent: f64,
}

#[derive(Clone, PartialEq, Debug)]
pub struct BoxSummary {
    pub label: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// How x positions map back to key labels.
#[derive(Clone, PartialEq, Debug)]
pub enum XAxis {
    Number,
    /// X is a UTC timestamp in seconds.
    Time,
    /// X is the row position into these labels.
    Labels(Vec<String>),
}

impl XAxis {
    pub fn label(&self, x: f64) -> String {
        match self {
            Self::Number => format_number(x),
            Self::Time => chrono::DateTime::from_timestamp(x.round() as i64, 0)
                .map(|dt| format_datetime(&dt.naive_utc()))
                .unwrap_or_default(),
            Self::Labels(labels) => {
                let i = x.round();
                if (x - i).abs() > 1e-6 || i < 0.0 {
                    return String::new();
                }
                labels.get(i as usize).cloned().unwrap_or_default()
            }
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum ChartData {
    Histogram {
        hist: Histogram,
        density: Vec<(f64, f64)>,
    },
    Heatmap {
        labels: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    },
    Bars(Vec<(String, f64)>),
    Pie(Vec<PieSlice>),
    Line {
        points: Vec<(f64, f64)>,
        axis: XAxis,
    },
    Scatter(Vec<(f64, f64)>),
    Boxes(Vec<BoxSummary>),
    /// One series per column, complete rows only.
    PairGrid {
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
    },
}

fn malformed(chart: &ChartSpec, what: &str) -> RenderError {
    RenderError::EncodingFailure(format!("{} chart: {what}", chart.kind.as_str()))
}

fn label(v: Option<&Value>) -> String {
    v.map(ToString::to_string).unwrap_or_default()
}

pub fn chart_data(chart: &ChartSpec, table: &Table) -> Result<ChartData, RenderError> {
    if table.is_empty() {
        return Err(malformed(chart, "table has no rows"));
    }
    let needed = match chart.kind {
        ChartKind::Histogram => 1,
        ChartKind::Heatmap
        | ChartKind::Bar
        | ChartKind::Pie
        | ChartKind::Line
        | ChartKind::Scatter
        | ChartKind::PairGrid => 2,
        ChartKind::BoxPlot => 6,
    };
    if table.column_count() < needed {
        return Err(malformed(
            chart,
            &format!("needs {needed} columns, table has {}", table.column_count()),
        ));
    }

    let data = match chart.kind {
        ChartKind::Histogram => {
            let values: Vec<f64> = table.column_f64(0).into_iter().flatten().collect();
            let hist = histogram(&values);
            let density = density_curve(&values, &hist);
            ChartData::Histogram { hist, density }
        }
        ChartKind::Heatmap => {
            let labels = table.column(0).map(label).collect();
            let cells = table
                .rows()
                .iter()
                .map(|row| {
                    row.iter()
                        .skip(1)
                        .map(|c| c.as_ref().and_then(Value::as_f64))
                        .collect()
                })
                .collect();
            ChartData::Heatmap { labels, cells }
        }
        ChartKind::Bar => ChartData::Bars(labelled_values(table)),
        ChartKind::Pie => {
            let counts = labelled_values(table);
            let total: f64 = counts.iter().map(|(_, n)| n).sum();
            if total <= 0.0 {
                return Err(malformed(chart, "counts sum to zero"));
            }
            ChartData::Pie(
                counts
                    .into_iter()
                    .map(|(label, count)| PieSlice {
                        label,
                        count,
                        percent: count / total * 100.0,
                    })
                    .collect(),
            )
        }
        ChartKind::Line => {
            let axis = match table.column(0).flatten().next() {
                Some(Value::Number(_)) => XAxis::Number,
                Some(Value::DateTime(_)) => XAxis::Time,
                _ => XAxis::Labels(table.column(0).map(label).collect()),
            };
            ChartData::Line {
                points: line_points(table),
                axis,
            }
        }
        ChartKind::Scatter => ChartData::Scatter(
            table
                .column_f64(0)
                .into_iter()
                .zip(table.column_f64(1))
                .filter_map(|(x, y)| Some((x?, y?)))
                .collect(),
        ),
        ChartKind::BoxPlot => ChartData::Boxes(
            table
                .rows()
                .iter()
                .filter_map(|row| {
                    let n = |i: usize| row.get(i)?.as_ref()?.as_f64();
                    Some(BoxSummary {
                        label: label(row.first()?.as_ref()),
                        min: n(1)?,
                        q1: n(2)?,
                        median: n(3)?,
                        q3: n(4)?,
                        max: n(5)?,
                    })
                })
                .collect(),
        ),
        ChartKind::PairGrid => {
            let width = table.column_count();
            let rows: Vec<Vec<f64>> = table
                .rows()
                .iter()
                .filter_map(|row| row.iter().map(|c| c.as_ref()?.as_f64()).collect())
                .collect();
            if rows.is_empty() {
                return Err(malformed(chart, "no complete rows"));
            }
            ChartData::PairGrid {
                names: table.headers().to_vec(),
                columns: (0..width)
                    .map(|i| rows.iter().filter_map(|r| r.get(i).copied()).collect())
                    .collect(),
            }
        }
    };
    Ok(data)
}

fn labelled_values(table: &Table) -> Vec<(String, f64)> {
    table
        .column(0)
        .zip(table.column_f64(1))
        .filter_map(|(l, v)| Some((label(l), v?)))
        .collect()
}

/// X is the key itself for numbers and date/times, the row position for
/// anything else.
fn line_points(table: &Table) -> Vec<(f64, f64)> {
    table
        .column(0)
        .zip(table.column_f64(1))
        .enumerate()
        .filter_map(|(i, (key, y))| {
            let x = match key? {
                Value::Number(v) => *v,
                Value::DateTime(dt) => dt.and_utc().timestamp() as f64,
                Value::Text(_) => i as f64,
            };
            Some((x, y?))
        })
        .collect()
}
