//! Views that group a numeric column by a categorical key.

use super::{ChartKind, ChartSpec, View, resolve};
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::{DatasetProfile, numeric_stats};
use std::collections::HashMap;

/// Values per group label in first-seen order, plus the number of rows that
/// were skipped because the key or the value was missing.
fn collect_groups(
    dataset: &Dataset,
    profile: &DatasetProfile,
    group: &str,
    value: &str,
) -> Result<(Vec<(String, Vec<f64>)>, usize), DerivationError> {
    let key_col = resolve(dataset, profile, group, &[ColumnKind::Categorical], "categorical")?;
    let val_col = resolve(dataset, profile, value, &[ColumnKind::Numeric], "numeric")?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0;

    for (key, val) in key_col.values().iter().zip(val_col.numbers()) {
        let (Some(key), Some(val)) = (key, val) else {
            dropped += 1;
            continue;
        };
        let label = key.to_string();
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            groups.push((label, Vec::new()));
            groups.len() - 1
        });
        if let Some((_, values)) = groups.get_mut(slot) {
            values.push(val);
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {dropped} rows with missing '{group}' or '{value}'");
    }
    Ok((groups, dropped))
}

/// Mean of `value` per `group`, sorted by mean descending, top `limit` groups.
///
/// Groups with equal means keep lexical label order.
pub fn derive_mean(
    dataset: &Dataset,
    profile: &DatasetProfile,
    group: &str,
    value: &str,
    limit: usize,
) -> Result<View, DerivationError> {
    let (groups, dropped) = collect_groups(dataset, profile, group, value)?;
    if groups.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "no rows with both '{group}' and '{value}'"
        )));
    }

    let mut means: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(label, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (label, mean)
        })
        .collect();
    means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    means.truncate(limit);

    let value_header = format!("Average of {value}");
    let mut table = Table::new(vec![group.to_owned(), value_header.clone()]);
    for (label, mean) in means {
        table.push_row(vec![Some(Value::Text(label)), Some(Value::Number(mean))]);
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::Bar,
            format!("Average {value} by {group}"),
            group,
            value_header,
        )),
        dropped_rows: dropped,
    })
}

pub const SPREAD_HEADERS: [&str; 6] = ["min", "q1", "median", "q3", "max", "count"];

/// Five-number summary of `value` per `group`, groups in first-seen order.
pub fn derive_spread(
    dataset: &Dataset,
    profile: &DatasetProfile,
    group: &str,
    value: &str,
) -> Result<View, DerivationError> {
    let (groups, dropped) = collect_groups(dataset, profile, group, value)?;
    if groups.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "no rows with both '{group}' and '{value}'"
        )));
    }

    let mut headers = vec![group.to_owned()];
    headers.extend(SPREAD_HEADERS.iter().map(|h| (*h).to_owned()));
    let mut table = Table::new(headers);

    for (label, values) in groups {
        let s = numeric_stats(&values);
        let mut row = vec![Some(Value::Text(label))];
        row.extend([s.min, s.q1, s.median, s.q3, s.max].map(|v| v.map(Value::Number)));
        row.push(Some(Value::Number(values.len() as f64)));
        table.push_row(row);
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::BoxPlot,
            format!("{value} by {group}"),
            group,
            value,
        )),
        dropped_rows: dropped,
    })
}
