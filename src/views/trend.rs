use super::{ChartKind, ChartSpec, View, resolve};
use crate::dataset::temporal::parse_datetime;
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;

const KEY_KINDS: [ColumnKind; 4] = [
    ColumnKind::Numeric,
    ColumnKind::Temporal,
    ColumnKind::Categorical,
    ColumnKind::Unknown,
];

/// `value` ordered ascending by `key`.
///
/// Text keys are promoted to date/times when every one of them parses as
/// one. Rows missing either cell are dropped. Keys mixing incomparable value
/// types fail the whole view before anything is sorted.
pub fn derive(
    dataset: &Dataset,
    profile: &DatasetProfile,
    key: &str,
    value: &str,
) -> Result<View, DerivationError> {
    let key_col = resolve(dataset, profile, key, &KEY_KINDS, "sortable")?;
    let val_col = resolve(dataset, profile, value, &[ColumnKind::Numeric], "numeric")?;

    let keys = coerce_temporal(key_col.values());

    let mut rows: Vec<(Value, f64)> = Vec::with_capacity(keys.len());
    let mut dropped = 0;
    for (k, v) in keys.into_iter().zip(val_col.numbers()) {
        match (k, v) {
            (Some(k), Some(v)) => rows.push((k, v)),
            _ => dropped += 1,
        }
    }

    if rows.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "no rows with both '{key}' and '{value}'"
        )));
    }

    if let Some((first, _)) = rows.first()
        && rows.iter().any(|(k, _)| !k.same_variant(first))
    {
        return Err(DerivationError::UnsortableKey {
            column: key.to_owned(),
        });
    }

    rows.sort_by(|a, b| a.0.compare(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut table = Table::new(vec![key.to_owned(), value.to_owned()]);
    for (k, v) in rows {
        table.push_row(vec![Some(k), Some(Value::Number(v))]);
    }

    if dropped > 0 {
        tracing::debug!("Trend '{value}' over '{key}' dropped {dropped} incomplete rows");
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::Line,
            format!("{value} over {key}"),
            key,
            value,
        )),
        dropped_rows: dropped,
    })
}

/// Promotes text keys to date/times if all of them parse; otherwise returns
/// the keys unchanged.
fn coerce_temporal(values: &[Option<Value>]) -> Vec<Option<Value>> {
    let mut present = values.iter().flatten().peekable();
    let all_dates = present.peek().is_some()
        && present.all(|v| v.as_text().and_then(parse_datetime).is_some());

    if !all_dates {
        return values.to_vec();
    }

    values
        .iter()
        .map(|v| {
            v.as_ref()
                .and_then(Value::as_text)
                .and_then(parse_datetime)
                .map(Value::DateTime)
        })
        .collect()
}
