use super::{ChartKind, ChartSpec, View, resolve};
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;

/// Rows where both numeric columns are present, in dataset order.
pub fn derive(
    dataset: &Dataset,
    profile: &DatasetProfile,
    x: &str,
    y: &str,
) -> Result<View, DerivationError> {
    let x_col = resolve(dataset, profile, x, &[ColumnKind::Numeric], "numeric")?;
    let y_col = resolve(dataset, profile, y, &[ColumnKind::Numeric], "numeric")?;

    let headers = if x == y {
        vec![x.to_owned(), format!("{y} (y)")]
    } else {
        vec![x.to_owned(), y.to_owned()]
    };
    let mut table = Table::new(headers);
    let mut dropped = 0;

    for (a, b) in x_col.numbers().into_iter().zip(y_col.numbers()) {
        match (a, b) {
            (Some(a), Some(b)) => {
                table.push_row(vec![Some(Value::Number(a)), Some(Value::Number(b))]);
            }
            _ => dropped += 1,
        }
    }

    if table.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "no rows with both '{x}' and '{y}'"
        )));
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::Scatter,
            format!("{y} vs {x}"),
            x,
            y,
        )),
        dropped_rows: dropped,
    })
}
