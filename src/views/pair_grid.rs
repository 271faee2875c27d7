use super::{ChartKind, ChartSpec, View, resolve};
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;

/// Rows where every selected numeric column is present, in dataset order.
/// Repeated names are only used once.
pub fn derive(
    dataset: &Dataset,
    profile: &DatasetProfile,
    columns: &[String],
) -> Result<View, DerivationError> {
    let mut names: Vec<&str> = Vec::with_capacity(columns.len());
    for name in columns {
        if !names.contains(&name.as_str()) {
            names.push(name);
        }
    }
    if names.len() < 2 {
        return Err(DerivationError::insufficient(
            "a pair grid needs at least 2 numeric columns",
        ));
    }

    let series = names
        .iter()
        .map(|name| {
            resolve(dataset, profile, name, &[ColumnKind::Numeric], "numeric")
                .map(|column| column.numbers())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = Table::new(names.iter().map(|n| (*n).to_owned()).collect());
    let mut dropped = 0;
    for row in 0..dataset.row_count() {
        let cells: Option<Vec<Option<Value>>> = series
            .iter()
            .map(|s| s.get(row).copied().flatten().map(|v| Some(Value::Number(v))))
            .collect();
        match cells {
            Some(cells) => table.push_row(cells),
            None => dropped += 1,
        }
    }

    if table.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "no rows with all of {}",
            names.join(", ")
        )));
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::PairGrid,
            "Pairwise relationships",
            "",
            "",
        )),
        dropped_rows: dropped,
    })
}
