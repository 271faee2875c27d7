use super::{ChartKind, ChartSpec, View, resolve};
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;
use std::collections::HashMap;

pub const COUNT_HEADER: &str = "Count";

/// Value counts of a categorical column, top `limit` by count.
///
/// Counting is done once here; the pie chart reads its shares from the
/// `Count` column, never from the source column.
pub fn derive(
    dataset: &Dataset,
    profile: &DatasetProfile,
    column: &str,
    limit: usize,
) -> Result<View, DerivationError> {
    let col = resolve(dataset, profile, column, &[ColumnKind::Categorical], "categorical")?;

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in col.values().iter().flatten() {
        let label = value.to_string();
        match index.get(&label) {
            Some(&i) => {
                if let Some(entry) = counts.get_mut(i) {
                    entry.1 += 1;
                }
            }
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    if counts.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "column '{column}' has no values"
        )));
    }

    // stable sort: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);

    let mut table = Table::new(vec![column.to_owned(), COUNT_HEADER.to_owned()]);
    for (label, n) in counts {
        table.push_row(vec![Some(Value::Text(label)), Some(Value::Number(n as f64))]);
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::Pie,
            format!("Top {column} values"),
            column,
            COUNT_HEADER,
        )),
        dropped_rows: col.missing_count(),
    })
}
