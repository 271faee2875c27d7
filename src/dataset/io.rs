//! Polars boundary: CSV ingestion into a [`Dataset`] and conversion of result
//! tables back into a `DataFrame` for export.
//!
//! CSV files are read with schema inference disabled so every column arrives
//! as raw strings. Kind inference then happens once, in
//! [`Column::from_raw`], with the same rules for every source.

use super::{Column, Dataset, Table, Value};
use anyhow::{Context as _, Result};
use polars::prelude::{
    Column as FrameColumn, CsvReadOptions, DataFrame, DataType, NamedFrom as _, SerReader as _,
    Series,
};
use std::path::Path;

/// Loads a delimited text file into a [`Dataset`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the resulting
/// columns violate the dataset invariants.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" | "tsv" | "txt" => {
            let separator = if ext == "tsv" { b'\t' } else { b',' };
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(0))
                .map_parse_options(|opts| opts.with_separator(separator))
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()
                .with_context(|| format!("Failed to read CSV: {}", path.display()))?
        }
        _ => return Err(anyhow::anyhow!("Unsupported file extension: {ext}")),
    };

    let dataset = dataset_from_df(&df)?;
    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(dataset)
}

/// Converts a polars `DataFrame` into a [`Dataset`], re-inferring column kinds
/// from the string form of every cell.
pub fn dataset_from_df(df: &DataFrame) -> Result<Dataset> {
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let series = col.as_materialized_series();
        let strings = series
            .cast(&DataType::String)
            .with_context(|| format!("Column '{name}' cannot be read as text"))?;
        let raw: Vec<Option<String>> = strings
            .str()
            .map_err(|e| anyhow::anyhow!(e))?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect();
        columns.push(Column::from_raw(name, &raw));
    }

    Ok(Dataset::new(columns)?)
}

/// Converts a result table into a `DataFrame`.
///
/// Columns holding only numbers become `Float64`; anything else is written as
/// its display string.
pub fn table_to_df(table: &Table) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.column_count());

    for (idx, header) in table.headers().iter().enumerate() {
        let all_numeric = table
            .column(idx)
            .all(|v| v.is_none_or(|v| matches!(v, Value::Number(_))));

        let series = if all_numeric {
            Series::new(header.as_str().into(), table.column_f64(idx))
        } else {
            let strings: Vec<Option<String>> = table
                .column(idx)
                .map(|v| v.map(ToString::to_string))
                .collect();
            Series::new(header.as_str().into(), strings)
        };
        columns.push(FrameColumn::from(series));
    }

    DataFrame::new(columns).context("Failed to build DataFrame from table")
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;
    use crate::dataset::ColumnKind;
    use std::io::Write as _;

    #[test]
    fn test_load_csv_infers_kinds() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("sales.csv");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "city,sales,day")?;
        writeln!(file, "A,10,2024-01-03")?;
        writeln!(file, "B,,2024-01-01")?;
        writeln!(file, "C,3.5,2024-01-02")?;
        drop(file);

        let ds = load_dataset(&path)?;
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column("city").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(ds.column("sales").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(ds.column("day").unwrap().kind(), ColumnKind::Temporal);
        assert_eq!(
            ds.column("sales").unwrap().numbers(),
            vec![Some(10.0), None, Some(3.5)]
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_dataset(Path::new("data.parquet"));
        assert!(result.is_err());
    }

    #[test]
    fn test_table_to_df_types() -> Result<()> {
        let mut table = Table::new(vec!["label".to_owned(), "count".to_owned()]);
        table.push_row(vec![Some(Value::text("A")), Some(Value::Number(2.0))]);
        table.push_row(vec![Some(Value::text("B")), None]);

        let df = table_to_df(&table)?;
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("count")?.dtype(), &DataType::Float64);
        assert_eq!(df.column("label")?.dtype(), &DataType::String);
        Ok(())
    }
}
