//! Single-view exports.
//!
//! These serialise a view's table or chart image as they are. Nothing is
//! re-derived from the dataset, so an export always matches the page it came
//! from.

use crate::dataset::{Table, Value, table_to_df};
use crate::error::{DeckError, Result, ResultExt as _};
use crate::render::ChartImage;
use polars::prelude::{CsvWriter, SerWriter as _};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Excel limits sheet names to 31 characters.
const SHEET_NAME_MAX: usize = 31;

pub fn export_table_csv(table: &Table, path: &Path) -> Result<()> {
    let mut df = table_to_df(table)?;
    let file = std::fs::File::create(path).context("Failed to create CSV file")?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to write CSV file")?;

    tracing::info!("Exported {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// Writes `table` to a single-sheet workbook with a bold header row.
pub fn export_table_xlsx(table: &Table, sheet_name: &str, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name_for(sheet_name))?;

    let bold = Format::new().set_bold();
    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, header, &bold)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let xl_row = u32::try_from(r + 1)
            .map_err(|_| DeckError::Export(format!("too many rows for XLSX: {}", r + 1)))?;
        for (c, cell) in row.iter().enumerate() {
            let col = column_index(c)?;
            match cell {
                Some(Value::Number(n)) => {
                    worksheet.write_number(xl_row, col, *n)?;
                }
                Some(other) => {
                    worksheet.write_string(xl_row, col, other.to_string())?;
                }
                None => {}
            }
        }
    }

    workbook.save(path)?;
    tracing::info!("Exported {} rows to {}", table.row_count(), path.display());
    Ok(())
}

pub fn export_chart_svg(image: &ChartImage, path: &Path) -> Result<()> {
    std::fs::write(path, &image.bytes).with_context(|| {
        format!("Failed to write chart image to {}", path.display())
    })?;
    tracing::info!("Exported chart image to {}", path.display());
    Ok(())
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| DeckError::Export(format!("too many columns for XLSX: {col}")))
}

/// Replaces characters Excel rejects in sheet names and enforces the length
/// limit. An empty name becomes `Sheet1`.
fn sheet_name_for(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            _ => c,
        })
        .take(SHEET_NAME_MAX)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_owned();
    if cleaned.is_empty() {
        "Sheet1".to_owned()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ImageFormat;
    use tempfile::TempDir;

    fn counts() -> Table {
        let mut t = Table::new(vec!["city".to_owned(), "Count".to_owned()]);
        t.push_row(vec![Some(Value::text("A")), Some(Value::Number(2.0))]);
        t.push_row(vec![Some(Value::text("B")), None]);
        t
    }

    #[test]
    fn test_export_csv() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("counts.csv");
        export_table_csv(&counts(), &path)?;

        let content = std::fs::read_to_string(&path)?;
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("city,Count"));
        assert!(lines.next().is_some_and(|l| l.starts_with("A,2")));
        assert_eq!(lines.next(), Some("B,"));
        Ok(())
    }

    #[test]
    fn test_export_xlsx() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("counts.xlsx");
        export_table_xlsx(&counts(), "Frequency: city", &path)?;
        // XLSX is a zip container
        let bytes = std::fs::read(&path)?;
        assert!(bytes.starts_with(b"PK"));
        Ok(())
    }

    #[test]
    fn test_export_svg() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("chart.svg");
        let image = ChartImage {
            format: ImageFormat::Svg,
            width: 10,
            height: 10,
            bytes: b"<svg/>".to_vec(),
        };
        export_chart_svg(&image, &path)?;
        assert_eq!(std::fs::read(&path)?, b"<svg/>");
        Ok(())
    }

    #[test]
    fn test_sheet_name_for() {
        assert_eq!(sheet_name_for("Frequency: city"), "Frequency_ city");
        assert_eq!(sheet_name_for(""), "Sheet1");
        assert_eq!(sheet_name_for(&"x".repeat(40)).chars().count(), 31);
    }
}
