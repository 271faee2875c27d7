//! Integration tests for the full report workflow
//!
//! These tests load fixture CSVs, derive views, build reports and write them
//! to disk, checking the end-to-end results.

#![expect(clippy::unwrap_used)]

use datadeck::config::ReportSettings;
use datadeck::dataset::{ColumnKind, Dataset, Value, load_dataset};
use datadeck::document::write_document;
use datadeck::profiler::profile;
use datadeck::render::{PageRenderer, PageSource, RowKind, SvgChartBackend};
use datadeck::session::{ReportRequest, build_report};
use datadeck::views::{ViewSpec, derive_view};
use std::path::Path;

fn sales() -> Dataset {
    load_dataset(Path::new("testdata/sales.csv")).unwrap()
}

fn orders() -> Dataset {
    load_dataset(Path::new("testdata/orders.csv")).unwrap()
}

fn label_value_pairs(table: &datadeck::dataset::Table) -> Vec<(String, f64)> {
    table
        .rows()
        .iter()
        .map(|row| {
            let mut cells = row.iter();
            let label = cells.next().unwrap().as_ref().unwrap().to_string();
            let value = cells.next().unwrap().as_ref().and_then(Value::as_f64).unwrap();
            (label, value)
        })
        .collect()
}

#[test]
fn test_fixture_kinds() {
    let ds = sales();
    let p = profile(&ds);

    assert_eq!(p.row_count, 6);
    assert_eq!(p.kind_of("day"), Some(ColumnKind::Temporal));
    assert_eq!(p.kind_of("city"), Some(ColumnKind::Categorical));
    assert_eq!(p.kind_of("sales"), Some(ColumnKind::Numeric));
    assert_eq!(p.kind_of("units"), Some(ColumnKind::Numeric));
    assert_eq!(p.get("channel").unwrap().missing, 1);
}

#[test]
fn test_aggregate_and_frequency_on_fixture() {
    let ds = sales();
    let p = profile(&ds);

    let aggregate = derive_view(
        &ds,
        &p,
        &ViewSpec::GroupedAggregate {
            group: "city".to_owned(),
            value: "sales".to_owned(),
            limit: None,
        },
    )
    .unwrap();
    assert_eq!(
        label_value_pairs(&aggregate.table),
        vec![
            ("A".to_owned(), 15.0),
            ("B".to_owned(), 5.0),
            ("C".to_owned(), 2.0)
        ]
    );

    let frequency = derive_view(
        &ds,
        &p,
        &ViewSpec::CategoricalFrequency {
            column: "city".to_owned(),
            limit: None,
        },
    )
    .unwrap();
    assert_eq!(
        label_value_pairs(&frequency.table),
        vec![
            ("C".to_owned(), 3.0),
            ("A".to_owned(), 2.0),
            ("B".to_owned(), 1.0)
        ]
    );
}

#[test]
fn test_trend_over_dates() {
    let ds = sales();
    let view = derive_view(
        &ds,
        &profile(&ds),
        &ViewSpec::Trend {
            key: "day".to_owned(),
            value: "sales".to_owned(),
        },
    )
    .unwrap();

    let values: Vec<f64> = view
        .table
        .column_f64(1)
        .into_iter()
        .map(Option::unwrap)
        .collect();
    assert_eq!(values, vec![20.0, 1.0, 5.0, 2.0, 10.0, 3.0]);
    assert_eq!(view.table.cell(0, 0).unwrap().to_string(), "2024-01-01");
}

#[test]
fn test_top_ten_and_dropped_rows() {
    let ds = orders();
    let p = profile(&ds);

    let frequency = derive_view(
        &ds,
        &p,
        &ViewSpec::CategoricalFrequency {
            column: "city".to_owned(),
            limit: None,
        },
    )
    .unwrap();
    assert_eq!(frequency.table.row_count(), 10);
    // all twelve cities occur five times; ties keep first-seen order
    let first: Vec<String> = label_value_pairs(&frequency.table)
        .into_iter()
        .take(3)
        .map(|(l, _)| l)
        .collect();
    assert_eq!(first, ["Lisbon", "Porto", "Braga"]);

    let trend = derive_view(
        &ds,
        &p,
        &ViewSpec::Trend {
            key: "ordered_at".to_owned(),
            value: "amount".to_owned(),
        },
    )
    .unwrap();
    assert_eq!(trend.dropped_rows, 4);
    assert_eq!(trend.table.row_count(), 56);
}

#[test]
fn test_raw_table_truncation() {
    let ds = orders();
    let raw = ds.head(ds.row_count());
    let page = PageRenderer::new(&SvgChartBackend)
        .render(PageSource::Table(&raw), "All orders", 20)
        .unwrap();
    let grid = page.table.unwrap();

    assert_eq!(grid.data_rows().count(), 20);
    let kinds: Vec<RowKind> = grid.rows.iter().map(|r| r.kind).collect();
    assert_eq!(kinds.first(), Some(&RowKind::Header));
    assert_eq!(kinds.last(), Some(&RowKind::TruncationMarker));
    assert_eq!(
        grid.rows.last().unwrap().cells.first().unwrap(),
        "… 40 more rows (table truncated)"
    );
}

#[test]
fn test_suggested_report_end_to_end() -> anyhow::Result<()> {
    let ds = sales();
    let request = ReportRequest::suggested("Sales", &profile(&ds));
    let outcome = build_report(&ds, &request, &ReportSettings::default(), &SvgChartBackend)?;

    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
    assert_eq!(outcome.views.len(), 8);
    // preview + summary + one page per view
    assert_eq!(outcome.document.len(), 10);

    let tmp = tempfile::TempDir::new()?;
    let out = tmp.path().join("sales-report");
    let report = write_document(&outcome.document, &out)?;

    let markdown = std::fs::read_to_string(report)?;
    assert!(markdown.starts_with("# Sales: Raw Data Preview"));
    assert!(markdown.contains("# Column Summary"));
    assert!(markdown.contains("# Grouped Average: sales by city"));
    assert!(markdown.contains("# Pair Grid: sales, units"));
    assert_eq!(std::fs::read_dir(out.join("images"))?.count(), 8);
    Ok(())
}

#[test]
fn test_reports_are_reproducible() -> anyhow::Result<()> {
    let ds = orders();
    let request = ReportRequest::suggested("Orders", &profile(&ds));
    let settings = ReportSettings::default();

    let a = build_report(&ds, &request, &settings, &SvgChartBackend)?;
    let b = build_report(&ds, &request, &settings, &SvgChartBackend)?;
    assert_eq!(a.document, b.document);
    Ok(())
}
