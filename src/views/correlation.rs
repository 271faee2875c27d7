use super::{ChartKind, ChartSpec, View};
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;
use polars::prelude::Float64Chunked;
use polars::prelude::cov::pearson_corr;

/// Symmetric Pearson matrix over every numeric column.
///
/// The first table column holds the row labels; the remaining columns are
/// named after the numeric columns. Pairs are computed over rows where both
/// values are present. A pair with zero variance or fewer than two complete
/// rows is left missing. The diagonal is always 1.0.
pub fn derive(dataset: &Dataset, profile: &DatasetProfile) -> Result<View, DerivationError> {
    let names = profile.names_of_kind(ColumnKind::Numeric);
    if names.len() < 2 {
        return Err(DerivationError::insufficient("insufficient columns"));
    }

    let series: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| dataset.column(name).map(|c| c.numbers()).unwrap_or_default())
        .collect();

    let n = names.len();
    let mut matrix = vec![vec![None; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        if let Some(cell) = row.get_mut(i) {
            *cell = Some(1.0);
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let (Some(a), Some(b)) = (series.get(i), series.get(j)) else {
                continue;
            };
            let r = pearson(a, b);
            if let Some(cell) = matrix.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = r;
            }
            if let Some(cell) = matrix.get_mut(j).and_then(|row| row.get_mut(i)) {
                *cell = r;
            }
        }
    }

    let mut headers = vec!["column".to_owned()];
    headers.extend(names.iter().map(|s| (*s).to_owned()));
    let mut table = Table::new(headers);
    for (name, row) in names.iter().zip(matrix) {
        let mut cells = vec![Some(Value::text(*name))];
        cells.extend(row.into_iter().map(|r| r.map(Value::Number)));
        table.push_row(cells);
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::Heatmap,
            "Correlation Heatmap",
            "",
            "",
        )),
        dropped_rows: 0,
    })
}

/// Pearson correlation over pairwise-complete observations.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    if xs.len() < 2 {
        return None;
    }

    let xs = Float64Chunked::from_vec("x".into(), xs);
    let ys = Float64Chunked::from_vec("y".into(), ys);
    // zero variance comes back as NaN
    pearson_corr(&xs, &ys)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect() {
        let a = [Some(1.0), Some(2.0), Some(3.0)];
        let b = [Some(2.0), Some(4.0), Some(6.0)];
        let r = pearson(&a, &b).expect("defined");
        assert!((r - 1.0).abs() < 1e-12);

        let c = [Some(3.0), Some(2.0), Some(1.0)];
        let r = pearson(&a, &c).expect("defined");
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_missing_pairs() {
        let a = [Some(1.0), None, Some(2.0), Some(3.0)];
        let b = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        let r = pearson(&a, &b).expect("defined");
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_needs_two_complete_pairs() {
        let a = [Some(1.0), None, Some(3.0)];
        let b = [Some(1.0), Some(2.0), None];
        assert_eq!(pearson(&a, &b), None);
        assert_eq!(pearson(&[], &[]), None);
    }

    #[test]
    fn test_pearson_partial_correlation() {
        // r = 0.8 for this textbook sample
        let a = [1.0, 2.0, 3.0, 4.0, 5.0].map(Some);
        let b = [2.0, 1.0, 4.0, 3.0, 5.0].map(Some);
        let r = pearson(&a, &b).expect("defined");
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_undefined() {
        let a = [Some(1.0), Some(1.0), Some(1.0)];
        let b = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson(&a, &b), None);
    }
}
