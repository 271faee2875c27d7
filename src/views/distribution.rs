use super::{ChartKind, ChartSpec, View, resolve};
use crate::dataset::{ColumnKind, Dataset, Table, Value};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;

const MIN_BINS: usize = 5;
const MAX_BINS: usize = 50;
const SINGLE_VALUE_BINS: usize = 20;
const DENSITY_POINTS: usize = 100;

/// Fixed-width histogram: bin start and count.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Histogram {
    pub bin_width: f64,
    pub bins: Vec<(f64, usize)>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|(_, n)| n).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|(_, n)| *n).max().unwrap_or(0)
    }
}

pub fn derive(
    dataset: &Dataset,
    profile: &DatasetProfile,
    column: &str,
) -> Result<View, DerivationError> {
    let col = resolve(dataset, profile, column, &[ColumnKind::Numeric], "numeric")?;
    let values: Vec<f64> = col.numbers().into_iter().flatten().collect();

    if values.is_empty() {
        return Err(DerivationError::insufficient(format!(
            "column '{column}' has no values"
        )));
    }

    let mut table = Table::new(vec![column.to_owned()]);
    for v in &values {
        table.push_row(vec![Some(Value::Number(*v))]);
    }

    Ok(View {
        name: String::new(),
        table,
        chart: Some(ChartSpec::new(
            ChartKind::Histogram,
            format!("Distribution of {column}"),
            column,
            "Count",
        )),
        dropped_rows: col.missing_count(),
    })
}

/// Bins values into fixed-width buckets.
///
/// Bin width follows the Freedman–Diaconis rule (falling back to a
/// square-root rule when the IQR is zero), clamped to 5..=50 bins. A constant
/// column gets 20 unit-width bins with every value in bin 10.
pub fn histogram(values: &[f64]) -> Histogram {
    let (Some(min_v), Some(max_v)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Histogram::default();
    };

    if (max_v - min_v).abs() < f64::EPSILON {
        let bin_width = 1.0;
        let start = min_v - 10.0 * bin_width;
        let bins = (0..SINGLE_VALUE_BINS)
            .map(|i| {
                let count = if i == 10 { values.len() } else { 0 };
                (start + i as f64 * bin_width, count)
            })
            .collect();
        return Histogram { bin_width, bins };
    }

    let n = values.len() as f64;
    let stats = crate::profiler::numeric_stats(values);
    let iqr = stats.q3.unwrap_or(max_v) - stats.q1.unwrap_or(min_v);
    let h = if iqr > 0.0 {
        2.0 * iqr / n.cbrt()
    } else {
        (max_v - min_v) / n.sqrt()
    };

    let num_bins = (((max_v - min_v) / h).ceil() as usize).clamp(MIN_BINS, MAX_BINS);
    let bin_width = (max_v - min_v) / num_bins as f64;

    let mut counts = vec![0_usize; num_bins];
    for &val in values {
        let idx = (((val - min_v) / bin_width).floor() as usize).min(num_bins - 1);
        if let Some(slot) = counts.get_mut(idx) {
            *slot += 1;
        }
    }

    Histogram {
        bin_width,
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| (min_v + i as f64 * bin_width, count))
            .collect(),
    }
}

/// Gaussian kernel density estimate, scaled to histogram counts so it can be
/// drawn over the bars. Uses Scott's bandwidth.
pub fn density_curve(values: &[f64], hist: &Histogram) -> Vec<(f64, f64)> {
    let stats = crate::profiler::numeric_stats(values);
    let (Some(std), Some(first), Some(last)) = (
        stats.std_dev,
        hist.bins.first(),
        hist.bins.last(),
    ) else {
        return Vec::new();
    };
    if std <= 0.0 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let lo = first.0;
    let hi = last.0 + hist.bin_width;
    let step = (hi - lo) / (DENSITY_POINTS - 1) as f64;
    let norm = 1.0 / (bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n * hist.bin_width;

    (0..DENSITY_POINTS)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    norm * (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                / n;
            (x, density * scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![expect(clippy::indexing_slicing)]
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let hist = histogram(&[1.0, 1.0, 2.0, 3.0, 10.0]);
        assert!(!hist.bins.is_empty());
        assert!(hist.bins.len() >= MIN_BINS && hist.bins.len() <= MAX_BINS);
        assert_eq!(hist.total(), 5);
    }

    #[test]
    fn test_histogram_single_value() {
        let hist = histogram(&[2.0, 2.0, 2.0]);
        assert_eq!(hist.bins.len(), 20);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.bins[10].1, 3);
    }

    #[test]
    fn test_histogram_empty() {
        assert_eq!(histogram(&[]), Histogram::default());
    }

    #[test]
    fn test_density_curve_spans_bins() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 8.0];
        let hist = histogram(&values);
        let curve = density_curve(&values, &hist);
        assert_eq!(curve.len(), DENSITY_POINTS);
        assert!(curve.iter().all(|(_, y)| *y >= 0.0));
    }
}
