//! View derivation: turns a dataset plus a [`ViewSpec`] into a [`View`].
//!
//! Every derivation is a pure function of its inputs. A view's table is the
//! only data its chart is drawn from.

pub mod aggregate;
pub mod correlation;
pub mod distribution;
pub mod frequency;
pub mod pair_grid;
pub mod scatter;
pub mod trend;
pub mod types;


pub use distribution::{Histogram, density_curve, histogram};
pub use types::{ChartKind, ChartSpec, DEFAULT_TOP_N, View, ViewSpec};

use crate::dataset::{Column, ColumnKind, Dataset};
use crate::error::DerivationError;
use crate::profiler::DatasetProfile;

/// Looks up `name` and checks its profiled kind against `allowed`.
pub(crate) fn resolve<'a>(
    dataset: &'a Dataset,
    profile: &DatasetProfile,
    name: &str,
    allowed: &[ColumnKind],
    expected: &'static str,
) -> Result<&'a Column, DerivationError> {
    let column = dataset
        .column(name)
        .ok_or_else(|| DerivationError::UnknownColumn(name.to_owned()))?;
    let kind = profile.kind_of(name).unwrap_or_else(|| column.kind());
    if !allowed.contains(&kind) {
        return Err(DerivationError::WrongColumnKind {
            column: name.to_owned(),
            expected,
            found: kind,
        });
    }
    Ok(column)
}

/// Derives a single view. The view is named with [`ViewSpec::default_name`];
/// callers that want another name use [`View::named`].
pub fn derive_view(
    dataset: &Dataset,
    profile: &DatasetProfile,
    spec: &ViewSpec,
) -> Result<View, DerivationError> {
    let view = match spec {
        ViewSpec::Distribution { column } => distribution::derive(dataset, profile, column),
        ViewSpec::Correlation => correlation::derive(dataset, profile),
        ViewSpec::GroupedAggregate {
            group,
            value,
            limit,
        } => aggregate::derive_mean(
            dataset,
            profile,
            group,
            value,
            limit.unwrap_or(DEFAULT_TOP_N),
        ),
        ViewSpec::CategoricalFrequency { column, limit } => {
            frequency::derive(dataset, profile, column, limit.unwrap_or(DEFAULT_TOP_N))
        }
        ViewSpec::Trend { key, value } => trend::derive(dataset, profile, key, value),
        ViewSpec::Scatter { x, y } => scatter::derive(dataset, profile, x, y),
        ViewSpec::GroupedSpread { group, value } => {
            aggregate::derive_spread(dataset, profile, group, value)
        }
        ViewSpec::PairGrid { columns } => pair_grid::derive(dataset, profile, columns),
    }?;

    tracing::debug!(
        "Derived {} view with {} rows ({} dropped)",
        spec.kind_label(),
        view.table.row_count(),
        view.dropped_rows
    );
    Ok(view.named(spec.default_name()))
}
