use crate::dataset::Table;
use serde::{Deserialize, Serialize};

/// Default number of rows kept by top-N views.
pub const DEFAULT_TOP_N: usize = 10;

/// What to derive: one arm per view kind, carrying its column references.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewSpec {
    /// Histogram with density overlay of one numeric column.
    Distribution { column: String },
    /// Pearson correlation across all numeric columns.
    Correlation,
    /// Mean of a numeric column per category, top-N by mean.
    GroupedAggregate {
        group: String,
        value: String,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Value counts of a categorical column, top-N by count.
    CategoricalFrequency {
        column: String,
        #[serde(default)]
        limit: Option<usize>,
    },
    /// Numeric value ordered by a sortable key.
    Trend { key: String, value: String },
    /// Two numeric columns against each other.
    Scatter { x: String, y: String },
    /// Five-number summary of a numeric column per category.
    GroupedSpread { group: String, value: String },
    /// Every pair of two or more numeric columns against each other.
    PairGrid { columns: Vec<String> },
}

impl ViewSpec {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Distribution { .. } => "Distribution",
            Self::Correlation => "Correlation",
            Self::GroupedAggregate { .. } => "Grouped Average",
            Self::CategoricalFrequency { .. } => "Frequency",
            Self::Trend { .. } => "Trend",
            Self::Scatter { .. } => "Scatter",
            Self::GroupedSpread { .. } => "Spread",
            Self::PairGrid { .. } => "Pair Grid",
        }
    }

    /// Name used when the caller does not pick one.
    pub fn default_name(&self) -> String {
        let label = self.kind_label();
        match self {
            Self::Distribution { column } | Self::CategoricalFrequency { column, .. } => {
                format!("{label}: {column}")
            }
            Self::Correlation => format!("{label}: numeric columns"),
            Self::GroupedAggregate { group, value, .. } | Self::GroupedSpread { group, value } => {
                format!("{label}: {value} by {group}")
            }
            Self::Trend { key, value } => format!("{label}: {value} over {key}"),
            Self::Scatter { x, y } => format!("{label}: {y} vs {x}"),
            Self::PairGrid { columns } => format!("{label}: {}", columns.join(", ")),
        }
    }

    /// Fills in `limit` for top-N kinds that left it unset.
    #[must_use]
    pub fn with_default_limit(mut self, n: usize) -> Self {
        if let Self::GroupedAggregate { limit, .. } | Self::CategoricalFrequency { limit, .. } =
            &mut self
        {
            limit.get_or_insert(n);
        }
        self
    }
}

/// Chart families the backend knows how to draw.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub enum ChartKind {
    Histogram,
    Heatmap,
    Bar,
    Pie,
    Line,
    Scatter,
    BoxPlot,
    PairGrid,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Heatmap => "heatmap",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::BoxPlot => "box",
            Self::PairGrid => "pair_grid",
        }
    }
}

/// Chart descriptor. The data always comes from the owning view's table, read
/// positionally:
///
/// | kind | columns |
/// |------|---------|
/// | `Histogram` | 0 = raw values |
/// | `Heatmap` | 0 = row labels, 1.. = matrix |
/// | `Bar`, `Pie` | 0 = labels, 1 = value / count |
/// | `Line`, `Scatter` | 0 = x, 1 = y |
/// | `BoxPlot` | 0 = group, 1..=5 = min, q1, median, q3, max |
/// | `PairGrid` | every column, one numeric series each |
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartSpec {
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

/// A derived table plus the chart drawn from it.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct View {
    pub name: String,
    pub table: Table,
    pub chart: Option<ChartSpec>,
    /// Source rows skipped because a required cell was missing.
    pub dropped_rows: usize,
}

impl View {
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_json_shape() -> anyhow::Result<()> {
        let spec: ViewSpec =
            serde_json::from_str(r#"{"kind":"grouped_aggregate","group":"city","value":"sales"}"#)?;
        assert_eq!(
            spec,
            ViewSpec::GroupedAggregate {
                group: "city".to_owned(),
                value: "sales".to_owned(),
                limit: None,
            }
        );
        assert_eq!(spec.default_name(), "Grouped Average: sales by city");
        Ok(())
    }

    #[test]
    fn test_pair_grid_json_shape() -> anyhow::Result<()> {
        let spec: ViewSpec =
            serde_json::from_str(r#"{"kind":"pair_grid","columns":["sales","units"]}"#)?;
        assert_eq!(spec.default_name(), "Pair Grid: sales, units");
        Ok(())
    }

    #[test]
    fn test_with_default_limit_keeps_explicit() {
        let spec = ViewSpec::CategoricalFrequency {
            column: "city".to_owned(),
            limit: Some(3),
        }
        .with_default_limit(10);
        assert!(matches!(
            spec,
            ViewSpec::CategoricalFrequency { limit: Some(3), .. }
        ));

        let spec = ViewSpec::CategoricalFrequency {
            column: "city".to_owned(),
            limit: None,
        }
        .with_default_limit(7);
        assert!(matches!(
            spec,
            ViewSpec::CategoricalFrequency { limit: Some(7), .. }
        ));
    }
}
