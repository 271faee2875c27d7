//! End-to-end report building.
//!
//! A report is built in one synchronous pass: profile the dataset once,
//! derive every requested view, render each view into pages, and assemble
//! the pages into a [`Document`]. A view that cannot be derived or a page
//! that cannot be rendered is recorded in [`ReportOutcome::failures`] and
//! skipped; only assembly can fail the whole report.
//!
//! All state lives in values the caller owns. Two reports built from
//! different collections never see each other's views.

use crate::config::ReportSettings;
use crate::dataset::{ColumnKind, Dataset};
use crate::document::{Document, DocumentBuilder};
use crate::error::{DeckError, DerivationError, RenderError, Result};
use crate::profiler::{DatasetProfile, profile, summary_table};
use crate::render::{ChartBackend, Page, PageRenderer, PageSource};
use crate::views::{View, ViewSpec, derive_view};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PREVIEW_TITLE: &str = "Raw Data Preview";
pub const SUMMARY_TITLE: &str = "Column Summary";

/// Named views in insertion order.
///
/// Inserting a view whose name is already present replaces it where it
/// stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewCollection {
    views: Vec<View>,
}

impl ViewCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `view`, returning the view it replaced, if any.
    pub fn insert(&mut self, view: View) -> Option<View> {
        match self.views.iter_mut().find(|v| v.name == view.name) {
            Some(slot) => Some(std::mem::replace(slot, view)),
            None => {
                self.views.push(view);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<View> {
        let idx = self.views.iter().position(|v| v.name == name)?;
        Some(self.views.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.views.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl<'a> IntoIterator for &'a ViewCollection {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}

/// A view request with an optional caller-chosen name.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct NamedSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub spec: ViewSpec,
}

impl NamedSpec {
    pub fn resolved_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.spec.default_name())
    }
}

impl From<ViewSpec> for NamedSpec {
    fn from(spec: ViewSpec) -> Self {
        Self { name: None, spec }
    }
}

fn default_true() -> bool {
    true
}

/// What to put in a report. Serialisable so a recipe can be stored as JSON.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ReportRequest {
    pub title: String,
    #[serde(default)]
    pub views: Vec<NamedSpec>,
    #[serde(default = "default_true")]
    pub include_preview: bool,
    #[serde(default = "default_true")]
    pub include_summary: bool,
    /// Overrides [`ReportSettings::split_chart_pages`] when set.
    #[serde(default)]
    pub split_chart_pages: Option<bool>,
}

impl ReportRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            views: Vec::new(),
            include_preview: true,
            include_summary: true,
            split_chart_pages: None,
        }
    }

    #[must_use]
    pub fn with_view(mut self, spec: impl Into<NamedSpec>) -> Self {
        self.views.push(spec.into());
        self
    }

    /// One view of every kind the profile can support, picking the first
    /// columns of the right kinds.
    pub fn suggested(title: impl Into<String>, profile: &DatasetProfile) -> Self {
        let numeric = profile.names_of_kind(ColumnKind::Numeric);
        let categorical = profile.names_of_kind(ColumnKind::Categorical);
        let temporal = profile.names_of_kind(ColumnKind::Temporal);
        let mut request = Self::new(title);

        if let Some(col) = numeric.first() {
            request.views.push(
                ViewSpec::Distribution {
                    column: (*col).to_owned(),
                }
                .into(),
            );
        }
        if let [x, y, ..] = numeric.as_slice() {
            request.views.push(ViewSpec::Correlation.into());
            request.views.push(
                ViewSpec::PairGrid {
                    columns: vec![(*x).to_owned(), (*y).to_owned()],
                }
                .into(),
            );
        }
        if let Some(col) = categorical.first() {
            request.views.push(
                ViewSpec::CategoricalFrequency {
                    column: (*col).to_owned(),
                    limit: None,
                }
                .into(),
            );
        }
        if let (Some(group), Some(value)) = (categorical.first(), numeric.first()) {
            request.views.push(
                ViewSpec::GroupedSpread {
                    group: (*group).to_owned(),
                    value: (*value).to_owned(),
                }
                .into(),
            );
        }
        if let (Some(key), Some(value)) = (temporal.first().or(categorical.first()), numeric.first())
        {
            request.views.push(
                ViewSpec::Trend {
                    key: (*key).to_owned(),
                    value: (*value).to_owned(),
                }
                .into(),
            );
        }
        if let (Some(group), Some(value)) = (categorical.first(), numeric.first()) {
            request.views.push(
                ViewSpec::GroupedAggregate {
                    group: (*group).to_owned(),
                    value: (*value).to_owned(),
                    limit: None,
                }
                .into(),
            );
        }
        if let [x, y, ..] = numeric.as_slice() {
            request.views.push(
                ViewSpec::Scatter {
                    x: (*x).to_owned(),
                    y: (*y).to_owned(),
                }
                .into(),
            );
        }
        request
    }
}

/// A single artifact that was left out of the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactFailure {
    View { name: String, error: DerivationError },
    Page { name: String, error: RenderError },
}

impl ArtifactFailure {
    pub fn name(&self) -> &str {
        match self {
            Self::View { name, .. } | Self::Page { name, .. } => name,
        }
    }
}

impl fmt::Display for ArtifactFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View { name, error } => {
                write!(f, "view '{name}' skipped ({}): {error}", error.reason())
            }
            Self::Page { name, error } => write!(f, "page '{name}' skipped: {error}"),
        }
    }
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub document: Document,
    pub views: ViewCollection,
    pub failures: Vec<ArtifactFailure>,
}

/// Derives, renders and assembles a report.
///
/// # Errors
///
/// Only [`DeckError::Assembly`], when no page could be produced or a page
/// is blank. Per-view and per-page problems are returned in
/// [`ReportOutcome::failures`].
pub fn build_report(
    dataset: &Dataset,
    request: &ReportRequest,
    settings: &ReportSettings,
    backend: &dyn ChartBackend,
) -> Result<ReportOutcome> {
    let profile = profile(dataset);
    let mut failures = Vec::new();

    let views = derive_views(dataset, &profile, request, settings, &mut failures);

    let renderer = PageRenderer::new(backend)
        .with_layout(settings.layout)
        .with_style(settings.chart_style.clone())
        .with_cell_char_cap(settings.cell_char_cap);
    let split = request
        .split_chart_pages
        .unwrap_or(settings.split_chart_pages);

    let mut builder = DocumentBuilder::new();

    if request.include_preview {
        let preview = dataset.head(settings.preview_rows);
        let title = format!("{}: {PREVIEW_TITLE}", request.title);
        push_pages(
            &mut builder,
            &mut failures,
            &title,
            renderer
                .render(PageSource::Table(&preview), &title, settings.max_rows)
                .map(|p| vec![p]),
        );
    }
    if request.include_summary {
        let summary = summary_table(&profile);
        push_pages(
            &mut builder,
            &mut failures,
            SUMMARY_TITLE,
            renderer
                .render(PageSource::Table(&summary), SUMMARY_TITLE, settings.max_rows)
                .map(|p| vec![p]),
        );
    }

    for view in &views {
        let pages = if split {
            renderer.render_split(view, &view.name, settings.max_rows)
        } else {
            renderer
                .render(PageSource::View(view), &view.name, settings.max_rows)
                .map(|p| vec![p])
        };
        push_pages(&mut builder, &mut failures, &view.name, pages);
    }

    let document = builder.finish().map_err(|e| {
        tracing::error!("Report '{}' could not be assembled: {e}", request.title);
        DeckError::from(e)
    })?;

    tracing::info!(
        "Built report '{}': {} pages, {} views, {} skipped",
        request.title,
        document.len(),
        views.len(),
        failures.len()
    );

    Ok(ReportOutcome {
        document,
        views,
        failures,
    })
}

fn derive_views(
    dataset: &Dataset,
    profile: &DatasetProfile,
    request: &ReportRequest,
    settings: &ReportSettings,
    failures: &mut Vec<ArtifactFailure>,
) -> ViewCollection {
    let mut views = ViewCollection::new();
    for named in &request.views {
        let name = named.resolved_name();
        let spec = named.spec.clone().with_default_limit(settings.top_n);
        match derive_view(dataset, profile, &spec) {
            Ok(view) => {
                if views.insert(view.named(name.clone())).is_some() {
                    tracing::debug!("View '{name}' replaced an earlier view of the same name");
                }
            }
            Err(error) => {
                tracing::warn!("Skipping view '{name}' ({}): {error}", error.reason());
                failures.push(ArtifactFailure::View { name, error });
            }
        }
    }
    views
}

fn push_pages(
    builder: &mut DocumentBuilder,
    failures: &mut Vec<ArtifactFailure>,
    name: &str,
    pages: std::result::Result<Vec<Page>, RenderError>,
) {
    match pages {
        Ok(pages) => {
            builder.extend(pages);
        }
        Err(error) => {
            tracing::warn!("Skipping page '{name}': {error}");
            failures.push(ArtifactFailure::Page {
                name: name.to_owned(),
                error,
            });
        }
    }
}
