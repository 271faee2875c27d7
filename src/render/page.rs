//! Fixed-layout pages.
//!
//! A page is a title band, an optional chart image and a table grid. Every
//! geometric decision is made here, up front, so a page can be serialised
//! without any further measuring: column widths are an equal split of the
//! content width, every row has the same height, and cell text is hard-cut
//! to a character cap.

use super::chart::{ChartBackend, ChartImage, ChartStyle};
use super::layout::{PageLayout, Rect};
use crate::dataset::{Table, Value};
use crate::error::RenderError;
use crate::utils::truncate_chars;
use crate::views::View;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CELL_CHAR_CAP: usize = 24;

/// What a page is rendered from.
#[derive(Clone, Copy, Debug)]
pub enum PageSource<'a> {
    /// A derived view: its chart (if any) plus its table.
    View(&'a View),
    /// A bare table, such as the raw preview or the profile summary.
    Table(&'a Table),
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct PageImage {
    pub image: ChartImage,
    pub rect: Rect,
}

#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub enum RowKind {
    Header,
    Data,
    TruncationMarker,
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct GridRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
    /// Top edge of the row, in page points.
    pub y: f64,
}

/// A table laid out on the page grid.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct PageTable {
    pub x: f64,
    pub column_width: f64,
    pub row_height: f64,
    pub rows: Vec<GridRow>,
    /// Source rows replaced by the truncation marker.
    pub hidden_rows: usize,
}

impl PageTable {
    pub fn header(&self) -> Option<&GridRow> {
        self.rows.iter().find(|r| r.kind == RowKind::Header)
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &GridRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Data)
    }

    pub fn is_truncated(&self) -> bool {
        self.hidden_rows > 0
    }
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct Page {
    pub title: String,
    pub image: Option<PageImage>,
    pub table: Option<PageTable>,
    pub max_rows: usize,
    pub layout: PageLayout,
    /// 1-based position, assigned when the document is assembled.
    pub number: Option<usize>,
}

impl Page {
    /// A page with nothing to show.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.image.is_none() && self.table.is_none()
    }
}

pub fn truncation_marker(hidden: usize) -> String {
    format!("… {hidden} more rows (table truncated)")
}

/// Lays out views and tables as pages.
pub struct PageRenderer<'a> {
    layout: PageLayout,
    style: ChartStyle,
    cell_char_cap: usize,
    backend: &'a dyn ChartBackend,
}

impl<'a> PageRenderer<'a> {
    pub fn new(backend: &'a dyn ChartBackend) -> Self {
        Self {
            layout: PageLayout::default(),
            style: ChartStyle::default(),
            cell_char_cap: DEFAULT_CELL_CHAR_CAP,
            backend,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_cell_char_cap(mut self, cap: usize) -> Self {
        self.cell_char_cap = cap;
        self
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Renders one page: the view's chart above its table, or just the table.
    pub fn render(
        &self,
        source: PageSource<'_>,
        title: &str,
        max_rows: usize,
    ) -> Result<Page, RenderError> {
        let (image, table) = match source {
            PageSource::View(view) => (self.chart_image(view)?, &view.table),
            PageSource::Table(table) => (None, table),
        };
        let grid = self.grid(table, max_rows, image.is_some());
        Ok(self.page(title, image, Some(grid), max_rows))
    }

    /// Renders a view as an image page followed by a table page. A view
    /// without a chart yields just the table page.
    pub fn render_split(
        &self,
        view: &View,
        title: &str,
        max_rows: usize,
    ) -> Result<Vec<Page>, RenderError> {
        let Some(image) = self.chart_image(view)? else {
            return Ok(vec![self.render(PageSource::Table(&view.table), title, max_rows)?]);
        };
        let grid = self.grid(&view.table, max_rows, false);
        Ok(vec![
            self.page(title, Some(image), None, max_rows),
            self.page(&format!("{title} (table)"), None, Some(grid), max_rows),
        ])
    }

    fn page(
        &self,
        title: &str,
        image: Option<PageImage>,
        table: Option<PageTable>,
        max_rows: usize,
    ) -> Page {
        Page {
            title: title.to_owned(),
            image,
            table,
            max_rows,
            layout: self.layout,
            number: None,
        }
    }

    fn chart_image(&self, view: &View) -> Result<Option<PageImage>, RenderError> {
        let Some(chart) = &view.chart else {
            return Ok(None);
        };
        let image = self.backend.render_chart(chart, &view.table, &self.style)?;
        if image.width == 0 || image.height == 0 || image.bytes.is_empty() {
            return Err(RenderError::EncodingFailure(format!(
                "backend returned an empty image for '{}'",
                chart.title
            )));
        }
        let rect = self.layout.image_rect(image.width, image.height);
        Ok(Some(PageImage { image, rect }))
    }

    /// Data rows shown for a table of `total` rows: at most `max_rows`, and
    /// never more than the page has room for below the header (and the marker,
    /// when rows are hidden).
    fn shown_rows(&self, total: usize, max_rows: usize, below_image: bool) -> usize {
        let fitting = self.layout.rows_fitting(below_image);
        if total <= max_rows.min(fitting.saturating_sub(1)) {
            return total;
        }
        let shown = max_rows.min(fitting.saturating_sub(2));
        if shown < max_rows {
            tracing::debug!(
                "Only {shown} of max_rows={max_rows} table rows fit on the page"
            );
        }
        shown
    }

    fn grid(&self, table: &Table, max_rows: usize, below_image: bool) -> PageTable {
        let columns = table.column_count().max(1);
        let column_width = self.layout.content_width() / columns as f64;
        let row_height = self.layout.row_height;
        let top = self.layout.table_top(below_image);
        let y = |i: usize| top + i as f64 * row_height;
        let shown = self.shown_rows(table.row_count(), max_rows, below_image);

        let mut rows = Vec::with_capacity(shown + 2);
        rows.push(GridRow {
            kind: RowKind::Header,
            cells: table
                .headers()
                .iter()
                .map(|h| truncate_chars(h, self.cell_char_cap))
                .collect(),
            y: y(0),
        });

        for row in table.rows().iter().take(shown) {
            let cells = row.iter().map(|c| self.cell_text(c.as_ref())).collect();
            rows.push(GridRow {
                kind: RowKind::Data,
                cells,
                y: y(rows.len()),
            });
        }

        let hidden = table.row_count() - shown;
        if hidden > 0 {
            let mut cells = vec![String::new(); table.column_count()];
            if let Some(first) = cells.first_mut() {
                *first = truncation_marker(hidden);
            }
            rows.push(GridRow {
                kind: RowKind::TruncationMarker,
                cells,
                y: y(rows.len()),
            });
        }

        PageTable {
            x: self.layout.margin,
            column_width,
            row_height,
            rows,
            hidden_rows: hidden,
        }
    }

    fn cell_text(&self, value: Option<&Value>) -> String {
        value
            .map(|v| truncate_chars(&v.to_string(), self.cell_char_cap))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;
    use crate::render::SvgChartBackend;
    use crate::views::{ChartKind, ChartSpec};

    struct BrokenBackend;

    impl ChartBackend for BrokenBackend {
        fn render_chart(
            &self,
            _chart: &ChartSpec,
            _table: &Table,
            _style: &ChartStyle,
        ) -> Result<ChartImage, RenderError> {
            Err(RenderError::EncodingFailure("no fonts".to_owned()))
        }
    }

    fn counts_view(rows: usize) -> View {
        let mut table = Table::new(vec!["label".to_owned(), "Count".to_owned()]);
        for i in 0..rows {
            table.push_row(vec![
                Some(Value::text(format!("value-{i}"))),
                Some(Value::Number((rows - i) as f64)),
            ]);
        }
        View {
            name: "Frequency: label".to_owned(),
            table,
            chart: Some(ChartSpec::new(ChartKind::Bar, "Counts", "label", "Count")),
            dropped_rows: 0,
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = PageRenderer::new(&SvgChartBackend);
        let view = counts_view(5);
        let a = renderer.render(PageSource::View(&view), "Counts", 20).unwrap();
        let b = renderer.render(PageSource::View(&view), "Counts", 20).unwrap();
        assert_eq!(a, b);
        assert!(a.image.is_some());
    }

    #[test]
    fn test_truncation_adds_one_marker_row() {
        let renderer = PageRenderer::new(&SvgChartBackend);
        let view = counts_view(30);
        let page = renderer.render(PageSource::View(&view), "Counts", 20).unwrap();
        let table = page.table.unwrap();

        assert_eq!(table.data_rows().count(), 20);
        let markers: Vec<&GridRow> = table
            .rows
            .iter()
            .filter(|r| r.kind == RowKind::TruncationMarker)
            .collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(
            markers.first().unwrap().cells.first().unwrap(),
            "… 10 more rows (table truncated)"
        );
        assert_eq!(table.rows.last().unwrap().kind, RowKind::TruncationMarker);
        assert_eq!(table.hidden_rows, 10);
    }

    #[test]
    fn test_no_marker_when_rows_fit() {
        let renderer = PageRenderer::new(&SvgChartBackend);
        let view = counts_view(20);
        let page = renderer.render(PageSource::View(&view), "Counts", 20).unwrap();
        let table = page.table.unwrap();
        assert_eq!(table.rows.len(), 21);
        assert!(!table.is_truncated());
    }

    #[test]
    fn test_grid_geometry() {
        let renderer = PageRenderer::new(&SvgChartBackend).with_cell_char_cap(4);
        let mut table = Table::new(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]);
        table.push_row(vec![Some(Value::text("abcdefgh")), None, Some(Value::Number(0.5))]);
        let page = renderer.render(PageSource::Table(&table), "Raw", 5).unwrap();

        assert!(page.image.is_none());
        let grid = page.table.unwrap();
        let layout = renderer.layout();
        assert!((grid.column_width - layout.content_width() / 3.0).abs() < 1e-9);
        let data = grid.data_rows().next().unwrap();
        assert_eq!(data.cells, ["abcd", "", "0.5"]);
        let header = grid.header().unwrap();
        assert!((data.y - header.y - layout.row_height).abs() < 1e-9);
        assert!((header.y - layout.table_top(false)).abs() < 1e-9);
    }

    #[test]
    fn test_rows_never_run_past_the_page() {
        let renderer = PageRenderer::new(&SvgChartBackend);
        let layout = *renderer.layout();
        let bottom = layout.height - layout.margin;
        let view = counts_view(60);

        let page = renderer.render(PageSource::View(&view), "Counts", 40).unwrap();
        let grid = page.table.unwrap();
        let fitting = layout.rows_fitting(true);
        assert_eq!(grid.rows.len(), fitting);
        assert_eq!(grid.data_rows().count(), fitting - 2);
        assert_eq!(grid.hidden_rows, 60 - (fitting - 2));
        assert_eq!(grid.rows.last().unwrap().kind, RowKind::TruncationMarker);
        for row in &grid.rows {
            assert!(row.y + grid.row_height <= bottom + 1e-9, "row at {} overflows", row.y);
        }

        // a table that fits exactly needs no marker
        let exact = counts_view(fitting - 1);
        let page = renderer.render(PageSource::View(&exact), "Counts", 40).unwrap();
        let grid = page.table.unwrap();
        assert!(!grid.is_truncated());
        assert_eq!(grid.rows.len(), fitting);
    }

    #[test]
    fn test_backend_failure_is_encoding_failure() {
        let renderer = PageRenderer::new(&BrokenBackend);
        let view = counts_view(3);
        let err = renderer
            .render(PageSource::View(&view), "Counts", 20)
            .unwrap_err();
        assert_eq!(err, RenderError::EncodingFailure("no fonts".to_owned()));

        // a bare table never touches the backend
        assert!(renderer.render(PageSource::Table(&view.table), "Counts", 20).is_ok());
    }

    #[test]
    fn test_split_pages() {
        let renderer = PageRenderer::new(&SvgChartBackend);
        let view = counts_view(3);
        let pages = renderer.render_split(&view, "Counts", 20).unwrap();
        assert_eq!(pages.len(), 2);
        let (image_page, table_page) = (pages.first().unwrap(), pages.last().unwrap());
        assert!(image_page.image.is_some() && image_page.table.is_none());
        assert!(table_page.image.is_none() && table_page.table.is_some());
        assert_eq!(table_page.title, "Counts (table)");
    }
}
