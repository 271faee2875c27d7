//! Deterministic SVG chart backend built on plotters.
//!
//! Charts are drawn onto an in-memory [`SVGBackend`]. Text is measured with
//! the built-in font estimator rather than system fonts, so identical inputs
//! produce identical bytes on every machine.

use super::chart::{ChartBackend, ChartImage, ChartStyle, ImageFormat};
use super::data::{BoxSummary, ChartData, PieSlice, XAxis, chart_data};
use crate::dataset::Table;
use crate::error::RenderError;
use crate::utils::{format_number, truncate_chars};
use crate::views::{ChartSpec, Histogram, histogram};
use plotters::backend::SVGBackend;
use plotters::chart::{ChartBuilder, ChartContext};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::{DrawingArea, DrawingAreaErrorKind, IntoDrawingArea as _};
use plotters::element::{Circle, PathElement, Polygon, Rectangle};
use plotters::series::LineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color as _, FontDesc, FontFamily, FontStyle, RGBColor, TextStyle};
use std::f64::consts::PI;
use std::ops::Range;

const INK: RGBColor = RGBColor(55, 65, 81);
const MUTED: RGBColor = RGBColor(107, 114, 128);
const GRID: RGBColor = RGBColor(229, 231, 235);
const WHITE: RGBColor = RGBColor(255, 255, 255);
const FALLBACK: RGBColor = RGBColor(37, 99, 235);

const MIN_WIDTH: u32 = 160;
const MIN_HEIGHT: u32 = 120;
/// Smallest pair grid panel, in pixels.
const MIN_PANEL: u32 = 48;
/// Panels at least this big get tick labels.
const TICKED_PANEL: u32 = 110;
const LABEL_CHARS: usize = 14;

type DrawResult<T = ()> = Result<T, DrawingAreaErrorKind<std::io::Error>>;
type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Plot<'a, 'b> = ChartContext<'b, SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Clone, Copy, Debug, Default)]
pub struct SvgChartBackend;

impl ChartBackend for SvgChartBackend {
    fn render_chart(
        &self,
        chart: &ChartSpec,
        table: &Table,
        style: &ChartStyle,
    ) -> Result<ChartImage, RenderError> {
        if style.width < MIN_WIDTH || style.height < MIN_HEIGHT {
            return Err(RenderError::EncodingFailure(format!(
                "canvas {}x{} is too small",
                style.width, style.height
            )));
        }
        let data = chart_data(chart, table)?;
        if let ChartData::PairGrid { columns, .. } = &data {
            let n = u32::try_from(columns.len()).unwrap_or(u32::MAX);
            let panel = style.width.min(style.height.saturating_sub(40)) / n.max(1);
            if panel < MIN_PANEL {
                return Err(RenderError::EncodingFailure(format!(
                    "{n} columns do not fit a {}x{} pair grid",
                    style.width, style.height
                )));
            }
        }

        let mut svg = String::new();
        draw(&mut svg, chart, &data, style).map_err(|err| {
            RenderError::EncodingFailure(format!("{} chart: {err}", chart.kind.as_str()))
        })?;
        Ok(ChartImage {
            format: ImageFormat::Svg,
            width: style.width,
            height: style.height,
            bytes: svg.into_bytes(),
        })
    }
}

/// Colours and fonts resolved from a [`ChartStyle`].
struct Theme<'a> {
    palette: Vec<RGBColor>,
    background: RGBColor,
    title: TextStyle<'a>,
    label: TextStyle<'a>,
    tick: TextStyle<'a>,
}

impl<'a> Theme<'a> {
    fn new(style: &'a ChartStyle) -> Self {
        let family = style.font_family.as_str();
        let size = f64::from(style.font_size.max(6));
        Self {
            palette: style.palette.iter().filter_map(|c| parse_hex(c)).collect(),
            background: parse_hex(&style.background).unwrap_or(WHITE),
            title: font(family, size + 3.0, FontStyle::Bold, INK),
            label: font(family, size, FontStyle::Normal, MUTED),
            tick: font(family, (size - 2.0).max(6.0), FontStyle::Normal, MUTED),
        }
    }

    /// Palette colour for series `i`, cycling.
    fn color(&self, i: usize) -> RGBColor {
        if self.palette.is_empty() {
            return FALLBACK;
        }
        self.palette
            .get(i % self.palette.len())
            .copied()
            .unwrap_or(FALLBACK)
    }
}

fn font(family: &str, size: f64, weight: FontStyle, color: RGBColor) -> TextStyle<'_> {
    FontDesc::new(FontFamily::Name(family), size, weight).color(&color)
}

/// `#rrggbb` to a colour.
fn parse_hex(hex: &str) -> Option<RGBColor> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(digits.get(at..at + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Blue for -1, white for 0, red for +1.
fn diverging(r: f64) -> RGBColor {
    let t = r.clamp(-1.0, 1.0);
    let to = if t < 0.0 {
        (37.0, 99.0, 235.0)
    } else {
        (220.0, 38.0, 38.0)
    };
    let k = t.abs();
    let mix = |b: f64| (255.0 + (b - 255.0) * k).round() as u8;
    RGBColor(mix(to.0), mix(to.1), mix(to.2))
}

/// Range covering `values` with 5% headroom. A single value gets a unit
/// range around it.
fn span(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    let pad = if hi - lo < f64::EPSILON {
        0.5
    } else {
        (hi - lo) * 0.05
    };
    (lo - pad)..(hi + pad)
}

/// Range that always includes zero, padded only away from it.
fn zero_span(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        return 0.0..1.0;
    }
    let pad = (hi - lo) * 0.05;
    let lo = if lo < 0.0 { lo - pad } else { 0.0 };
    let hi = if hi > 0.0 { hi + pad } else { 0.0 };
    lo..hi
}

fn px(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn draw(svg: &mut String, chart: &ChartSpec, data: &ChartData, style: &ChartStyle) -> DrawResult {
    let theme = Theme::new(style);
    let root = SVGBackend::with_string(svg, (style.width, style.height)).into_drawing_area();
    root.fill(&theme.background)?;
    let area = root.titled(&chart.title, theme.title.clone())?;

    match data {
        ChartData::Histogram { hist, density } => {
            draw_histogram(&area, chart, &theme, hist, density)
        }
        ChartData::Heatmap { labels, cells } => draw_heatmap(&area, &theme, labels, cells),
        ChartData::Bars(bars) => draw_bars(&area, chart, &theme, bars),
        ChartData::Pie(slices) => draw_pie(&area, &theme, slices),
        ChartData::Line { points, axis } => draw_line(&area, chart, &theme, points, axis),
        ChartData::Scatter(points) => draw_scatter(&area, chart, &theme, points),
        ChartData::Boxes(boxes) => draw_boxes(&area, chart, &theme, boxes),
        ChartData::PairGrid { names, columns } => draw_pair_grid(&area, &theme, names, columns),
    }?;
    root.present()
}

fn cartesian<'a, 'b>(
    area: &'b Area<'a>,
    x: Range<f64>,
    y: Range<f64>,
    label_areas: (u32, u32),
) -> DrawResult<Plot<'a, 'b>> {
    ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(label_areas.0)
        .y_label_area_size(label_areas.1)
        .build_cartesian_2d(x, y)
}

fn axes(
    plot: &mut Plot<'_, '_>,
    theme: &Theme<'_>,
    chart: &ChartSpec,
    x_labels: usize,
    x_fmt: &dyn Fn(&f64) -> String,
) -> DrawResult {
    plot.configure_mesh()
        .disable_x_mesh()
        .light_line_style(GRID.stroke_width(1))
        .bold_line_style(GRID.stroke_width(1))
        .axis_style(MUTED.stroke_width(1))
        .x_labels(x_labels)
        .y_labels(6)
        .x_label_formatter(x_fmt)
        .y_label_formatter(&|v| format_number(*v))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .label_style(theme.tick.clone())
        .axis_desc_style(theme.label.clone())
        .draw()
}

fn histogram_bars(plot: &mut Plot<'_, '_>, hist: &Histogram, color: RGBColor) -> DrawResult {
    plot.draw_series(hist.bins.iter().filter(|(_, n)| *n > 0).map(|&(lo, n)| {
        Rectangle::new(
            [(lo, 0.0), (lo + hist.bin_width, n as f64)],
            color.mix(0.8).filled(),
        )
    }))?;
    Ok(())
}

fn draw_histogram(
    area: &Area<'_>,
    chart: &ChartSpec,
    theme: &Theme<'_>,
    hist: &Histogram,
    density: &[(f64, f64)],
) -> DrawResult {
    let Some(&(start, _)) = hist.bins.first() else {
        return Ok(());
    };
    let end = start + hist.bin_width * hist.bins.len() as f64;
    let peak = density
        .iter()
        .map(|(_, y)| *y)
        .fold(hist.max_count() as f64, f64::max)
        .max(1.0);

    let mut plot = cartesian(area, start..end, 0.0..peak * 1.05, (36, 52))?;
    axes(&mut plot, theme, chart, 8, &|v| format_number(*v))?;
    histogram_bars(&mut plot, hist, theme.color(0))?;
    plot.draw_series(LineSeries::new(
        density.iter().copied(),
        theme.color(1).stroke_width(2),
    ))?;
    Ok(())
}

fn draw_bars(
    area: &Area<'_>,
    chart: &ChartSpec,
    theme: &Theme<'_>,
    bars: &[(String, f64)],
) -> DrawResult {
    let n = bars.len();
    let axis = XAxis::Labels(
        bars.iter()
            .map(|(label, _)| truncate_chars(label, LABEL_CHARS))
            .collect(),
    );
    let mut plot = cartesian(
        area,
        -0.5..(n as f64 - 0.5),
        zero_span(bars.iter().map(|(_, v)| *v)),
        (36, 52),
    )?;
    axes(&mut plot, theme, chart, n, &|v| axis.label(*v))?;
    plot.draw_series(bars.iter().enumerate().map(|(i, (_, v))| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *v)], theme.color(i).filled())
    }))?;
    Ok(())
}

fn draw_line(
    area: &Area<'_>,
    chart: &ChartSpec,
    theme: &Theme<'_>,
    points: &[(f64, f64)],
    axis: &XAxis,
) -> DrawResult {
    let ticks = match axis {
        XAxis::Labels(labels) => labels.len().min(8),
        XAxis::Number | XAxis::Time => 6,
    };
    let mut plot = cartesian(
        area,
        span(points.iter().map(|p| p.0)),
        span(points.iter().map(|p| p.1)),
        (36, 52),
    )?;
    axes(&mut plot, theme, chart, ticks, &|v| axis.label(*v))?;
    plot.draw_series(LineSeries::new(
        points.iter().copied(),
        theme.color(0).stroke_width(2),
    ))?;
    Ok(())
}

fn dots(
    plot: &mut Plot<'_, '_>,
    points: impl IntoIterator<Item = (f64, f64)>,
    color: RGBColor,
    radius: i32,
) -> DrawResult {
    plot.draw_series(
        points
            .into_iter()
            .map(|p| Circle::new(p, radius, color.mix(0.7).filled())),
    )?;
    Ok(())
}

fn draw_scatter(
    area: &Area<'_>,
    chart: &ChartSpec,
    theme: &Theme<'_>,
    points: &[(f64, f64)],
) -> DrawResult {
    let mut plot = cartesian(
        area,
        span(points.iter().map(|p| p.0)),
        span(points.iter().map(|p| p.1)),
        (36, 52),
    )?;
    axes(&mut plot, theme, chart, 6, &|v| format_number(*v))?;
    dots(&mut plot, points.iter().copied(), theme.color(0), 3)
}

fn draw_boxes(
    area: &Area<'_>,
    chart: &ChartSpec,
    theme: &Theme<'_>,
    boxes: &[BoxSummary],
) -> DrawResult {
    let n = boxes.len();
    let axis = XAxis::Labels(
        boxes
            .iter()
            .map(|b| truncate_chars(&b.label, LABEL_CHARS))
            .collect(),
    );
    let mut plot = cartesian(
        area,
        -0.5..(n as f64 - 0.5),
        span(boxes.iter().flat_map(|b| [b.min, b.max])),
        (36, 52),
    )?;
    axes(&mut plot, theme, chart, n, &|v| axis.label(*v))?;

    let ink = INK.stroke_width(1);
    for (i, b) in boxes.iter().enumerate() {
        let x = i as f64;
        plot.draw_series([
            PathElement::new(vec![(x, b.min), (x, b.q1)], ink),
            PathElement::new(vec![(x, b.q3), (x, b.max)], ink),
            PathElement::new(vec![(x - 0.15, b.min), (x + 0.15, b.min)], ink),
            PathElement::new(vec![(x - 0.15, b.max), (x + 0.15, b.max)], ink),
        ])?;
        plot.draw_series([
            Rectangle::new(
                [(x - 0.3, b.q3), (x + 0.3, b.q1)],
                theme.color(i).mix(0.7).filled(),
            ),
            Rectangle::new([(x - 0.3, b.q3), (x + 0.3, b.q1)], ink),
        ])?;
        plot.draw_series(std::iter::once(PathElement::new(
            vec![(x - 0.3, b.median), (x + 0.3, b.median)],
            INK.stroke_width(2),
        )))?;
    }
    Ok(())
}

/// Pixel outline of a pie slice starting at `start` radians.
fn wedge(center: (f64, f64), r: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep / (PI / 90.0)).ceil().max(1.0) as usize;
    let mut outline = vec![px(center.0, center.1)];
    outline.extend((0..=steps).map(|k| {
        let a = start + sweep * k as f64 / steps as f64;
        px(center.0 + r * a.cos(), center.1 + r * a.sin())
    }));
    outline
}

fn draw_pie(area: &Area<'_>, theme: &Theme<'_>, slices: &[PieSlice]) -> DrawResult {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (f64::from(w), f64::from(h));
    let r = ((w / 2.0).min(h) / 2.0 - 12.0).max(4.0);
    let center = (w / 4.0, h / 2.0);
    let legend_x = (w / 2.0) as i32 + 12;
    let legend_style = theme
        .label
        .color(&INK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let mut start = -PI / 2.0;
    for (i, slice) in slices.iter().enumerate() {
        let color = theme.color(i);
        let sweep = slice.percent / 100.0 * 2.0 * PI;
        if sweep > 0.0 {
            area.draw(&Polygon::new(wedge(center, r, start, sweep), color.filled()))?;
        }
        start += sweep;

        let y = 12 + 18 * i as i32;
        area.draw(&Rectangle::new(
            [(legend_x, y), (legend_x + 10, y + 10)],
            color.filled(),
        ))?;
        area.draw_text(
            &format!("{} ({:.1}%)", slice.label, slice.percent),
            &legend_style,
            (legend_x + 16, y + 5),
        )?;
    }
    Ok(())
}

fn draw_heatmap(
    area: &Area<'_>,
    theme: &Theme<'_>,
    labels: &[String],
    cells: &[Vec<Option<f64>>],
) -> DrawResult {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let n = (labels.len() as i32).max(1);
    let (gutter, foot) = (90, 24);
    let size = ((w - gutter).min(h - foot) / n).max(1);
    let left = gutter + (w - gutter - size * n) / 2;

    let value_style = theme
        .tick
        .color(&INK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (i, row) in cells.iter().enumerate() {
        for (j, &cell) in row.iter().enumerate() {
            let (x, y) = (left + j as i32 * size, i as i32 * size);
            let corners = [(x, y), (x + size, y + size)];
            area.draw(&Rectangle::new(
                corners,
                cell.map_or(GRID, diverging).filled(),
            ))?;
            area.draw(&Rectangle::new(corners, WHITE.stroke_width(1)))?;
            if let Some(r) = cell {
                area.draw_text(&format!("{r:.2}"), &value_style, (x + size / 2, y + size / 2))?;
            }
        }
    }

    let row_style = theme.tick.pos(Pos::new(HPos::Right, VPos::Center));
    let col_style = theme.tick.pos(Pos::new(HPos::Center, VPos::Top));
    for (i, label) in labels.iter().enumerate() {
        let mid = i as i32 * size + size / 2;
        let short = truncate_chars(label, LABEL_CHARS);
        area.draw_text(&short, &row_style, (left - 4, mid))?;
        area.draw_text(&short, &col_style, (left + mid, n * size + 4))?;
    }
    Ok(())
}

/// An n×n grid: histograms on the diagonal, scatters of column `col`
/// against column `row` everywhere else. Only outer panels carry axis names.
fn draw_pair_grid(
    area: &Area<'_>,
    theme: &Theme<'_>,
    names: &[String],
    columns: &[Vec<f64>],
) -> DrawResult {
    let n = columns.len();
    let spans: Vec<Range<f64>> = columns.iter().map(|c| span(c.iter().copied())).collect();

    for (idx, panel) in area.split_evenly((n, n)).iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        let (Some(xs), Some(ys), Some(x_span), Some(y_span)) = (
            columns.get(col),
            columns.get(row),
            spans.get(col),
            spans.get(row),
        ) else {
            continue;
        };

        let (pw, ph) = panel.dim_in_pixel();
        let ticked = pw.min(ph) >= TICKED_PANEL;
        let bottom = row + 1 == n;
        let x_area = if bottom { if ticked { 30 } else { 16 } } else { 0 };
        let y_area = if col == 0 { if ticked { 44 } else { 16 } } else { 0 };
        let desc = |i: usize, shown: bool| {
            names.get(i).filter(|_| shown).map_or("", String::as_str)
        };
        let (x_desc, y_desc) = (desc(col, bottom), desc(row, col == 0));

        if row == col {
            let hist = histogram(xs);
            let Some(&(start, _)) = hist.bins.first() else {
                continue;
            };
            let end = start + hist.bin_width * hist.bins.len() as f64;
            let top = (hist.max_count() as f64 * 1.05).max(1.0);
            let mut plot = cartesian(panel, start..end, 0.0..top, (x_area, y_area))?;
            panel_axes(&mut plot, theme, ticked, x_desc, y_desc)?;
            histogram_bars(&mut plot, &hist, theme.color(0))?;
        } else {
            let mut plot =
                cartesian(panel, x_span.clone(), y_span.clone(), (x_area, y_area))?;
            panel_axes(&mut plot, theme, ticked, x_desc, y_desc)?;
            dots(
                &mut plot,
                xs.iter().copied().zip(ys.iter().copied()),
                theme.color(0),
                2,
            )?;
        }
    }
    Ok(())
}

fn panel_axes(
    plot: &mut Plot<'_, '_>,
    theme: &Theme<'_>,
    ticked: bool,
    x_desc: &str,
    y_desc: &str,
) -> DrawResult {
    let ticks = if ticked { 3 } else { 0 };
    plot.configure_mesh()
        .disable_mesh()
        .axis_style(MUTED.stroke_width(1))
        .x_labels(ticks)
        .y_labels(ticks)
        .x_label_formatter(&|v| format_number(*v))
        .y_label_formatter(&|v| format_number(*v))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(theme.tick.clone())
        .axis_desc_style(theme.tick.clone())
        .draw()
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;
    use crate::dataset::Value;
    use crate::views::ChartKind;

    fn bar_table() -> Table {
        let mut t = Table::new(vec!["city".to_owned(), "Average of sales".to_owned()]);
        for (l, v) in [("A", 15.0), ("B", 5.0), ("C & D", 2.0)] {
            t.push_row(vec![Some(Value::text(l)), Some(Value::Number(v))]);
        }
        t
    }

    fn numbers(headers: &[&str], rows: &[&[f64]]) -> Table {
        let mut t = Table::new(headers.iter().map(|h| (*h).to_owned()).collect());
        for row in rows {
            t.push_row(row.iter().map(|v| Some(Value::Number(*v))).collect());
        }
        t
    }

    fn rgb_of(c: RGBColor) -> (u8, u8, u8) {
        (c.0, c.1, c.2)
    }

    fn render(kind: ChartKind, table: &Table) -> String {
        let chart = ChartSpec::new(kind, "t", "x", "y");
        let image = SvgChartBackend
            .render_chart(&chart, table, &ChartStyle::default())
            .unwrap();
        String::from_utf8(image.bytes).unwrap()
    }

    #[test]
    fn test_svg_is_deterministic() {
        let chart = ChartSpec::new(ChartKind::Bar, "Average sales by city", "city", "sales");
        let style = ChartStyle::default();
        let a = SvgChartBackend.render_chart(&chart, &bar_table(), &style).unwrap();
        let b = SvgChartBackend.render_chart(&chart, &bar_table(), &style).unwrap();
        assert_eq!(a, b);
        assert_eq!((a.width, a.height), (640, 360));

        let text = String::from_utf8(a.bytes).unwrap();
        assert!(text.starts_with("<svg"), "not an svg document");
        assert!(text.contains("Average sales by city"), "title missing");
    }

    #[test]
    fn test_every_kind_renders() {
        let pairs = numbers(&["x", "y"], &[&[1.0, 1.0], &[2.0, 3.0], &[3.0, 5.0], &[4.0, 7.0]]);
        for kind in [
            ChartKind::Bar,
            ChartKind::Pie,
            ChartKind::Line,
            ChartKind::Scatter,
            ChartKind::Heatmap,
            ChartKind::PairGrid,
        ] {
            assert!(render(kind, &pairs).starts_with("<svg"), "{kind:?}");
        }

        let values = numbers(&["x"], &[&[1.0], &[2.0], &[2.5], &[4.0]]);
        assert!(render(ChartKind::Histogram, &values).contains("<rect"));

        let spread = numbers(
            &["g", "min", "q1", "median", "q3", "max"],
            &[&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 2.5, 3.0, 3.5, 4.0]],
        );
        assert!(render(ChartKind::BoxPlot, &spread).contains("<rect"));
    }

    #[test]
    fn test_pie_draws_one_wedge_per_slice() {
        let text = render(ChartKind::Pie, &bar_table());
        assert_eq!(text.matches("<polygon").count(), 3);
        assert!(text.contains("(68.2%)"), "share missing from legend");
    }

    #[test]
    fn test_pair_grid_scatters_off_diagonal() {
        let table = numbers(
            &["a", "b", "c"],
            &[
                &[1.0, 2.0, 3.0],
                &[2.0, 1.0, 0.0],
                &[3.0, 5.0, 1.0],
                &[4.0, 4.0, 2.0],
            ],
        );
        let text = render(ChartKind::PairGrid, &table);
        // six scatter panels of four points each
        assert_eq!(text.matches("<circle").count(), 24);
    }

    #[test]
    fn test_pair_grid_too_wide_for_canvas() {
        let headers: Vec<String> = (0..9).map(|i| format!("c{i}")).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let row = [1.0; 9];
        let table = numbers(&header_refs, &[&row, &row]);
        let chart = ChartSpec::new(ChartKind::PairGrid, "t", "", "");
        assert!(matches!(
            SvgChartBackend.render_chart(&chart, &table, &ChartStyle::default()),
            Err(RenderError::EncodingFailure(_))
        ));
    }

    #[test]
    fn test_tiny_canvas_fails() {
        let chart = ChartSpec::new(ChartKind::Bar, "t", "", "");
        let style = ChartStyle {
            width: 100,
            height: 100,
            ..ChartStyle::default()
        };
        assert!(matches!(
            SvgChartBackend.render_chart(&chart, &bar_table(), &style),
            Err(RenderError::EncodingFailure(_))
        ));
    }

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(rgb_of(diverging(0.0)), (255, 255, 255));
        assert_eq!(rgb_of(diverging(1.0)), (220, 38, 38));
        assert_eq!(rgb_of(diverging(-1.0)), (37, 99, 235));
    }

    #[test]
    fn test_palette_parsing() {
        assert_eq!(parse_hex("#0891b2").map(rgb_of), Some((8, 145, 178)));
        assert!(parse_hex("0891b2").is_none());
        assert!(parse_hex("#08").is_none());

        let style = ChartStyle {
            palette: vec!["not a colour".to_owned()],
            ..ChartStyle::default()
        };
        let theme = Theme::new(&style);
        assert_eq!(rgb_of(theme.color(3)), rgb_of(FALLBACK));
    }
}
