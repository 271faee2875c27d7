use serde::{Deserialize, Serialize};

/// Axis-aligned box in page points, origin top-left.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Debug, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fixed page geometry, in points. The default is A4 portrait.
///
/// A page is split top to bottom into a title band, an optional image
/// region and the table region.
#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Debug)]
#[serde(default)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub title_band: f64,
    pub image_height: f64,
    pub row_height: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 36.0,
            title_band: 40.0,
            image_height: 300.0,
            row_height: 18.0,
        }
    }
}

impl PageLayout {
    pub fn content_width(&self) -> f64 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    /// Box for an image of the given pixel size. The image spans the content
    /// width at the backend's aspect ratio; only an image too tall for the
    /// image region is scaled down and centred.
    pub fn image_rect(&self, px_width: u32, px_height: u32) -> Rect {
        let top = self.margin + self.title_band;
        let full = self.content_width();
        if px_width == 0 || px_height == 0 {
            return Rect {
                x: self.margin,
                y: top,
                width: full,
                height: self.image_height,
            };
        }

        let aspect = f64::from(px_height) / f64::from(px_width);
        let (width, height) = if full * aspect > self.image_height {
            (self.image_height / aspect, self.image_height)
        } else {
            (full, full * aspect)
        };
        Rect {
            x: self.margin + (full - width) / 2.0,
            y: top,
            width,
            height,
        }
    }

    /// Y coordinate of the first table row.
    pub fn table_top(&self, has_image: bool) -> f64 {
        let top = self.margin + self.title_band;
        if has_image {
            top + self.image_height
        } else {
            top
        }
    }

    /// Rows that fit in the table region, header and marker included.
    pub fn rows_fitting(&self, has_image: bool) -> usize {
        if self.row_height <= 0.0 {
            return 0;
        }
        let available = self.height - self.margin - self.table_top(has_image);
        (available / self.row_height).floor().max(0.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let layout = PageLayout::default();
        assert!((layout.content_width() - 523.0).abs() < 1e-9);
        assert!((layout.table_top(false) - 76.0).abs() < 1e-9);
        assert!((layout.table_top(true) - 376.0).abs() < 1e-9);
        // 20 data rows plus header and marker fit below an image
        assert!(layout.rows_fitting(true) >= 22);
    }

    #[test]
    fn test_image_rect_keeps_aspect() {
        let layout = PageLayout::default();

        let wide = layout.image_rect(800, 400);
        assert!((wide.width - 523.0).abs() < 1e-9);
        assert!((wide.height - 261.5).abs() < 1e-9);

        let tall = layout.image_rect(400, 800);
        assert!((tall.height - 300.0).abs() < 1e-9);
        assert!((tall.width - 150.0).abs() < 1e-9);
        assert!(tall.x > layout.margin);
    }

    #[test]
    fn test_default_chart_spans_content_width() {
        let layout = PageLayout::default();
        let style = crate::render::ChartStyle::default();
        let rect = layout.image_rect(style.width, style.height);
        assert!((rect.width - layout.content_width()).abs() < 1e-9);
        assert!((rect.x - layout.margin).abs() < 1e-9);
        assert!(rect.height <= layout.image_height);
    }
}
