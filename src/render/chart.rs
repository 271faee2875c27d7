use crate::dataset::Table;
use crate::error::RenderError;
use crate::views::ChartSpec;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub enum ImageFormat {
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
        }
    }
}

/// Encoded chart produced by a [`ChartBackend`].
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ChartImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Visual settings handed to the backend with every chart.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub font_size: u32,
    pub background: String,
    pub palette: Vec<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            font_family: "sans-serif".to_owned(),
            font_size: 12,
            background: "#ffffff".to_owned(),
            palette: [
                "#2563eb", "#d97706", "#059669", "#dc2626", "#7c3aed", "#0891b2", "#db2777",
                "#65a30d", "#4b5563", "#ea580c",
            ]
            .map(str::to_owned)
            .to_vec(),
        }
    }
}

impl ChartStyle {
    /// Palette colour for series `i`, cycling.
    pub fn color(&self, i: usize) -> &str {
        if self.palette.is_empty() {
            return "#2563eb";
        }
        self.palette
            .get(i % self.palette.len())
            .map_or("#2563eb", String::as_str)
    }
}

/// Turns a chart descriptor plus its view's table into an image.
///
/// Implementations must be deterministic: the same inputs give the same
/// bytes.
pub trait ChartBackend {
    fn render_chart(
        &self,
        chart: &ChartSpec,
        table: &Table,
        style: &ChartStyle,
    ) -> Result<ChartImage, RenderError>;
}
