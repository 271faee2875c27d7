//! Page rendering: chart images plus fixed-layout table grids.

pub mod chart;
pub mod data;
pub mod layout;
pub mod page;
pub mod svg;

pub use chart::{ChartBackend, ChartImage, ChartStyle, ImageFormat};
pub use data::{ChartData, XAxis, chart_data};
pub use layout::{PageLayout, Rect};
pub use page::{GridRow, Page, PageImage, PageRenderer, PageSource, PageTable, RowKind};
pub use svg::SvgChartBackend;
