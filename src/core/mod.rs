//! Chart data model, styling, and pure geometry mapping.

pub mod axis;
pub mod data;
pub mod mapping;
pub mod palette;
pub mod style;
pub mod types;

pub use axis::{AxisKind, AxisRange, AxisSlot};
pub use data::{
    DataDelta, DataSnapshot, ErrorBarConfig, ErrorBarKind, SeriesData, SeriesKind,
    TrendlineConfig, TrendlineKind,
};
pub use mapping::PlotMapper;
pub use palette::Palette;
pub use style::{
    AxisStyle, ChartStyle, LegendFlow, LegendGrouping, LegendPosition, LegendStyle,
    STYLE_RESOLUTION_ORDER, SeriesStyleOverride, StyleSource, ThemeOverrides, ValueLabelStyle,
};
pub use types::{Point, Rect};
