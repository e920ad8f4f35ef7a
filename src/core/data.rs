use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::axis::AxisSlot;
use crate::error::{ChartError, ChartResult};

/// Chart family a series is drawn as.
///
/// The set is closed on purpose: every dispatch on it is an exhaustive
/// `match` without a wildcard arm, so adding a kind fails to compile until
/// each switch site handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SeriesKind {
    #[default]
    Line,
    Area,
    Column,
    Bar,
    Scatter,
    Bubble,
    Pie,
    Donut,
    StackedColumn,
    StackedBar,
    StackedArea,
    Stacked100Column,
    Stacked100Bar,
    Stacked100Area,
    Histogram,
    Pareto,
    BoxWhisker,
    Waterfall,
    Radar,
    Funnel,
}

impl SeriesKind {
    /// Horizontal-bar orientation: categories run along the vertical axis and
    /// values along the horizontal one.
    #[must_use]
    pub const fn is_bar_oriented(self) -> bool {
        matches!(self, Self::Bar | Self::StackedBar | Self::Stacked100Bar)
    }

    #[must_use]
    pub const fn is_stacked(self) -> bool {
        matches!(
            self,
            Self::StackedColumn
                | Self::StackedBar
                | Self::StackedArea
                | Self::Stacked100Column
                | Self::Stacked100Bar
                | Self::Stacked100Area
        )
    }

    /// Stacked kinds normalized to per-category percentage shares.
    #[must_use]
    pub const fn is_stacked_100(self) -> bool {
        matches!(
            self,
            Self::Stacked100Column | Self::Stacked100Bar | Self::Stacked100Area
        )
    }

    /// Kinds drawn as spans from the zero baseline, which therefore pin the
    /// value range to include zero.
    #[must_use]
    pub const fn is_baseline_anchored(self) -> bool {
        match self {
            Self::Area
            | Self::Column
            | Self::Bar
            | Self::StackedColumn
            | Self::StackedBar
            | Self::StackedArea
            | Self::Stacked100Column
            | Self::Stacked100Bar
            | Self::Stacked100Area
            | Self::Histogram
            | Self::Pareto
            | Self::BoxWhisker
            | Self::Waterfall => true,
            Self::Line
            | Self::Scatter
            | Self::Bubble
            | Self::Pie
            | Self::Donut
            | Self::Radar
            | Self::Funnel => false,
        }
    }

    /// Kinds plotted against the category/value axis grid. The remaining
    /// kinds (pie, donut, radar, funnel) draw a self-contained figure and are
    /// cached as one monolithic data recording.
    #[must_use]
    pub const fn uses_plot_axes(self) -> bool {
        match self {
            Self::Line
            | Self::Area
            | Self::Column
            | Self::Bar
            | Self::Scatter
            | Self::Bubble
            | Self::StackedColumn
            | Self::StackedBar
            | Self::StackedArea
            | Self::Stacked100Column
            | Self::Stacked100Bar
            | Self::Stacked100Area
            | Self::Histogram
            | Self::Pareto
            | Self::BoxWhisker
            | Self::Waterfall => true,
            Self::Pie | Self::Donut | Self::Radar | Self::Funnel => false,
        }
    }

    /// Whether the legend lists category labels instead of series names.
    #[must_use]
    pub const fn uses_category_legend(self) -> bool {
        matches!(self, Self::Pie | Self::Donut | Self::Funnel)
    }

    /// Display prefix for synthesized category legend labels.
    #[must_use]
    pub const fn category_label_prefix(self) -> &'static str {
        match self {
            Self::Funnel => "Stage",
            Self::Pie
            | Self::Donut
            | Self::Line
            | Self::Area
            | Self::Column
            | Self::Bar
            | Self::Scatter
            | Self::Bubble
            | Self::StackedColumn
            | Self::StackedBar
            | Self::StackedArea
            | Self::Stacked100Column
            | Self::Stacked100Bar
            | Self::Stacked100Area
            | Self::Histogram
            | Self::Pareto
            | Self::BoxWhisker
            | Self::Waterfall
            | Self::Radar => "Category",
        }
    }

    /// Whether trendline and error-bar overlays may be derived for this kind.
    #[must_use]
    pub const fn supports_overlays(self) -> bool {
        match self {
            Self::Line | Self::Area | Self::Column | Self::Bar | Self::Scatter | Self::Bubble => {
                true
            }
            Self::Pie
            | Self::Donut
            | Self::StackedColumn
            | Self::StackedBar
            | Self::StackedArea
            | Self::Stacked100Column
            | Self::Stacked100Bar
            | Self::Stacked100Area
            | Self::Histogram
            | Self::Pareto
            | Self::BoxWhisker
            | Self::Waterfall
            | Self::Radar
            | Self::Funnel => false,
        }
    }
}

/// Trend overlay family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendlineKind {
    Linear,
    Exponential,
    Logarithmic,
    Power,
    Polynomial,
    MovingAverage,
}

fn default_polynomial_order() -> u32 {
    2
}

fn default_moving_average_period() -> usize {
    2
}

/// One trend overlay attached to a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendlineConfig {
    pub kind: TrendlineKind,
    /// Polynomial degree; clamped to the supported range at fit time.
    #[serde(default = "default_polynomial_order")]
    pub polynomial_order: u32,
    /// Trailing window width for moving averages.
    #[serde(default = "default_moving_average_period")]
    pub period: usize,
}

impl TrendlineConfig {
    #[must_use]
    pub fn new(kind: TrendlineKind) -> Self {
        Self {
            kind,
            polynomial_order: default_polynomial_order(),
            period: default_moving_average_period(),
        }
    }

    #[must_use]
    pub fn with_polynomial_order(mut self, order: u32) -> Self {
        self.polynomial_order = order;
        self
    }

    #[must_use]
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.kind == TrendlineKind::MovingAverage && self.period == 0 {
            return Err(ChartError::InvalidData(
                "moving average period must be >= 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// How per-point error amounts are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorBarKind {
    /// `value` is the error amount in data units.
    Fixed,
    /// `value` is a percentage of each point's magnitude.
    Percentage,
    /// `value` multiplies the sample standard deviation of the series.
    StandardDeviation,
    /// `value` multiplies the standard error of the mean.
    StandardError,
}

fn default_cap_length() -> f64 {
    6.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBarConfig {
    pub kind: ErrorBarKind,
    pub value: f64,
    /// Cap stroke length in surface units.
    #[serde(default = "default_cap_length")]
    pub cap_length: f64,
}

impl ErrorBarConfig {
    #[must_use]
    pub fn new(kind: ErrorBarKind, value: f64) -> Self {
        Self {
            kind,
            value,
            cap_length: default_cap_length(),
        }
    }

    #[must_use]
    pub fn with_cap_length(mut self, cap_length: f64) -> Self {
        self.cap_length = cap_length;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.value.is_finite() {
            return Err(ChartError::InvalidData(
                "error bar value must be finite".to_owned(),
            ));
        }
        if !self.cap_length.is_finite() || self.cap_length < 0.0 {
            return Err(ChartError::InvalidData(
                "error bar cap length must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_visible() -> bool {
    true
}

/// One data series: values in category order plus overlay configuration.
///
/// `None` values are gaps; non-finite values are skipped point-by-point by
/// whatever consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    pub name: String,
    pub kind: SeriesKind,
    pub values: Vec<Option<f64>>,
    /// Optional explicit x channel; used only when its length matches
    /// `values`, otherwise the zero-based index is the x coordinate.
    #[serde(default)]
    pub x_values: Option<Vec<f64>>,
    #[serde(default)]
    pub axis: AxisSlot,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub trendlines: Vec<TrendlineConfig>,
    #[serde(default)]
    pub error_bars: Option<ErrorBarConfig>,
}

impl SeriesData {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SeriesKind, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
            x_values: None,
            axis: AxisSlot::Primary,
            visible: true,
            trendlines: Vec::new(),
            error_bars: None,
        }
    }

    /// Convenience constructor wrapping every value in `Some`.
    #[must_use]
    pub fn from_values(name: impl Into<String>, kind: SeriesKind, values: &[f64]) -> Self {
        Self::new(name, kind, values.iter().copied().map(Some).collect())
    }

    #[must_use]
    pub fn with_x_values(mut self, x_values: Vec<f64>) -> Self {
        self.x_values = Some(x_values);
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisSlot) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_trendline(mut self, trendline: TrendlineConfig) -> Self {
        self.trendlines.push(trendline);
        self
    }

    #[must_use]
    pub fn with_error_bars(mut self, error_bars: ErrorBarConfig) -> Self {
        self.error_bars = Some(error_bars);
        self
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    /// The explicit x channel, if present and length-consistent.
    #[must_use]
    pub fn explicit_x(&self) -> Option<&[f64]> {
        self.x_values
            .as_deref()
            .filter(|xs| xs.len() == self.values.len())
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.name.is_empty() {
            return Err(ChartError::InvalidData(
                "series name must not be empty".to_owned(),
            ));
        }
        for trendline in &self.trendlines {
            trendline.validate()?;
        }
        if let Some(error_bars) = &self.error_bars {
            error_bars.validate()?;
        }
        Ok(())
    }
}

/// Immutable series/category view composed for one frame.
///
/// `version == 0` means the host does not track versions; change detection
/// then falls back to snapshot identity (the same `Arc` allocation).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub series: Vec<SeriesData>,
    pub categories: Vec<String>,
    #[serde(default)]
    pub version: u64,
}

impl DataSnapshot {
    #[must_use]
    pub fn new(series: Vec<SeriesData>, categories: Vec<String>) -> Self {
        Self {
            series,
            categories,
            version: 0,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Visible series with their original indexes.
    pub fn visible_series(&self) -> impl Iterator<Item = (usize, &SeriesData)> {
        self.series
            .iter()
            .enumerate()
            .filter(|(_, series)| series.visible)
    }

    /// Kind of the first visible series; drives chart-wide decisions such as
    /// the legend entry source.
    #[must_use]
    pub fn render_kind(&self) -> SeriesKind {
        self.visible_series()
            .next()
            .map_or(SeriesKind::default(), |(_, series)| series.kind)
    }

    /// Largest point count across visible series; the number of category
    /// slots the plot must cover.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.visible_series()
            .map(|(_, series)| series.point_count())
            .max()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for series in &self.series {
            series.validate()?;
        }
        Ok(())
    }
}

/// Externally supplied signal describing what changed since the previous
/// snapshot. The cache trusts it: `None` permits data-layer replay even when
/// the snapshot version moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DataDelta {
    #[default]
    None,
    /// Only the series at this index changed.
    Series(usize),
    /// Everything may have changed.
    All,
}

impl DataDelta {
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_x_requires_matching_length() {
        let series = SeriesData::from_values("s", SeriesKind::Scatter, &[1.0, 2.0, 3.0])
            .with_x_values(vec![0.0, 10.0, 20.0]);
        assert_eq!(series.explicit_x(), Some(&[0.0, 10.0, 20.0][..]));

        let mismatched = SeriesData::from_values("s", SeriesKind::Scatter, &[1.0, 2.0, 3.0])
            .with_x_values(vec![0.0, 10.0]);
        assert_eq!(mismatched.explicit_x(), None);
    }

    #[test]
    fn render_kind_skips_hidden_series() {
        let snapshot = DataSnapshot::new(
            vec![
                SeriesData::from_values("hidden", SeriesKind::Pie, &[1.0]).with_visible(false),
                SeriesData::from_values("shown", SeriesKind::Column, &[1.0]),
            ],
            vec![],
        );
        assert_eq!(snapshot.render_kind(), SeriesKind::Column);
    }

    #[test]
    fn overlay_support_is_limited_to_point_mapped_kinds() {
        assert!(SeriesKind::Scatter.supports_overlays());
        assert!(SeriesKind::Bar.supports_overlays());
        assert!(!SeriesKind::Pie.supports_overlays());
        assert!(!SeriesKind::StackedArea.supports_overlays());
    }

    #[test]
    fn moving_average_period_is_validated() {
        let config = TrendlineConfig::new(TrendlineKind::MovingAverage).with_period(0);
        assert!(config.validate().is_err());
        assert!(config.with_period(3).validate().is_ok());
    }

    #[test]
    fn snapshot_serializes_round_trip() {
        let snapshot = DataSnapshot::new(
            vec![SeriesData::from_values("a", SeriesKind::Line, &[1.0, 2.0])],
            vec!["Jan".to_owned(), "Feb".to_owned()],
        )
        .with_version(7);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: DataSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
