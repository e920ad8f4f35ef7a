use std::hash::{DefaultHasher, Hash, Hasher};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::axis::AxisKind;
use crate::core::palette::Palette;
use crate::error::{ChartError, ChartResult};
use crate::surface::{Color, LinearGradient};

/// Where one per-series visual property was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleSource {
    SeriesOverride,
    ThemeOverride,
    PaletteDefault,
}

/// First-match-wins order for per-series property resolution.
pub const STYLE_RESOLUTION_ORDER: [StyleSource; 3] = [
    StyleSource::SeriesOverride,
    StyleSource::ThemeOverride,
    StyleSource::PaletteDefault,
];

/// Axis mapping modes and line/grid/label appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    pub category_kind: AxisKind,
    pub primary_kind: AxisKind,
    pub secondary_kind: AxisKind,
    pub line_color: Color,
    pub line_width: f64,
    pub grid_visible: bool,
    pub grid_color: Color,
    pub tick_length: f64,
    pub label_size: f64,
    pub label_color: Color,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            category_kind: AxisKind::Categorical,
            primary_kind: AxisKind::Linear,
            secondary_kind: AxisKind::Linear,
            line_color: Color::rgb(0.35, 0.35, 0.35),
            line_width: 1.0,
            grid_visible: true,
            grid_color: Color::rgb(0.85, 0.85, 0.85),
            tick_length: 4.0,
            label_size: 11.0,
            label_color: Color::rgb(0.25, 0.25, 0.25),
        }
    }
}

/// Direction legend entries advance in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LegendFlow {
    #[default]
    Row,
    Column,
}

/// Edge of the chart the legend is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

/// Grouped legend: standard series and stacked series form separate blocks,
/// each with an optional header line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendGrouping {
    #[serde(default)]
    pub standard_header: Option<String>,
    #[serde(default)]
    pub stacked_header: Option<String>,
    pub group_gap: f64,
}

impl Default for LegendGrouping {
    fn default() -> Self {
        Self {
            standard_header: None,
            stacked_header: None,
            group_gap: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendStyle {
    pub visible: bool,
    pub flow: LegendFlow,
    /// Row flow wraps to a new line only when this is set.
    pub wrap: bool,
    pub position: LegendPosition,
    pub swatch_size: f64,
    pub font_size: f64,
    pub text_color: Color,
    pub item_spacing: f64,
    pub line_spacing: f64,
    #[serde(default)]
    pub grouping: Option<LegendGrouping>,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            visible: true,
            flow: LegendFlow::Row,
            wrap: true,
            position: LegendPosition::Right,
            swatch_size: 10.0,
            font_size: 11.0,
            text_color: Color::rgb(0.2, 0.2, 0.2),
            item_spacing: 10.0,
            line_spacing: 4.0,
            grouping: None,
        }
    }
}

/// Per-point value label appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueLabelStyle {
    pub visible: bool,
    pub font_size: f64,
    pub color: Color,
    /// Gap between a point and its label, in surface units.
    pub offset: f64,
}

impl Default for ValueLabelStyle {
    fn default() -> Self {
        Self {
            visible: false,
            font_size: 10.0,
            color: Color::rgb(0.2, 0.2, 0.2),
            offset: 4.0,
        }
    }
}

/// Per-series appearance overrides; `None` falls through the resolution
/// order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStyleOverride {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub line_width: Option<f64>,
    #[serde(default)]
    pub marker_radius: Option<f64>,
    #[serde(default)]
    pub gradient: Option<LinearGradient>,
}

/// Theme-level overrides sitting between series overrides and the palette.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default)]
    pub series_colors: Vec<Color>,
    #[serde(default)]
    pub axis_line_color: Option<Color>,
    #[serde(default)]
    pub text_color: Option<Color>,
}

/// Complete visual configuration of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub background: Color,
    pub plot_background: Color,
    /// Outer padding between the frame bounds and everything drawn.
    pub padding: f64,
    pub axis: AxisStyle,
    pub legend: LegendStyle,
    pub value_labels: ValueLabelStyle,
    pub series_line_width: f64,
    pub marker_radius: f64,
    /// Fraction of a category slot occupied by grouped bars or columns.
    pub bar_fill_ratio: f64,
    #[serde(default)]
    pub series_overrides: Vec<SeriesStyleOverride>,
    #[serde(default)]
    pub theme: Option<ThemeOverrides>,
    #[serde(default)]
    pub palette: Palette,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(1.0, 1.0, 1.0),
            plot_background: Color::rgba(1.0, 1.0, 1.0, 0.0),
            padding: 8.0,
            axis: AxisStyle::default(),
            legend: LegendStyle::default(),
            value_labels: ValueLabelStyle::default(),
            series_line_width: 2.0,
            marker_radius: 3.0,
            bar_fill_ratio: 0.7,
            series_overrides: Vec::new(),
            theme: None,
            palette: Palette::standard(),
        }
    }
}

impl ChartStyle {
    #[must_use]
    pub fn with_legend(mut self, legend: LegendStyle) -> Self {
        self.legend = legend;
        self
    }

    #[must_use]
    pub fn with_axis(mut self, axis: AxisStyle) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_value_labels(mut self, value_labels: ValueLabelStyle) -> Self {
        self.value_labels = value_labels;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_series_override(mut self, index: usize, series_override: SeriesStyleOverride) -> Self {
        if self.series_overrides.len() <= index {
            self.series_overrides
                .resize_with(index + 1, SeriesStyleOverride::default);
        }
        self.series_overrides[index] = series_override;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeOverrides) -> Self {
        self.theme = Some(theme);
        self
    }

    fn resolve_color_from(&self, source: StyleSource, index: usize) -> Option<Color> {
        match source {
            StyleSource::SeriesOverride => self
                .series_overrides
                .get(index)
                .and_then(|series_override| series_override.color),
            StyleSource::ThemeOverride => self
                .theme
                .as_ref()
                .and_then(|theme| theme.series_colors.get(index).copied()),
            StyleSource::PaletteDefault => Some(self.palette.color(index)),
        }
    }

    /// Resolved base color of the series at `index`.
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        STYLE_RESOLUTION_ORDER
            .iter()
            .find_map(|source| self.resolve_color_from(*source, index))
            .unwrap_or_else(|| self.palette.color(index))
    }

    /// Which source [`ChartStyle::series_color`] would resolve from.
    #[must_use]
    pub fn series_color_source(&self, index: usize) -> StyleSource {
        STYLE_RESOLUTION_ORDER
            .iter()
            .copied()
            .find(|source| self.resolve_color_from(*source, index).is_some())
            .unwrap_or(StyleSource::PaletteDefault)
    }

    #[must_use]
    pub fn series_stroke_width(&self, index: usize) -> f64 {
        self.series_overrides
            .get(index)
            .and_then(|series_override| series_override.line_width)
            .unwrap_or(self.series_line_width)
    }

    #[must_use]
    pub fn series_marker_radius(&self, index: usize) -> f64 {
        self.series_overrides
            .get(index)
            .and_then(|series_override| series_override.marker_radius)
            .unwrap_or(self.marker_radius)
    }

    #[must_use]
    pub fn series_gradient(&self, index: usize) -> Option<&LinearGradient> {
        self.series_overrides
            .get(index)
            .and_then(|series_override| series_override.gradient.as_ref())
    }

    #[must_use]
    pub fn axis_line_color(&self) -> Color {
        self.theme
            .as_ref()
            .and_then(|theme| theme.axis_line_color)
            .unwrap_or(self.axis.line_color)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.background.validate()?;
        self.plot_background.validate()?;
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ChartError::InvalidStyle(
                "padding must be finite and >= 0".to_owned(),
            ));
        }
        if !self.bar_fill_ratio.is_finite() || !(0.0..=1.0).contains(&self.bar_fill_ratio) {
            return Err(ChartError::InvalidStyle(
                "bar fill ratio must be in [0, 1]".to_owned(),
            ));
        }
        for size in [
            self.axis.label_size,
            self.legend.swatch_size,
            self.legend.font_size,
            self.value_labels.font_size,
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ChartError::InvalidStyle(
                    "font and swatch sizes must be finite and > 0".to_owned(),
                ));
            }
        }
        for series_override in &self.series_overrides {
            if let Some(color) = series_override.color {
                color.validate()?;
            }
            if let Some(gradient) = &series_override.gradient {
                gradient.validate()?;
            }
        }
        Ok(())
    }

    /// Order- and length-sensitive hash over every property that can change
    /// pixel output. Two styles with equal hashes draw identically.
    #[must_use]
    pub fn combined_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        hash_color(&mut hasher, self.background);
        hash_color(&mut hasher, self.plot_background);
        hash_f64(&mut hasher, self.padding);

        self.axis.category_kind.hash(&mut hasher);
        self.axis.primary_kind.hash(&mut hasher);
        self.axis.secondary_kind.hash(&mut hasher);
        hash_color(&mut hasher, self.axis.line_color);
        hash_f64(&mut hasher, self.axis.line_width);
        self.axis.grid_visible.hash(&mut hasher);
        hash_color(&mut hasher, self.axis.grid_color);
        hash_f64(&mut hasher, self.axis.tick_length);
        hash_f64(&mut hasher, self.axis.label_size);
        hash_color(&mut hasher, self.axis.label_color);

        self.legend.visible.hash(&mut hasher);
        self.legend.flow.hash(&mut hasher);
        self.legend.wrap.hash(&mut hasher);
        self.legend.position.hash(&mut hasher);
        hash_f64(&mut hasher, self.legend.swatch_size);
        hash_f64(&mut hasher, self.legend.font_size);
        hash_color(&mut hasher, self.legend.text_color);
        hash_f64(&mut hasher, self.legend.item_spacing);
        hash_f64(&mut hasher, self.legend.line_spacing);
        match &self.legend.grouping {
            None => hasher.write_u8(0),
            Some(grouping) => {
                hasher.write_u8(1);
                grouping.standard_header.hash(&mut hasher);
                grouping.stacked_header.hash(&mut hasher);
                hash_f64(&mut hasher, grouping.group_gap);
            }
        }

        self.value_labels.visible.hash(&mut hasher);
        hash_f64(&mut hasher, self.value_labels.font_size);
        hash_color(&mut hasher, self.value_labels.color);
        hash_f64(&mut hasher, self.value_labels.offset);

        hash_f64(&mut hasher, self.series_line_width);
        hash_f64(&mut hasher, self.marker_radius);
        hash_f64(&mut hasher, self.bar_fill_ratio);

        hasher.write_usize(self.series_overrides.len());
        for series_override in &self.series_overrides {
            hash_option_color(&mut hasher, series_override.color);
            hash_option_f64(&mut hasher, series_override.line_width);
            hash_option_f64(&mut hasher, series_override.marker_radius);
            match &series_override.gradient {
                None => hasher.write_u8(0),
                Some(gradient) => {
                    hasher.write_u8(1);
                    gradient.vertical.hash(&mut hasher);
                    hasher.write_usize(gradient.stops.len());
                    for stop in &gradient.stops {
                        hash_f64(&mut hasher, stop.offset);
                        hash_color(&mut hasher, stop.color);
                    }
                }
            }
        }

        match &self.theme {
            None => hasher.write_u8(0),
            Some(theme) => {
                hasher.write_u8(1);
                hasher.write_usize(theme.series_colors.len());
                for color in &theme.series_colors {
                    hash_color(&mut hasher, *color);
                }
                hash_option_color(&mut hasher, theme.axis_line_color);
                hash_option_color(&mut hasher, theme.text_color);
            }
        }

        hasher.write_usize(self.palette.len());
        for color in self.palette.colors() {
            hash_color(&mut hasher, *color);
        }

        hasher.finish()
    }
}

fn hash_f64(hasher: &mut impl Hasher, value: f64) {
    OrderedFloat(value).hash(hasher);
}

fn hash_option_f64(hasher: &mut impl Hasher, value: Option<f64>) {
    match value {
        None => hasher.write_u8(0),
        Some(value) => {
            hasher.write_u8(1);
            hash_f64(hasher, value);
        }
    }
}

fn hash_color(hasher: &mut impl Hasher, color: Color) {
    hash_f64(hasher, color.red);
    hash_f64(hasher, color.green);
    hash_f64(hasher, color.blue);
    hash_f64(hasher, color.alpha);
}

fn hash_option_color(hasher: &mut impl Hasher, color: Option<Color>) {
    match color {
        None => hasher.write_u8(0),
        Some(color) => {
            hasher.write_u8(1);
            hash_color(hasher, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_validates() {
        assert!(ChartStyle::default().validate().is_ok());
    }

    #[test]
    fn hash_is_stable_for_clones_and_sensitive_to_edits() {
        let style = ChartStyle::default();
        assert_eq!(style.combined_hash(), style.clone().combined_hash());

        let mut edited = style.clone();
        edited.series_line_width += 0.5;
        assert_ne!(style.combined_hash(), edited.combined_hash());

        let mut legend_edit = style.clone();
        legend_edit.legend.visible = false;
        assert_ne!(style.combined_hash(), legend_edit.combined_hash());
    }

    #[test]
    fn series_override_wins_over_theme_and_palette() {
        let override_color = Color::rgb(0.9, 0.1, 0.1);
        let theme_color = Color::rgb(0.1, 0.9, 0.1);
        let style = ChartStyle::default()
            .with_theme(ThemeOverrides {
                series_colors: vec![theme_color, theme_color],
                ..ThemeOverrides::default()
            })
            .with_series_override(
                0,
                SeriesStyleOverride {
                    color: Some(override_color),
                    ..SeriesStyleOverride::default()
                },
            );

        assert_eq!(style.series_color(0), override_color);
        assert_eq!(style.series_color_source(0), StyleSource::SeriesOverride);
        assert_eq!(style.series_color(1), theme_color);
        assert_eq!(style.series_color_source(1), StyleSource::ThemeOverride);
        assert_eq!(style.series_color(2), style.palette.color(2));
        assert_eq!(style.series_color_source(2), StyleSource::PaletteDefault);
    }

    #[test]
    fn override_resize_keeps_earlier_entries() {
        let style = ChartStyle::default()
            .with_series_override(
                2,
                SeriesStyleOverride {
                    line_width: Some(4.0),
                    ..SeriesStyleOverride::default()
                },
            );
        assert_eq!(style.series_stroke_width(2), 4.0);
        assert_eq!(style.series_stroke_width(0), style.series_line_width);
    }
}
