use std::hash::{DefaultHasher, Hash, Hasher};

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::{AxisKind, AxisRange, ChartStyle, DataSnapshot, Rect, SeriesKind};
use crate::legend::collect_entries;
use crate::surface::Color;

/// Frame geometry resolved by composition before any layer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    pub plot_rect: Rect,
    pub legend_rect: Option<Rect>,
    pub primary: AxisRange,
    pub secondary: Option<AxisRange>,
    /// Range of a numeric category axis; `None` when slots are categorical.
    pub category: Option<AxisRange>,
}

/// Comparable snapshot of everything that determines layer pixel content.
///
/// Extrema are compared with exact float equality on purpose: two states only
/// compare equal when they come from the same deterministic layout pass, and
/// an epsilon would let visibly different frames alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub render_kind: SeriesKind,
    pub bar_only: bool,
    pub numeric_category_axis: bool,
    pub has_secondary_range: bool,
    pub series_count: usize,
    pub category_count: usize,
    pub layout_hash: u64,
    pub primary_min: f64,
    pub primary_max: f64,
    pub secondary_min: f64,
    pub secondary_max: f64,
    pub category_min: f64,
    pub category_max: f64,
    pub categories_hash: u64,
    pub legend_hash: u64,
    pub plot_rect: Rect,
    pub legend_rect: Option<Rect>,
}

impl RenderState {
    #[must_use]
    pub fn capture(style: &ChartStyle, snapshot: &DataSnapshot, geometry: &FrameGeometry) -> Self {
        let mut visible = snapshot.visible_series().peekable();
        let any_visible = visible.peek().is_some();
        let bar_only = any_visible && visible.all(|(_, series)| series.kind.is_bar_oriented());

        let (secondary_min, secondary_max) = geometry
            .secondary
            .map_or((0.0, 0.0), |range| (range.min, range.max));
        let (category_min, category_max) = geometry
            .category
            .map_or((0.0, 0.0), |range| (range.min, range.max));

        Self {
            render_kind: snapshot.render_kind(),
            bar_only,
            numeric_category_axis: style.axis.category_kind != AxisKind::Categorical,
            has_secondary_range: geometry.secondary.is_some(),
            series_count: snapshot.series_count(),
            category_count: snapshot.category_count(),
            layout_hash: layout_hash(snapshot),
            primary_min: geometry.primary.min,
            primary_max: geometry.primary.max,
            secondary_min,
            secondary_max,
            category_min,
            category_max,
            categories_hash: categories_hash(snapshot),
            legend_hash: legend_hash(style, snapshot),
            plot_rect: geometry.plot_rect,
            legend_rect: geometry.legend_rect,
        }
    }

    /// True iff no field outside the legend scope differs.
    #[must_use]
    pub fn matches_base(&self, other: &Self) -> bool {
        self.render_kind == other.render_kind
            && self.bar_only == other.bar_only
            && self.numeric_category_axis == other.numeric_category_axis
            && self.has_secondary_range == other.has_secondary_range
            && self.series_count == other.series_count
            && self.category_count == other.category_count
            && self.layout_hash == other.layout_hash
            && self.primary_min == other.primary_min
            && self.primary_max == other.primary_max
            && self.secondary_min == other.secondary_min
            && self.secondary_max == other.secondary_max
            && self.category_min == other.category_min
            && self.category_max == other.category_max
            && self.categories_hash == other.categories_hash
            && self.plot_rect == other.plot_rect
    }

    /// Legend scope only: render kind, legend content hash, and the legend
    /// rectangle (including its presence).
    #[must_use]
    pub fn matches_legend(&self, other: &Self) -> bool {
        self.render_kind == other.render_kind
            && self.legend_hash == other.legend_hash
            && self.legend_rect == other.legend_rect
    }
}

/// Hash over the structural layout of every series: anything that moves
/// points without changing extrema or categories.
fn layout_hash(snapshot: &DataSnapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_usize(snapshot.series.len());
    for series in &snapshot.series {
        series.kind.hash(&mut hasher);
        series.axis.hash(&mut hasher);
        series.visible.hash(&mut hasher);
        hasher.write_usize(series.values.len());
        match &series.x_values {
            None => hasher.write_u8(0),
            Some(xs) => {
                hasher.write_u8(1);
                hasher.write_usize(xs.len());
            }
        }
        hasher.write_usize(series.trendlines.len());
        for trendline in &series.trendlines {
            trendline.kind.hash(&mut hasher);
            hasher.write_u32(trendline.polynomial_order);
            hasher.write_usize(trendline.period);
        }
        match &series.error_bars {
            None => hasher.write_u8(0),
            Some(error_bars) => {
                hasher.write_u8(1);
                error_bars.kind.hash(&mut hasher);
                hash_f64(&mut hasher, error_bars.value);
                hash_f64(&mut hasher, error_bars.cap_length);
            }
        }
    }
    hasher.finish()
}

/// Order- and length-sensitive hash over category labels.
fn categories_hash(snapshot: &DataSnapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write_usize(snapshot.categories.len());
    for category in &snapshot.categories {
        category.hash(&mut hasher);
    }
    hasher.finish()
}

/// Hash over everything the legend layer draws: style plus resolved entries.
fn legend_hash(style: &ChartStyle, snapshot: &DataSnapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    let legend = &style.legend;
    legend.visible.hash(&mut hasher);
    legend.flow.hash(&mut hasher);
    legend.wrap.hash(&mut hasher);
    legend.position.hash(&mut hasher);
    hash_f64(&mut hasher, legend.swatch_size);
    hash_f64(&mut hasher, legend.font_size);
    hash_color(&mut hasher, legend.text_color);
    hash_f64(&mut hasher, legend.item_spacing);
    hash_f64(&mut hasher, legend.line_spacing);
    match &legend.grouping {
        None => hasher.write_u8(0),
        Some(grouping) => {
            hasher.write_u8(1);
            grouping.standard_header.hash(&mut hasher);
            grouping.stacked_header.hash(&mut hasher);
            hash_f64(&mut hasher, grouping.group_gap);
        }
    }

    let entries = collect_entries(snapshot, style);
    hasher.write_usize(entries.len());
    for entry in &entries {
        entry.name.hash(&mut hasher);
        hash_color(&mut hasher, entry.color);
    }
    hasher.finish()
}

fn hash_f64(hasher: &mut impl Hasher, value: f64) {
    OrderedFloat(value).hash(hasher);
}

fn hash_color(hasher: &mut impl Hasher, color: Color) {
    hash_f64(hasher, color.red);
    hash_f64(hasher, color.green);
    hash_f64(hasher, color.blue);
    hash_f64(hasher, color.alpha);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AxisSlot, SeriesData};

    fn snapshot() -> DataSnapshot {
        DataSnapshot::new(
            vec![
                SeriesData::from_values("a", SeriesKind::Line, &[1.0, 2.0, 3.0]),
                SeriesData::from_values("b", SeriesKind::Line, &[2.0, 1.0, 4.0]),
            ],
            vec!["x".to_owned(), "y".to_owned(), "z".to_owned()],
        )
    }

    fn geometry() -> FrameGeometry {
        FrameGeometry {
            plot_rect: Rect::new(10.0, 10.0, 300.0, 200.0),
            legend_rect: Some(Rect::new(320.0, 10.0, 80.0, 60.0)),
            primary: AxisRange::new(0.0, 4.0).unwrap(),
            secondary: None,
            category: None,
        }
    }

    #[test]
    fn identical_captures_match() {
        let style = ChartStyle::default();
        let snapshot = snapshot();
        let first = RenderState::capture(&style, &snapshot, &geometry());
        let second = RenderState::capture(&style, &snapshot, &geometry());
        assert!(first.matches_base(&second));
        assert!(first.matches_legend(&second));
    }

    #[test]
    fn extrema_shift_breaks_base_match() {
        let style = ChartStyle::default();
        let snapshot = snapshot();
        let first = RenderState::capture(&style, &snapshot, &geometry());

        let mut moved = geometry();
        moved.primary = AxisRange::new(0.0, 5.0).unwrap();
        let second = RenderState::capture(&style, &snapshot, &moved);
        assert!(!first.matches_base(&second));
    }

    #[test]
    fn legend_rect_is_outside_the_base_scope() {
        let style = ChartStyle::default();
        let snapshot = snapshot();
        let first = RenderState::capture(&style, &snapshot, &geometry());

        let mut moved = geometry();
        moved.legend_rect = None;
        let second = RenderState::capture(&style, &snapshot, &moved);
        assert!(first.matches_base(&second));
        assert!(!first.matches_legend(&second));
    }

    #[test]
    fn hidden_series_changes_layout_hash() {
        let style = ChartStyle::default();
        let shown = snapshot();
        let mut hidden = snapshot();
        hidden.series[1].visible = false;

        let first = RenderState::capture(&style, &shown, &geometry());
        let second = RenderState::capture(&style, &hidden, &geometry());
        assert!(!first.matches_base(&second));
    }

    #[test]
    fn renaming_a_series_only_touches_the_legend_scope() {
        let style = ChartStyle::default();
        let original = snapshot();
        let mut renamed = snapshot();
        renamed.series[0].name = "renamed".to_owned();

        let first = RenderState::capture(&style, &original, &geometry());
        let second = RenderState::capture(&style, &renamed, &geometry());
        assert!(first.matches_base(&second));
        assert!(!first.matches_legend(&second));
    }

    #[test]
    fn secondary_presence_participates_even_with_equal_values() {
        let style = ChartStyle::default();
        let snapshot = snapshot();
        let without = RenderState::capture(&style, &snapshot, &geometry());

        let mut with = geometry();
        // same stored min/max as the absent normalization would produce
        with.secondary = Some(AxisRange::new(-1.0, 1.0).unwrap());
        let mut state = RenderState::capture(&style, &snapshot, &with);
        state.secondary_min = 0.0;
        state.secondary_max = 0.0;
        assert!(!without.matches_base(&state));
    }

    #[test]
    fn bar_only_requires_every_visible_series() {
        let style = ChartStyle::default();
        let mut mixed = snapshot();
        mixed.series[0].kind = SeriesKind::Bar;
        let state = RenderState::capture(&style, &mixed, &geometry());
        assert!(!state.bar_only);

        mixed.series[1].kind = SeriesKind::StackedBar;
        let state = RenderState::capture(&style, &mixed, &geometry());
        assert!(state.bar_only);

        let mut lone = mixed.clone();
        lone.series[1].visible = false;
        lone.series[1].axis = AxisSlot::Secondary;
        let state = RenderState::capture(&style, &lone, &geometry());
        assert!(state.bar_only);
    }
}
