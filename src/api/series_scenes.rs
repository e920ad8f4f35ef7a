//! Data-layer scene builders.
//!
//! Segmented kinds record one scene per visible series; whole-figure kinds
//! (pie, donut, radar, funnel) record a single monolithic scene. Stacked
//! families thread a [`StackContext`] through the series in index order so
//! every segment bakes in the levels of the series below it.

use std::f64::consts::TAU;

use tracing::warn;

use crate::core::{
    AxisSlot, ChartStyle, DataSnapshot, PlotMapper, Point, Rect, SeriesData, SeriesKind,
    TrendlineKind,
};
use crate::overlay::{
    CurveDomain, SamplePoint, collect_fit_samples, error_bar_strokes, error_bound, fit_trend_model,
    moving_average, moving_average_path, sample_trend_path, series_spread,
};
use crate::surface::{Paint, Path, PathBuilder, RecordedScene, Surface, record_scene, sample_arc};

const TREND_DASH: [f64; 2] = [6.0, 4.0];
const ERROR_BAR_STROKE_WIDTH: f64 = 1.0;
const AREA_FILL_ALPHA: f64 = 0.35;
const BUBBLE_FILL_ALPHA: f64 = 0.5;
const BUBBLE_RADIUS_SCALE: f64 = 4.0;
const PIE_START_ANGLE: f64 = -TAU / 4.0;
const PIE_RADIUS_RATIO: f64 = 0.9;
const DONUT_HOLE_RATIO: f64 = 0.55;
const RADAR_GRID_RINGS: usize = 4;

/// Running stack levels per category slot, one positive and one negative
/// accumulator per value axis, plus the per-slot absolute totals the
/// stacked-100 kinds normalize against.
#[derive(Debug)]
pub(super) struct StackContext {
    positive: [Vec<f64>; 2],
    negative: [Vec<f64>; 2],
    totals: [Vec<f64>; 2],
}

impl StackContext {
    pub(super) fn new(snapshot: &DataSnapshot) -> Self {
        let slots = snapshot.slot_count();
        let mut totals = [vec![0.0; slots], vec![0.0; slots]];
        for (_, series) in snapshot.visible_series() {
            if !series.kind.is_stacked_100() {
                continue;
            }
            let axis = Self::axis_index(series.axis);
            for (index, value) in series.values.iter().enumerate() {
                let Some(value) = *value else {
                    continue;
                };
                if value.is_finite() {
                    totals[axis][index] += value.abs();
                }
            }
        }
        Self {
            positive: [vec![0.0; slots], vec![0.0; slots]],
            negative: [vec![0.0; slots], vec![0.0; slots]],
            totals,
        }
    }

    fn axis_index(slot: AxisSlot) -> usize {
        match slot {
            AxisSlot::Primary => 0,
            AxisSlot::Secondary => 1,
        }
    }

    /// Data-unit contribution of one value: the value itself, or its share
    /// of the slot total (as a percentage) for stacked-100 kinds. `None`
    /// when a stacked-100 slot has no total to divide by.
    fn contribution(
        &self,
        kind: SeriesKind,
        axis: AxisSlot,
        slot_index: usize,
        value: f64,
    ) -> Option<f64> {
        if !kind.is_stacked_100() {
            return Some(value);
        }
        let total = self.totals[Self::axis_index(axis)].get(slot_index).copied()?;
        (total > 0.0).then(|| value / total * 100.0)
    }

    /// Folds one value into the running stack and returns the resulting
    /// level in data units. Range resolution replays the stacking math with
    /// this to find the extrema the axes must cover.
    pub(super) fn stack_level(
        &mut self,
        kind: SeriesKind,
        axis: AxisSlot,
        slot_index: usize,
        value: f64,
    ) -> Option<f64> {
        let contribution = self.contribution(kind, axis, slot_index, value)?;
        self.advance(axis, slot_index, contribution)
            .map(|(_, level)| level)
    }

    /// Advances the sign-matching accumulator and returns the (base, level)
    /// pair in data units.
    fn advance(&mut self, axis: AxisSlot, slot_index: usize, contribution: f64) -> Option<(f64, f64)> {
        let stack = if contribution < 0.0 {
            &mut self.negative
        } else {
            &mut self.positive
        };
        let level = stack[Self::axis_index(axis)].get_mut(slot_index)?;
        let base = *level;
        *level += contribution;
        Some((base, *level))
    }
}

/// Lane assignment for side-by-side column family rendering. Lane order
/// follows series index order, so it is stable across compatible frames.
#[derive(Debug, Clone, Copy)]
pub(super) struct ColumnLane {
    pub lane: usize,
    pub lanes: usize,
}

impl ColumnLane {
    pub(super) const SOLO: Self = Self { lane: 0, lanes: 1 };
}

/// Kinds that share a category slot side by side instead of overdrawing.
pub(super) fn is_clustered_column_family(kind: SeriesKind) -> bool {
    matches!(
        kind,
        SeriesKind::Column | SeriesKind::Bar | SeriesKind::Histogram | SeriesKind::BoxWhisker
    )
}

fn series_point(
    mapper: &PlotMapper,
    xs: Option<&[f64]>,
    index: usize,
    value: f64,
    slot: AxisSlot,
) -> Option<Point> {
    match xs {
        Some(xs) => mapper.map_xy(xs[index], value, slot),
        None => mapper.map_category_value(index, value, slot),
    }
}

/// Scalar center of a slot along the category axis.
fn across_position(mapper: &PlotMapper, xs: Option<&[f64]>, index: usize) -> Option<f64> {
    match xs {
        Some(xs) => mapper.x_position(xs[index]),
        None => mapper.category_position(index),
    }
}

/// Point on a value level at a given category-axis center.
fn level_point(mapper: &PlotMapper, across: f64, value_position: f64) -> Point {
    if mapper.is_bar_oriented() {
        Point::new(value_position, across)
    } else {
        Point::new(across, value_position)
    }
}

/// Rectangle spanning two value positions, centered on `across` with the
/// given breadth along the category axis.
fn value_span_rect(
    mapper: &PlotMapper,
    across: f64,
    breadth: f64,
    from_position: f64,
    to_position: f64,
) -> Rect {
    let across_start = across - breadth / 2.0;
    let near = from_position.min(to_position);
    let span = (to_position - from_position).abs();
    if mapper.is_bar_oriented() {
        Rect::new(near, across_start, span, breadth)
    } else {
        Rect::new(across_start, near, breadth, span)
    }
}

fn solid_fill_paint(style: &ChartStyle, series_index: usize) -> Paint {
    let paint = Paint::fill(style.series_color(series_index));
    match style.series_gradient(series_index) {
        Some(gradient) => paint.with_gradient(gradient.clone()),
        None => paint,
    }
}

fn area_fill_paint(style: &ChartStyle, series_index: usize) -> Paint {
    let paint = Paint::fill(style.series_color(series_index).with_alpha(AREA_FILL_ALPHA));
    match style.series_gradient(series_index) {
        Some(gradient) => paint.with_gradient(gradient.clone()),
        None => paint,
    }
}

fn record_line_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) {
    let xs = series.explicit_x();
    let mut builder = PathBuilder::new();
    for (index, value) in series.values.iter().enumerate() {
        let point = value.and_then(|value| series_point(mapper, xs, index, value, series.axis));
        builder.push_or_gap(point);
    }
    let path = builder.build();
    if !path.is_empty() {
        let paint = Paint::stroke(
            style.series_color(series_index),
            style.series_stroke_width(series_index),
        );
        recorder.draw_path(&path, &paint);
    }
}

fn flush_area_run(
    recorder: &mut dyn Surface,
    run: &mut Vec<Point>,
    baseline: f64,
    bar_oriented: bool,
    fill: &Paint,
    stroke: &Paint,
) {
    if run.len() >= 2 {
        let first = run[0];
        let last = run[run.len() - 1];
        let mut builder = PathBuilder::new();
        for point in run.iter().copied() {
            builder.push(point);
        }
        if bar_oriented {
            builder.push(Point::new(baseline, last.y));
            builder.push(Point::new(baseline, first.y));
        } else {
            builder.push(Point::new(last.x, baseline));
            builder.push(Point::new(first.x, baseline));
        }
        builder.close();
        recorder.draw_path(&builder.build(), fill);

        let mut edge = PathBuilder::new();
        for point in run.iter().copied() {
            edge.push(point);
        }
        recorder.draw_path(&edge.build(), stroke);
    }
    run.clear();
}

fn record_area_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) {
    let slot = series.axis;
    let Some(baseline) = mapper.baseline_position(slot) else {
        return;
    };
    let xs = series.explicit_x();
    let fill = area_fill_paint(style, series_index);
    let stroke = Paint::stroke(
        style.series_color(series_index),
        style.series_stroke_width(series_index),
    );
    let mut run: Vec<Point> = Vec::new();
    for (index, value) in series.values.iter().enumerate() {
        match value.and_then(|value| series_point(mapper, xs, index, value, slot)) {
            Some(point) => run.push(point),
            None => {
                flush_area_run(recorder, &mut run, baseline, mapper.is_bar_oriented(), &fill, &stroke);
            }
        }
    }
    flush_area_run(recorder, &mut run, baseline, mapper.is_bar_oriented(), &fill, &stroke);
}

fn record_scatter_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) {
    let xs = series.explicit_x();
    let radius = style.series_marker_radius(series_index);
    let paint = Paint::fill(style.series_color(series_index));
    for (index, value) in series.values.iter().enumerate() {
        let Some(point) = value.and_then(|value| series_point(mapper, xs, index, value, series.axis))
        else {
            continue;
        };
        recorder.draw_circle(point, radius, &paint);
    }
}

fn record_bubble_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) {
    let max_abs = series
        .values
        .iter()
        .flatten()
        .filter(|value| value.is_finite())
        .fold(0.0_f64, |max, value| max.max(value.abs()));
    if max_abs <= 0.0 {
        return;
    }
    let xs = series.explicit_x();
    let base_radius = style.series_marker_radius(series_index);
    let paint = Paint::fill(style.series_color(series_index).with_alpha(BUBBLE_FILL_ALPHA));
    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        let Some(point) = series_point(mapper, xs, index, value, series.axis) else {
            continue;
        };
        let radius = base_radius * (value.abs() / max_abs).sqrt() * BUBBLE_RADIUS_SCALE;
        recorder.draw_circle(point, radius, &paint);
    }
}

fn record_column_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
    lane: ColumnLane,
) {
    let slot = series.axis;
    let Some(baseline) = mapper.baseline_position(slot) else {
        return;
    };
    let xs = series.explicit_x();
    // histograms render gapless
    let fill_ratio = if series.kind == SeriesKind::Histogram {
        1.0
    } else {
        style.bar_fill_ratio
    };
    let fill_extent = mapper.category_slot_extent() * fill_ratio;
    let lanes = lane.lanes.max(1);
    let lane_extent = fill_extent / lanes as f64;
    let paint = solid_fill_paint(style, series_index);

    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        let Some(center) = across_position(mapper, xs, index) else {
            continue;
        };
        let Some(position) = mapper.value_position(value, slot) else {
            continue;
        };
        let lane_center = center - fill_extent / 2.0 + (lane.lane as f64 + 0.5) * lane_extent;
        recorder.draw_rect(
            value_span_rect(mapper, lane_center, lane_extent, baseline, position),
            &paint,
        );
    }
}

fn record_waterfall_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) {
    let slot = series.axis;
    let xs = series.explicit_x();
    let breadth = mapper.category_slot_extent() * style.bar_fill_ratio;
    let paint = solid_fill_paint(style, series_index);
    let mut running = 0.0_f64;
    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        let start = running;
        running += value;
        let Some(center) = across_position(mapper, xs, index) else {
            continue;
        };
        let (Some(from), Some(to)) = (
            mapper.value_position(start, slot),
            mapper.value_position(running, slot),
        ) else {
            continue;
        };
        recorder.draw_rect(value_span_rect(mapper, center, breadth, from, to), &paint);
    }
}

fn record_pareto_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) {
    record_column_series(recorder, series, series_index, style, mapper, ColumnLane::SOLO);

    let total: f64 = series
        .values
        .iter()
        .flatten()
        .filter(|value| value.is_finite())
        .map(|value| value.abs())
        .sum();
    if total <= 0.0 {
        return;
    }

    // cumulative share runs over the full value extent, independent of the
    // value axis range
    let plot = mapper.plot();
    let xs = series.explicit_x();
    let mut cumulative = 0.0_f64;
    let mut builder = PathBuilder::new();
    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            builder.gap();
            continue;
        };
        if !value.is_finite() {
            builder.gap();
            continue;
        }
        cumulative += value.abs();
        let fraction = cumulative / total;
        let point = across_position(mapper, xs, index).map(|center| {
            if mapper.is_bar_oriented() {
                Point::new(plot.left + fraction * plot.width, center)
            } else {
                Point::new(center, plot.bottom() - fraction * plot.height)
            }
        });
        builder.push_or_gap(point);
    }
    let path = builder.build();
    if !path.is_empty() {
        let line_paint = Paint::stroke(
            style.palette.color(series_index + 1),
            style.series_stroke_width(series_index),
        );
        recorder.draw_path(&path, &line_paint);
    }
}

fn record_stacked_bar_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
    stack: &mut StackContext,
) {
    let slot = series.axis;
    let xs = series.explicit_x();
    let breadth = mapper.category_slot_extent() * style.bar_fill_ratio;
    let paint = solid_fill_paint(style, series_index);
    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        let Some(contribution) = stack.contribution(series.kind, slot, index, value) else {
            continue;
        };
        let Some((base, level)) = stack.advance(slot, index, contribution) else {
            continue;
        };
        let Some(center) = across_position(mapper, xs, index) else {
            continue;
        };
        let (Some(from), Some(to)) = (
            mapper.value_position(base, slot),
            mapper.value_position(level, slot),
        ) else {
            continue;
        };
        recorder.draw_rect(value_span_rect(mapper, center, breadth, from, to), &paint);
    }
}

fn flush_band(
    recorder: &mut dyn Surface,
    level_run: &mut Vec<Point>,
    base_run: &mut Vec<Point>,
    fill: &Paint,
    stroke: &Paint,
) {
    if level_run.len() >= 2 {
        let mut builder = PathBuilder::new();
        for point in level_run.iter().copied() {
            builder.push(point);
        }
        for point in base_run.iter().rev().copied() {
            builder.push(point);
        }
        builder.close();
        recorder.draw_path(&builder.build(), fill);

        let mut edge = PathBuilder::new();
        for point in level_run.iter().copied() {
            edge.push(point);
        }
        recorder.draw_path(&edge.build(), stroke);
    }
    level_run.clear();
    base_run.clear();
}

fn record_stacked_area_series(
    recorder: &mut dyn Surface,
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
    stack: &mut StackContext,
) {
    let slot = series.axis;
    let xs = series.explicit_x();
    let fill = solid_fill_paint(style, series_index);
    let stroke = Paint::stroke(
        style.series_color(series_index),
        style.series_stroke_width(series_index),
    );
    let mut level_run: Vec<Point> = Vec::new();
    let mut base_run: Vec<Point> = Vec::new();

    for (index, value) in series.values.iter().enumerate() {
        let band_points = value
            .filter(|value| value.is_finite())
            .and_then(|value| stack.contribution(series.kind, slot, index, value))
            .and_then(|contribution| stack.advance(slot, index, contribution))
            .and_then(|(base, level)| {
                let center = across_position(mapper, xs, index)?;
                let base_position = mapper.value_position(base, slot)?;
                let level_position = mapper.value_position(level, slot)?;
                Some((
                    level_point(mapper, center, base_position),
                    level_point(mapper, center, level_position),
                ))
            });
        match band_points {
            Some((base_point, level_pt)) => {
                base_run.push(base_point);
                level_run.push(level_pt);
            }
            None => flush_band(recorder, &mut level_run, &mut base_run, &fill, &stroke),
        }
    }
    flush_band(recorder, &mut level_run, &mut base_run, &fill, &stroke);
}

/// Records the data segment of one visible series. Whole-figure kinds are
/// routed through [`record_monolithic_data_scene`] instead and record
/// nothing here.
pub(super) fn record_series_scene(
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
    lane: ColumnLane,
    stack: &mut StackContext,
) -> RecordedScene {
    record_scene(|recorder| match series.kind {
        SeriesKind::Line => record_line_series(recorder, series, series_index, style, mapper),
        SeriesKind::Area => record_area_series(recorder, series, series_index, style, mapper),
        SeriesKind::Scatter => record_scatter_series(recorder, series, series_index, style, mapper),
        SeriesKind::Bubble => record_bubble_series(recorder, series, series_index, style, mapper),
        SeriesKind::Column
        | SeriesKind::Bar
        | SeriesKind::Histogram
        | SeriesKind::BoxWhisker => {
            record_column_series(recorder, series, series_index, style, mapper, lane);
        }
        SeriesKind::Pareto => record_pareto_series(recorder, series, series_index, style, mapper),
        SeriesKind::Waterfall => {
            record_waterfall_series(recorder, series, series_index, style, mapper);
        }
        SeriesKind::StackedColumn
        | SeriesKind::StackedBar
        | SeriesKind::Stacked100Column
        | SeriesKind::Stacked100Bar => {
            record_stacked_bar_series(recorder, series, series_index, style, mapper, stack);
        }
        SeriesKind::StackedArea | SeriesKind::Stacked100Area => {
            record_stacked_area_series(recorder, series, series_index, style, mapper, stack);
        }
        SeriesKind::Pie | SeriesKind::Donut | SeriesKind::Radar | SeriesKind::Funnel => {
            warn!(
                series = series_index,
                kind = ?series.kind,
                "whole-figure kind reached the segmented data path; nothing recorded"
            );
        }
    })
}

fn arc_steps(sweep: f64) -> usize {
    ((sweep.abs() / TAU * 64.0).ceil() as usize).max(2)
}

fn point_at(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

fn record_wedges(
    recorder: &mut dyn Surface,
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    plot: Rect,
    hole_ratio: f64,
) {
    let Some((_, series)) = snapshot.visible_series().next() else {
        return;
    };
    let slices: Vec<(usize, f64)> = series
        .values
        .iter()
        .enumerate()
        .filter_map(|(category, value)| {
            let value = (*value)?;
            (value.is_finite() && value > 0.0).then_some((category, value))
        })
        .collect();
    let total: f64 = slices.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        return;
    }

    let center = Point::new(plot.center_x(), plot.center_y());
    let radius = plot.width.min(plot.height) / 2.0 * PIE_RADIUS_RATIO;
    let inner = radius * hole_ratio;
    let mut angle = PIE_START_ANGLE;
    for (category, value) in slices {
        let sweep = value / total * TAU;
        let steps = arc_steps(sweep);
        let mut builder = PathBuilder::new();
        if inner > 0.0 {
            for point in sample_arc(center, radius, angle, sweep, steps) {
                builder.push(point);
            }
            for point in sample_arc(center, inner, angle + sweep, -sweep, steps) {
                builder.push(point);
            }
        } else {
            builder.push(center);
            for point in sample_arc(center, radius, angle, sweep, steps) {
                builder.push(point);
            }
        }
        builder.close();
        recorder.draw_path(&builder.build(), &Paint::fill(style.palette.color(category)));
        angle += sweep;
    }
}

fn record_radar(recorder: &mut dyn Surface, snapshot: &DataSnapshot, style: &ChartStyle, plot: Rect) {
    let spokes = snapshot.slot_count();
    if spokes < 3 {
        return;
    }
    let mut max_abs = 0.0_f64;
    for (_, series) in snapshot.visible_series() {
        for value in series.values.iter().flatten() {
            if value.is_finite() {
                max_abs = max_abs.max(value.abs());
            }
        }
    }
    if max_abs <= 0.0 {
        return;
    }

    let center = Point::new(plot.center_x(), plot.center_y());
    let radius = plot.width.min(plot.height) / 2.0 * PIE_RADIUS_RATIO;
    let spoke_angle = |slot: usize| PIE_START_ANGLE + slot as f64 / spokes as f64 * TAU;

    let grid = Paint::stroke(style.axis.grid_color, 1.0);
    for slot in 0..spokes {
        recorder.draw_line(center, point_at(center, radius, spoke_angle(slot)), &grid);
    }
    for ring in 1..=RADAR_GRID_RINGS {
        let ring_radius = radius * ring as f64 / RADAR_GRID_RINGS as f64;
        let mut builder = PathBuilder::new();
        for slot in 0..spokes {
            builder.push(point_at(center, ring_radius, spoke_angle(slot)));
        }
        builder.close();
        recorder.draw_path(&builder.build(), &grid);
    }

    for (series_index, series) in snapshot.visible_series() {
        if series.kind != SeriesKind::Radar {
            continue;
        }
        let mut builder = PathBuilder::new();
        for (slot, value) in series.values.iter().enumerate().take(spokes) {
            let point = value.and_then(|value| {
                if !value.is_finite() {
                    return None;
                }
                let fraction = (value / max_abs).clamp(0.0, 1.0);
                Some(point_at(center, radius * fraction, spoke_angle(slot)))
            });
            builder.push_or_gap(point);
        }
        builder.close();
        let path = builder.build();
        if path.is_empty() {
            continue;
        }
        let color = style.series_color(series_index);
        recorder.draw_path(&path, &Paint::fill(color.with_alpha(0.2)));
        recorder.draw_path(
            &path,
            &Paint::stroke(color, style.series_stroke_width(series_index)),
        );
    }
}

fn record_funnel(
    recorder: &mut dyn Surface,
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    plot: Rect,
) {
    let Some((_, series)) = snapshot.visible_series().next() else {
        return;
    };
    let stages: Vec<(usize, f64)> = series
        .values
        .iter()
        .enumerate()
        .filter_map(|(category, value)| {
            let value = (*value)?;
            (value.is_finite() && value > 0.0).then_some((category, value))
        })
        .collect();
    let max = stages.iter().fold(0.0_f64, |max, (_, value)| max.max(*value));
    if max <= 0.0 {
        return;
    }

    let stage_height = plot.height / stages.len() as f64;
    let center_x = plot.center_x();
    for (row, (category, value)) in stages.iter().enumerate() {
        let top_half = value / max * plot.width / 2.0;
        let next_value = stages.get(row + 1).map_or(*value, |(_, value)| *value);
        let bottom_half = next_value / max * plot.width / 2.0;
        let top = plot.top + row as f64 * stage_height;
        let bottom = top + stage_height;

        let mut builder = PathBuilder::new();
        builder.push(Point::new(center_x - top_half, top));
        builder.push(Point::new(center_x + top_half, top));
        builder.push(Point::new(center_x + bottom_half, bottom));
        builder.push(Point::new(center_x - bottom_half, bottom));
        builder.close();
        recorder.draw_path(
            &builder.build(),
            &Paint::fill(style.palette.color(*category)),
        );
    }
}

/// Records the single data scene for whole-figure render kinds.
pub(super) fn record_monolithic_data_scene(
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    plot: Rect,
) -> RecordedScene {
    record_scene(|recorder| match snapshot.render_kind() {
        SeriesKind::Pie => record_wedges(recorder, snapshot, style, plot, 0.0),
        SeriesKind::Donut => record_wedges(recorder, snapshot, style, plot, DONUT_HOLE_RATIO),
        SeriesKind::Radar => record_radar(recorder, snapshot, style, plot),
        SeriesKind::Funnel => record_funnel(recorder, snapshot, style, plot),
        other => warn!(kind = ?other, "monolithic data scene requested for a segmented kind"),
    })
}

/// Records every drawable trendline of one series into a single segment.
/// `None` when the series has no drawable trendline.
pub(super) fn record_trendline_scene(
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
    samples: &mut Vec<SamplePoint>,
) -> Option<RecordedScene> {
    if !series.kind.supports_overlays() || series.trendlines.is_empty() {
        return None;
    }
    let slot = series.axis;
    let value_kind = mapper.value_kind(slot)?;
    collect_fit_samples(series, mapper.category_kind(), value_kind, samples);

    let domain = match series.explicit_x() {
        Some(_) => CurveDomain::explicit_from_samples(samples)?,
        None => CurveDomain::Indexed {
            count: series.values.len(),
        },
    };

    let mut paths: Vec<Path> = Vec::new();
    for config in &series.trendlines {
        if config.validate().is_err() {
            warn!(series = series_index, kind = ?config.kind, "skipping invalid trendline config");
            continue;
        }
        let path = match config.kind {
            TrendlineKind::MovingAverage => {
                let means = moving_average(&series.values, config.period);
                moving_average_path(&means, config.period, series.explicit_x(), mapper, slot)
            }
            TrendlineKind::Linear
            | TrendlineKind::Exponential
            | TrendlineKind::Logarithmic
            | TrendlineKind::Power
            | TrendlineKind::Polynomial => match fit_trend_model(samples, config) {
                Some(model) => sample_trend_path(&model, domain, mapper, slot),
                None => continue,
            },
        };
        if !path.is_empty() {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return None;
    }

    let paint = Paint::stroke(
        style.series_color(series_index),
        style.series_stroke_width(series_index),
    )
    .with_dash(TREND_DASH.to_vec());
    Some(record_scene(|recorder| {
        for path in &paths {
            recorder.draw_path(path, &paint);
        }
    }))
}

/// Records the error bars of one series into a single segment. `None` when
/// the series has no error bar config or nothing is drawable.
pub(super) fn record_error_bar_scene(
    series: &SeriesData,
    series_index: usize,
    style: &ChartStyle,
    mapper: &PlotMapper,
) -> Option<RecordedScene> {
    let config = series.error_bars.as_ref()?;
    if !series.kind.supports_overlays() {
        return None;
    }
    if config.validate().is_err() {
        warn!(series = series_index, "skipping invalid error bar config");
        return None;
    }

    let slot = series.axis;
    let spread = series_spread(&series.values);
    let xs = series.explicit_x();
    let horizontal = mapper.is_bar_oriented();
    let mut bars = Vec::new();
    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        let Some(bound) = error_bound(value, config, spread) else {
            continue;
        };
        let Some(center) = across_position(mapper, xs, index) else {
            continue;
        };
        let (Some(low_position), Some(high_position)) = (
            mapper.value_position(bound.low, slot),
            mapper.value_position(bound.high, slot),
        ) else {
            continue;
        };
        bars.push(error_bar_strokes(
            level_point(mapper, center, low_position),
            level_point(mapper, center, high_position),
            horizontal,
            config.cap_length,
        ));
    }
    if bars.is_empty() {
        return None;
    }

    let paint = Paint::stroke(style.series_color(series_index), ERROR_BAR_STROKE_WIDTH);
    Some(record_scene(|recorder| {
        for bar in &bars {
            recorder.draw_line(bar.main.0, bar.main.1, &paint);
            for (from, to) in bar.caps {
                recorder.draw_line(from, to, &paint);
            }
        }
    }))
}
