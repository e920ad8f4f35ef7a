//! Frame composition over the layered scene cache.
//!
//! Each frame interrogates the cache layer by layer, rebuilds only what the
//! fingerprints or the reported delta disqualify, and composites by
//! replaying recordings. The fast path replays a fully warm cache without
//! touching any builder.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::{FrameGeometry, RenderState, SceneCache, SegmentKey, SegmentKind};
use crate::core::{
    AxisKind, AxisRange, AxisSlot, ChartStyle, DataDelta, DataSnapshot, LegendPosition, PlotMapper,
    Rect, SeriesData, SeriesKind,
};
use crate::error::ChartResult;
use crate::legend;
use crate::overlay::SamplePoint;
use crate::pool::VecPool;
use crate::surface::{Surface, TextMeasurer, record_scene};

use super::axes_scenes::{record_axes_scene, record_axis_text_scene};
use super::series_scenes::{
    ColumnLane, StackContext, is_clustered_column_family, record_error_bar_scene,
    record_monolithic_data_scene, record_series_scene, record_trendline_scene,
};
use super::ticks::AxisTicks;
use super::value_labels::record_value_label_segment;

const LEGEND_PLOT_GAP: f64 = 8.0;
/// Share of the frame a legend may claim on its edge.
const LEGEND_MAX_SHARE: f64 = 1.0 / 3.0;
const VALUE_LABEL_MARGIN_FACTOR: f64 = 3.0;
const CATEGORY_LABEL_MARGIN_FACTOR: f64 = 2.0;
const RANGE_PAD_RATIO: f64 = 0.05;

/// One frame's inputs. Tick selection and formatting stay with the host;
/// the composer only places what it is given.
#[derive(Debug)]
pub struct FrameRequest<'a> {
    pub bounds: Rect,
    pub snapshot: &'a Arc<DataSnapshot>,
    pub style: &'a ChartStyle,
    pub delta: DataDelta,
    pub ticks: &'a AxisTicks,
}

/// What one `compose` call did, for tests and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// The warm fast path replayed every layer without rebuilding anything.
    pub replayed_from_cache: bool,
    pub axes_rebuilt: bool,
    pub axis_text_rebuilt: bool,
    pub legend_rebuilt: bool,
    pub data_segments_rebuilt: usize,
    pub label_segments_rebuilt: usize,
}

/// Owns the scene cache and the scratch pools one chart reuses across
/// frames.
#[derive(Debug, Default)]
pub struct ChartComposer {
    cache: SceneCache,
    fit_samples: VecPool<SamplePoint>,
}

impl ChartComposer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: SceneCache::new(),
            fit_samples: VecPool::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &SceneCache {
        &self.cache
    }

    /// Drops every cached layer; the next frame rebuilds from scratch.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Composes one frame onto `surface`, reusing cached layers where the
    /// fingerprints allow and rebuilding the rest.
    pub fn compose<S: Surface + TextMeasurer>(
        &mut self,
        surface: &mut S,
        request: &FrameRequest<'_>,
    ) -> ChartResult<FrameStats> {
        request.bounds.validate()?;
        request.style.validate()?;
        let snapshot = request.snapshot;
        let style = request.style;
        let style_hash = style.combined_hash();
        let order = segment_order(snapshot);
        let mut stats = FrameStats::default();

        // warm path: with no delta pending, matching bounds, style and
        // snapshot imply identical geometry, so replay is exact
        if request.delta.is_none()
            && self
                .cache
                .try_draw(surface, request.bounds, snapshot, style_hash, Some(&order))
        {
            trace!("frame replayed fully from cache");
            stats.replayed_from_cache = true;
            return Ok(stats);
        }

        let geometry = resolve_geometry(request.bounds, snapshot, style, &*surface);
        let state = RenderState::capture(style, snapshot, &geometry);
        if !self.cache.is_compatible(request.bounds, style_hash, &state) {
            self.cache.invalidate();
        }

        let bar_oriented = bar_orientation(snapshot);
        let mapper = build_mapper(&geometry, snapshot, style, bar_oriented)?;
        let draw_plot_axes = state.render_kind.uses_plot_axes();

        if !self.cache.has_axes(request.bounds, style_hash, &state) {
            let scene = record_axes_scene(style, &mapper, request.ticks, draw_plot_axes);
            self.cache
                .store_axes(scene, request.bounds, style_hash, &state);
            stats.axes_rebuilt = true;
        }

        if !self
            .cache
            .has_data(request.bounds, style_hash, &state, snapshot, request.delta)
        {
            self.rebuild_data_layers(
                &*surface,
                request,
                &state,
                &geometry,
                &mapper,
                style_hash,
                draw_plot_axes,
                &mut stats,
            );
        }

        if !self.cache.has_axis_text(request.bounds, style_hash, &state) {
            let scene = record_axis_text_scene(style, &mapper, request.ticks, draw_plot_axes);
            self.cache
                .store_axis_text(scene, request.bounds, style_hash, &state);
            stats.axis_text_rebuilt = true;
        }

        if !self.cache.has_legend(request.bounds, style_hash, &state) {
            if let Some(rect) = geometry.legend_rect {
                let measurer: &dyn TextMeasurer = &*surface;
                let scene = record_scene(|recorder| {
                    legend::draw(recorder, measurer, rect, snapshot, style);
                });
                self.cache
                    .store_legend(scene, request.bounds, style_hash, &state);
                stats.legend_rebuilt = true;
            }
        }

        if !self
            .cache
            .try_draw(surface, request.bounds, snapshot, style_hash, Some(&order))
        {
            debug!("composite replay found nothing to draw");
        }
        Ok(stats)
    }

    #[allow(clippy::too_many_arguments)]
    fn rebuild_data_layers(
        &mut self,
        measurer: &dyn TextMeasurer,
        request: &FrameRequest<'_>,
        state: &RenderState,
        geometry: &FrameGeometry,
        mapper: &PlotMapper,
        style_hash: u64,
        draw_plot_axes: bool,
        stats: &mut FrameStats,
    ) {
        let snapshot = request.snapshot;
        let style = request.style;

        if !draw_plot_axes {
            let scene = record_monolithic_data_scene(snapshot, style, geometry.plot_rect);
            self.cache
                .store_data(scene, request.bounds, style_hash, state, snapshot);
            stats.data_segments_rebuilt += 1;
            return;
        }

        if let DataDelta::Series(changed) = request.delta {
            if self.rebuild_single_series(
                measurer, request, state, mapper, style_hash, changed, stats,
            ) {
                return;
            }
        }

        self.cache.clear_data_segments();
        self.cache.clear_data_label_segments();
        let mut stack = StackContext::new(snapshot);
        let lanes = clustered_lane_count(snapshot);
        let mut clustered_seen = 0_usize;
        for (series_index, series) in snapshot.visible_series() {
            if !series.kind.uses_plot_axes() {
                trace!(series = series_index, kind = ?series.kind, "skipping whole-figure series in a plot-axes chart");
                continue;
            }
            let lane = if is_clustered_column_family(series.kind) {
                let lane = ColumnLane {
                    lane: clustered_seen,
                    lanes,
                };
                clustered_seen += 1;
                lane
            } else {
                ColumnLane::SOLO
            };
            self.store_series_segments(
                measurer,
                request,
                state,
                mapper,
                style_hash,
                series_index,
                series,
                lane,
                &mut stack,
                stats,
            );
        }
    }

    /// Rebuilds only the changed series' segments. Returns `false` when the
    /// change cannot be isolated, leaving the full rebuild to the caller.
    fn rebuild_single_series(
        &mut self,
        measurer: &dyn TextMeasurer,
        request: &FrameRequest<'_>,
        state: &RenderState,
        mapper: &PlotMapper,
        style_hash: u64,
        changed: usize,
        stats: &mut FrameStats,
    ) -> bool {
        let snapshot = request.snapshot;
        if self.cache.data_segment_count() == 0 {
            return false;
        }
        let Some(series) = snapshot.series.get(changed) else {
            return false;
        };
        if !series.visible || !series.kind.uses_plot_axes() {
            return false;
        }
        // stacked levels couple neighbouring segments; one series cannot
        // move alone
        if snapshot
            .visible_series()
            .any(|(_, series)| series.kind.is_stacked())
        {
            return false;
        }
        let key = SegmentKey::for_series(changed, series.kind, series.axis);
        if self.cache.try_get_data_segment(key).is_none() {
            return false;
        }

        trace!(series = changed, "targeted single-series rebuild");
        let lane = clustered_lane_of(snapshot, changed);
        let mut stack = StackContext::new(snapshot);
        self.store_series_segments(
            measurer,
            request,
            state,
            mapper,
            style_hash,
            changed,
            series,
            lane,
            &mut stack,
            stats,
        );
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn store_series_segments(
        &mut self,
        measurer: &dyn TextMeasurer,
        request: &FrameRequest<'_>,
        state: &RenderState,
        mapper: &PlotMapper,
        style_hash: u64,
        series_index: usize,
        series: &SeriesData,
        lane: ColumnLane,
        stack: &mut StackContext,
        stats: &mut FrameStats,
    ) {
        let snapshot = request.snapshot;
        let style = request.style;
        let key = SegmentKey::for_series(series_index, series.kind, series.axis);
        let scene = record_series_scene(series, series_index, style, mapper, lane, stack);
        self.cache
            .store_data_segment(key, scene, request.bounds, style_hash, state, snapshot);
        stats.data_segments_rebuilt += 1;

        let trend_key = SegmentKey::trendlines(series_index);
        let mut samples = self.fit_samples.acquire();
        match record_trendline_scene(series, series_index, style, mapper, &mut samples) {
            Some(scene) => {
                self.cache.store_data_segment(
                    trend_key,
                    scene,
                    request.bounds,
                    style_hash,
                    state,
                    snapshot,
                );
                stats.data_segments_rebuilt += 1;
            }
            // displace a stale recording when the overlay stopped being
            // drawable
            None => {
                if self.cache.try_get_data_segment(trend_key).is_some() {
                    self.cache.store_data_segment(
                        trend_key,
                        record_scene(|_| {}),
                        request.bounds,
                        style_hash,
                        state,
                        snapshot,
                    );
                }
            }
        }
        drop(samples);

        let error_key = SegmentKey::error_bars(series_index);
        match record_error_bar_scene(series, series_index, style, mapper) {
            Some(scene) => {
                self.cache.store_data_segment(
                    error_key,
                    scene,
                    request.bounds,
                    style_hash,
                    state,
                    snapshot,
                );
                stats.data_segments_rebuilt += 1;
            }
            None => {
                if self.cache.try_get_data_segment(error_key).is_some() {
                    self.cache.store_data_segment(
                        error_key,
                        record_scene(|_| {}),
                        request.bounds,
                        style_hash,
                        state,
                        snapshot,
                    );
                }
            }
        }

        if key.kind == SegmentKind::Series {
            match record_value_label_segment(series, style, mapper, measurer) {
                Some((scene, placements)) => {
                    self.cache.store_data_label_segment(
                        key,
                        scene,
                        placements,
                        request.bounds,
                        style_hash,
                        state,
                        snapshot,
                    );
                    stats.label_segments_rebuilt += 1;
                }
                None => {
                    if self.cache.try_get_data_label_segment(key).is_some() {
                        self.cache.store_data_label_segment(
                            key,
                            record_scene(|_| {}),
                            Vec::new(),
                            request.bounds,
                            style_hash,
                            state,
                            snapshot,
                        );
                    }
                }
            }
        }
    }
}

/// Charts where every visible series is bar oriented swap the axes.
fn bar_orientation(snapshot: &DataSnapshot) -> bool {
    let mut visible = snapshot.visible_series().peekable();
    visible.peek().is_some() && visible.all(|(_, series)| series.kind.is_bar_oriented())
}

fn clustered_lane_count(snapshot: &DataSnapshot) -> usize {
    snapshot
        .visible_series()
        .filter(|(_, series)| is_clustered_column_family(series.kind))
        .count()
        .max(1)
}

fn clustered_lane_of(snapshot: &DataSnapshot, series_index: usize) -> ColumnLane {
    let lanes = clustered_lane_count(snapshot);
    let lane = snapshot
        .visible_series()
        .filter(|(_, series)| is_clustered_column_family(series.kind))
        .position(|(index, _)| index == series_index);
    match lane {
        Some(lane) => ColumnLane { lane, lanes },
        None => ColumnLane::SOLO,
    }
}

/// Replay order for data and label segments: every main segment in series
/// order, then every overlay segment, so trend lines and error bars sit on
/// top of neighbouring series.
fn segment_order(snapshot: &DataSnapshot) -> Vec<SegmentKey> {
    let mut order: Vec<SegmentKey> = Vec::new();
    for (series_index, series) in snapshot.visible_series() {
        if !series.kind.uses_plot_axes() {
            continue;
        }
        order.push(SegmentKey::for_series(
            series_index,
            series.kind,
            series.axis,
        ));
    }
    for (series_index, series) in snapshot.visible_series() {
        if !series.kind.supports_overlays() {
            continue;
        }
        if !series.trendlines.is_empty() {
            order.push(SegmentKey::trendlines(series_index));
        }
        if series.error_bars.is_some() {
            order.push(SegmentKey::error_bars(series_index));
        }
    }
    order
}

fn build_mapper(
    geometry: &FrameGeometry,
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    bar_oriented: bool,
) -> ChartResult<PlotMapper> {
    let mut mapper = PlotMapper::new(geometry.plot_rect, geometry.primary, snapshot.slot_count())?
        .with_bar_orientation(bar_oriented)
        .with_primary_kind(style.axis.primary_kind)?
        .with_category_axis(style.axis.category_kind, geometry.category)?;
    if let Some(range) = geometry.secondary {
        mapper = mapper.with_secondary(style.axis.secondary_kind, range)?;
    }
    Ok(mapper)
}

/// Accumulates the value extrema one axis slot has to cover.
#[derive(Debug, Clone, Copy)]
struct RangeAccumulator {
    min: f64,
    max: f64,
    positive_min: f64,
    any: bool,
    wants_zero: bool,
}

impl RangeAccumulator {
    fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            positive_min: f64::INFINITY,
            any: false,
            wants_zero: false,
        }
    }

    fn observe(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if value > 0.0 {
            self.positive_min = self.positive_min.min(value);
        }
        self.any = true;
    }

    fn finish(self, kind: AxisKind) -> AxisRange {
        let fallback = AxisRange { min: 0.0, max: 1.0 };
        if !self.any {
            return match kind {
                AxisKind::Logarithmic => AxisRange { min: 1.0, max: 10.0 },
                AxisKind::Linear | AxisKind::Categorical => fallback,
            };
        }
        let mut min = self.min;
        let mut max = self.max;
        match kind {
            AxisKind::Logarithmic => {
                if min <= 0.0 {
                    min = if self.positive_min.is_finite() {
                        self.positive_min
                    } else {
                        0.1
                    };
                }
                if max <= min {
                    max = min * 10.0;
                }
                AxisRange::new(min, max).unwrap_or(AxisRange { min: 1.0, max: 10.0 })
            }
            AxisKind::Linear | AxisKind::Categorical => {
                if self.wants_zero {
                    min = min.min(0.0);
                    max = max.max(0.0);
                }
                let pad = if min == max {
                    if min == 0.0 { 1.0 } else { min.abs() * RANGE_PAD_RATIO }
                } else {
                    (max - min) * RANGE_PAD_RATIO
                };
                AxisRange::new(min - pad, max + pad).unwrap_or(fallback)
            }
        }
    }
}

/// Value ranges per axis slot. Stacked kinds contribute their per-slot level
/// sums, stacked-100 kinds their per-slot share sums, everything else its
/// raw values; waterfall contributes its running total.
fn resolve_value_ranges(snapshot: &DataSnapshot, style: &ChartStyle) -> (AxisRange, Option<AxisRange>) {
    let slots = snapshot.slot_count();
    let mut accumulators = [RangeAccumulator::new(), RangeAccumulator::new()];
    let mut stack = StackContext::new(snapshot);
    let mut secondary_used = false;

    for (_, series) in snapshot.visible_series() {
        if !series.kind.uses_plot_axes() {
            continue;
        }
        let axis = series.axis;
        let accumulator_index = match axis {
            AxisSlot::Primary => 0,
            AxisSlot::Secondary => {
                secondary_used = true;
                1
            }
        };
        let accumulator = &mut accumulators[accumulator_index];
        if series.kind.is_baseline_anchored() {
            accumulator.wants_zero = true;
        }

        if series.kind.is_stacked() {
            for (index, value) in series.values.iter().enumerate().take(slots) {
                let Some(value) = *value else {
                    continue;
                };
                if !value.is_finite() {
                    continue;
                }
                if let Some(level) = stack.stack_level(series.kind, axis, index, value) {
                    accumulator.observe(level);
                    accumulator.observe(0.0);
                }
            }
        } else if series.kind == SeriesKind::Waterfall {
            let mut running = 0.0_f64;
            accumulator.observe(0.0);
            for value in series.values.iter().flatten() {
                if value.is_finite() {
                    running += value;
                    accumulator.observe(running);
                }
            }
        } else {
            for value in series.values.iter().flatten() {
                accumulator.observe(*value);
            }
        }
    }

    let primary = accumulators[0].finish(style.axis.primary_kind);
    let secondary =
        secondary_used.then(|| accumulators[1].finish(style.axis.secondary_kind));
    (primary, secondary)
}

/// Range of a numeric category axis from the explicit x extents.
fn resolve_category_range(snapshot: &DataSnapshot, style: &ChartStyle) -> Option<AxisRange> {
    if style.axis.category_kind == AxisKind::Categorical {
        return None;
    }
    let mut accumulator = RangeAccumulator::new();
    for (_, series) in snapshot.visible_series() {
        if !series.kind.uses_plot_axes() {
            continue;
        }
        match series.explicit_x() {
            Some(xs) => {
                for x in xs {
                    accumulator.observe(*x);
                }
            }
            None => {
                accumulator.observe(0.0);
                accumulator.observe((series.point_count().saturating_sub(1)) as f64);
            }
        }
    }
    Some(accumulator.finish(style.axis.category_kind))
}

fn resolve_geometry(
    bounds: Rect,
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    measurer: &dyn TextMeasurer,
) -> FrameGeometry {
    let padded = bounds.inset(style.padding, style.padding);

    let mut frame = padded;
    let legend_rect = if style.legend.visible {
        let (avail_width, avail_height) = match style.legend.position {
            LegendPosition::Left | LegendPosition::Right => {
                (padded.width * LEGEND_MAX_SHARE, padded.height)
            }
            LegendPosition::Top | LegendPosition::Bottom => {
                (padded.width, padded.height * LEGEND_MAX_SHARE)
            }
        };
        let size = legend::measure(snapshot, style, avail_width, avail_height, measurer);
        if size.is_empty() {
            None
        } else {
            let rect = match style.legend.position {
                LegendPosition::Right => {
                    frame.width = (frame.width - size.width - LEGEND_PLOT_GAP).max(1.0);
                    Rect::new(padded.right() - size.width, padded.top, size.width, size.height)
                }
                LegendPosition::Left => {
                    frame.left += size.width + LEGEND_PLOT_GAP;
                    frame.width = (frame.width - size.width - LEGEND_PLOT_GAP).max(1.0);
                    Rect::new(padded.left, padded.top, size.width, size.height)
                }
                LegendPosition::Top => {
                    frame.top += size.height + LEGEND_PLOT_GAP;
                    frame.height = (frame.height - size.height - LEGEND_PLOT_GAP).max(1.0);
                    Rect::new(padded.left, padded.top, size.width, size.height)
                }
                LegendPosition::Bottom => {
                    frame.height = (frame.height - size.height - LEGEND_PLOT_GAP).max(1.0);
                    Rect::new(
                        padded.left,
                        padded.bottom() - size.height,
                        size.width,
                        size.height,
                    )
                }
            };
            Some(rect)
        }
    } else {
        None
    };

    let plot_rect = if snapshot.render_kind().uses_plot_axes() {
        let label_size = style.axis.label_size;
        let bar_oriented = bar_orientation(snapshot);
        let left = label_size * VALUE_LABEL_MARGIN_FACTOR;
        let bottom = label_size * CATEGORY_LABEL_MARGIN_FACTOR;
        let has_secondary = snapshot
            .visible_series()
            .any(|(_, series)| series.kind.uses_plot_axes() && series.axis == AxisSlot::Secondary);
        let right = if has_secondary && !bar_oriented {
            label_size * VALUE_LABEL_MARGIN_FACTOR
        } else {
            0.0
        };
        let top = if has_secondary && bar_oriented {
            label_size * CATEGORY_LABEL_MARGIN_FACTOR
        } else {
            0.0
        };
        Rect::new(
            frame.left + left,
            frame.top + top,
            (frame.width - left - right).max(1.0),
            (frame.height - top - bottom).max(1.0),
        )
    } else {
        Rect::new(frame.left, frame.top, frame.width.max(1.0), frame.height.max(1.0))
    };

    let (primary, secondary) = resolve_value_ranges(snapshot, style);
    let category = resolve_category_range(snapshot, style);
    FrameGeometry {
        plot_rect,
        legend_rect,
        primary,
        secondary,
        category,
    }
}
