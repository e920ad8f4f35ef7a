use std::sync::Arc;

use statchart_rs::cache::{FrameGeometry, RenderState, SceneCache};
use statchart_rs::core::{
    AxisRange, ChartStyle, DataDelta, DataSnapshot, Rect, SeriesData, SeriesKind,
};
use statchart_rs::surface::{Color, NullSurface, Paint, Surface, record_scene};
use statchart_rs::{SegmentKey, SegmentKind};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 640.0, 480.0);
const STYLE_HASH: u64 = 0xC0FFEE;

fn snapshot(version: u64) -> Arc<DataSnapshot> {
    DataSnapshot::new(
        vec![
            SeriesData::from_values("a", SeriesKind::Line, &[1.0, 2.0, 3.0]),
            SeriesData::from_values("b", SeriesKind::Line, &[3.0, 1.0, 2.0]),
        ],
        vec!["x".to_owned(), "y".to_owned(), "z".to_owned()],
    )
    .with_version(version)
    .into_shared()
}

fn state_for(snapshot: &DataSnapshot, legend_rect: Option<Rect>) -> RenderState {
    let geometry = FrameGeometry {
        plot_rect: Rect::new(40.0, 10.0, 500.0, 420.0),
        legend_rect,
        primary: AxisRange::new(0.0, 4.0).expect("range"),
        secondary: None,
        category: None,
    };
    RenderState::capture(&ChartStyle::default(), snapshot, &geometry)
}

fn marker_scene() -> statchart_rs::surface::RecordedScene {
    let paint = Paint::stroke(Color::rgb(0.1, 0.2, 0.3), 1.0);
    record_scene(|recorder| {
        recorder.draw_line(
            statchart_rs::core::Point::new(0.0, 0.0),
            statchart_rs::core::Point::new(1.0, 1.0),
            &paint,
        );
    })
}

#[test]
fn store_then_matching_predicates_hold() {
    let snapshot = snapshot(1);
    let legend_rect = Some(Rect::new(560.0, 10.0, 70.0, 40.0));
    let state = state_for(&snapshot, legend_rect);
    let mut cache = SceneCache::new();

    cache.store_axes(marker_scene(), BOUNDS, STYLE_HASH, &state);
    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);
    cache.store_axis_text(marker_scene(), BOUNDS, STYLE_HASH, &state);
    cache.store_legend(marker_scene(), BOUNDS, STYLE_HASH, &state);

    assert!(cache.is_compatible(BOUNDS, STYLE_HASH, &state));
    assert!(cache.has_axes(BOUNDS, STYLE_HASH, &state));
    assert!(cache.has_data(BOUNDS, STYLE_HASH, &state, &snapshot, DataDelta::None));
    assert!(cache.has_axis_text(BOUNDS, STYLE_HASH, &state));
    assert!(cache.has_legend(BOUNDS, STYLE_HASH, &state));
}

#[test]
fn any_single_ingredient_change_breaks_the_match() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let mut cache = SceneCache::new();
    cache.store_axes(marker_scene(), BOUNDS, STYLE_HASH, &state);

    let moved_bounds = Rect::new(0.0, 0.0, 641.0, 480.0);
    assert!(!cache.is_compatible(moved_bounds, STYLE_HASH, &state));
    assert!(!cache.is_compatible(BOUNDS, STYLE_HASH + 1, &state));

    let mut more_series = state.clone();
    more_series.series_count += 1;
    assert!(!cache.is_compatible(BOUNDS, STYLE_HASH, &more_series));

    let mut shifted = state.clone();
    shifted.primary_max += 1.0;
    assert!(!cache.has_axes(BOUNDS, STYLE_HASH, &shifted));

    let mut shrunk = state.clone();
    shrunk.plot_rect.width -= 0.5;
    assert!(!cache.has_axes(BOUNDS, STYLE_HASH, &shrunk));
}

#[test]
fn data_reuse_requires_a_clean_delta() {
    let snapshot = snapshot(3);
    let state = state_for(&snapshot, None);
    let mut cache = SceneCache::new();
    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);

    assert!(cache.has_data(BOUNDS, STYLE_HASH, &state, &snapshot, DataDelta::None));
    assert!(!cache.has_data(BOUNDS, STYLE_HASH, &state, &snapshot, DataDelta::Series(0)));
    assert!(!cache.has_data(BOUNDS, STYLE_HASH, &state, &snapshot, DataDelta::All));

    // a moved-on version fails even with a clean delta
    let newer = snapshot.as_ref().clone().with_version(4).into_shared();
    assert!(!cache.has_data(BOUNDS, STYLE_HASH, &state, &newer, DataDelta::None));
}

#[test]
fn unversioned_snapshots_compare_by_identity() {
    let original = snapshot(0);
    let state = state_for(&original, None);
    let mut cache = SceneCache::new();
    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &original);

    assert!(cache.matches_snapshot(&original));

    // an equal-by-value snapshot in a different allocation is a different frame
    let twin = original.as_ref().clone().into_shared();
    assert_eq!(*twin, *original);
    assert!(!cache.matches_snapshot(&twin));

    let mut surface = NullSurface::new();
    assert!(cache.try_draw(&mut surface, BOUNDS, &original, STYLE_HASH, None));
    assert!(!cache.try_draw(&mut surface, BOUNDS, &twin, STYLE_HASH, None));
}

#[test]
fn segment_round_trip_releases_the_displaced_recording_once() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let key = SegmentKey::new(SegmentKind::Series, 0);
    let mut cache = SceneCache::new();

    let first = marker_scene();
    let first_id = first.id();
    cache.store_data_segment(key, first, BOUNDS, STYLE_HASH, &state, &snapshot);
    assert_eq!(cache.released_scene_count(), 0);
    assert_eq!(cache.try_get_data_segment(key).expect("segment").id(), first_id);

    let second = marker_scene();
    let second_id = second.id();
    cache.store_data_segment(key, second, BOUNDS, STYLE_HASH, &state, &snapshot);
    assert_eq!(cache.released_scene_count(), 1);
    assert_eq!(cache.data_segment_count(), 1);
    assert_eq!(cache.try_get_data_segment(key).expect("segment").id(), second_id);

    // absence is an ordinary lookup result
    assert!(cache.try_get_data_segment(SegmentKey::trendlines(5)).is_none());
}

#[test]
fn monolithic_and_segmented_data_never_coexist() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let mut cache = SceneCache::new();

    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);
    assert_eq!(cache.data_segment_count(), 0);

    // the first segment displaces the monolithic recording
    let key = SegmentKey::new(SegmentKind::Series, 0);
    cache.store_data_segment(key, marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);
    assert_eq!(cache.released_scene_count(), 1);
    assert_eq!(cache.data_segment_count(), 1);

    // and a monolithic store displaces every segment
    cache.store_data_segment(
        SegmentKey::new(SegmentKind::Series, 1),
        marker_scene(),
        BOUNDS,
        STYLE_HASH,
        &state,
        &snapshot,
    );
    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);
    assert_eq!(cache.released_scene_count(), 3);
    assert_eq!(cache.data_segment_count(), 0);
}

#[test]
fn label_segments_carry_their_placements() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let key = SegmentKey::new(SegmentKind::Series, 0);
    let placements = vec![Rect::new(10.0, 10.0, 30.0, 12.0)];
    let mut cache = SceneCache::new();

    cache.store_data_label_segment(
        key,
        marker_scene(),
        placements.clone(),
        BOUNDS,
        STYLE_HASH,
        &state,
        &snapshot,
    );
    let segment = cache.try_get_data_label_segment(key).expect("label segment");
    assert_eq!(segment.placements(), placements.as_slice());
    assert_eq!(cache.label_segment_count(), 1);

    cache.clear_data_label_segments();
    assert_eq!(cache.label_segment_count(), 0);
    assert_eq!(cache.released_scene_count(), 1);
    assert!(cache.try_get_data_label_segment(key).is_none());
}

#[test]
fn clear_data_segments_releases_each_recording() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let mut cache = SceneCache::new();
    for series in 0..3 {
        cache.store_data_segment(
            SegmentKey::new(SegmentKind::Series, series),
            marker_scene(),
            BOUNDS,
            STYLE_HASH,
            &state,
            &snapshot,
        );
    }

    cache.clear_data_segments();
    assert_eq!(cache.data_segment_count(), 0);
    assert_eq!(cache.released_scene_count(), 3);
}

#[test]
fn whole_content_store_supersedes_every_layer() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let mut cache = SceneCache::new();
    cache.store_axes(marker_scene(), BOUNDS, STYLE_HASH, &state);
    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);
    cache.store_legend(marker_scene(), BOUNDS, STYLE_HASH, &state);

    let whole = marker_scene();
    let whole_id = whole.id();
    cache.store(whole, BOUNDS, STYLE_HASH, &state, &snapshot);
    assert_eq!(cache.released_scene_count(), 3);
    // per-layer predicates no longer answer for the whole-content recording
    assert!(!cache.has_axes(BOUNDS, STYLE_HASH, &state));
    assert_eq!(cache.data_segment_count(), 0);

    let mut surface = NullSurface::new();
    assert!(cache.try_draw(&mut surface, BOUNDS, &snapshot, STYLE_HASH, None));
    assert_eq!(surface.replayed_scene_ids, vec![whole_id]);
}

#[test]
fn invalidate_empties_the_cache_and_is_idempotent() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, Some(Rect::new(560.0, 10.0, 70.0, 40.0)));
    let mut cache = SceneCache::new();
    cache.store_axes(marker_scene(), BOUNDS, STYLE_HASH, &state);
    cache.store_data(marker_scene(), BOUNDS, STYLE_HASH, &state, &snapshot);
    cache.store_axis_text(marker_scene(), BOUNDS, STYLE_HASH, &state);
    cache.store_legend(marker_scene(), BOUNDS, STYLE_HASH, &state);

    cache.invalidate();
    assert!(!cache.is_compatible(BOUNDS, STYLE_HASH, &state));
    assert!(!cache.has_axes(BOUNDS, STYLE_HASH, &state));
    assert!(!cache.has_data(BOUNDS, STYLE_HASH, &state, &snapshot, DataDelta::None));
    assert!(!cache.has_axis_text(BOUNDS, STYLE_HASH, &state));
    assert!(!cache.has_legend(BOUNDS, STYLE_HASH, &state));
    let released = cache.released_scene_count();
    assert_eq!(released, 4);

    // a second invalidation finds nothing further to release
    cache.invalidate();
    assert_eq!(cache.released_scene_count(), released);

    let mut surface = NullSurface::new();
    assert!(!cache.try_draw(&mut surface, BOUNDS, &snapshot, STYLE_HASH, None));
    assert_eq!(surface.primitives_drawn(), 0);
}

#[test]
fn replay_composites_layers_in_fixed_order() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, Some(Rect::new(560.0, 10.0, 70.0, 40.0)));
    let key_a = SegmentKey::new(SegmentKind::Series, 0);
    let key_b = SegmentKey::new(SegmentKind::Series, 1);
    let mut cache = SceneCache::new();

    let axes = marker_scene();
    let seg_a = marker_scene();
    let seg_b = marker_scene();
    let axis_text = marker_scene();
    let labels = marker_scene();
    let legend = marker_scene();
    let expected = vec![
        axes.id(),
        seg_b.id(),
        seg_a.id(),
        axis_text.id(),
        labels.id(),
        legend.id(),
    ];

    cache.store_axes(axes, BOUNDS, STYLE_HASH, &state);
    cache.store_data_segment(key_a, seg_a, BOUNDS, STYLE_HASH, &state, &snapshot);
    cache.store_data_segment(key_b, seg_b, BOUNDS, STYLE_HASH, &state, &snapshot);
    cache.store_axis_text(axis_text, BOUNDS, STYLE_HASH, &state);
    cache.store_data_label_segment(key_b, labels, Vec::new(), BOUNDS, STYLE_HASH, &state, &snapshot);
    cache.store_legend(legend, BOUNDS, STYLE_HASH, &state);

    // the supplied order reverses the insertion order of the data segments
    let order = [key_b, key_a];
    let mut surface = NullSurface::new();
    assert!(cache.try_draw(&mut surface, BOUNDS, &snapshot, STYLE_HASH, Some(&order)));
    assert_eq!(surface.replayed_scene_ids, expected);
}

#[test]
fn replay_refuses_mismatched_bounds_or_style() {
    let snapshot = snapshot(1);
    let state = state_for(&snapshot, None);
    let mut cache = SceneCache::new();
    cache.store_axes(marker_scene(), BOUNDS, STYLE_HASH, &state);

    let mut surface = NullSurface::new();
    let moved = Rect::new(0.0, 0.0, 640.0, 481.0);
    assert!(!cache.try_draw(&mut surface, moved, &snapshot, STYLE_HASH, None));
    assert!(!cache.try_draw(&mut surface, BOUNDS, &snapshot, STYLE_HASH + 1, None));
    assert_eq!(surface.primitives_drawn(), 0);
    assert!(cache.try_draw(&mut surface, BOUNDS, &snapshot, STYLE_HASH, None));
}

#[test]
fn legendless_states_accept_an_empty_legend_layer() {
    let snapshot = snapshot(1);
    let legendless = state_for(&snapshot, None);
    let legend_rect = Rect::new(560.0, 10.0, 70.0, 40.0);
    let legendful = state_for(&snapshot, Some(legend_rect));
    let mut cache = SceneCache::new();

    // an empty cache satisfies a chart that wants no legend, and only that
    assert!(cache.has_legend(BOUNDS, STYLE_HASH, &legendless));
    assert!(!cache.has_legend(BOUNDS, STYLE_HASH, &legendful));

    cache.store_legend(marker_scene(), BOUNDS, STYLE_HASH, &legendful);
    assert!(cache.has_legend(BOUNDS, STYLE_HASH, &legendful));
    // with a legend layer held, a no-legend state no longer matches
    assert!(!cache.has_legend(BOUNDS, STYLE_HASH, &legendless));

    // a different rectangle is a different legend
    let mut moved = legendful.clone();
    moved.legend_rect = Some(Rect::new(500.0, 10.0, 70.0, 40.0));
    assert!(!cache.has_legend(BOUNDS, STYLE_HASH, &moved));
}
