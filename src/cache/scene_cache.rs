use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{DataDelta, DataSnapshot, Rect};
use crate::surface::{RecordedScene, Surface};

use super::{RenderState, SegmentKey};

/// Base slot content: a whole-chart recording or just the axes layer.
#[derive(Debug, Default)]
enum BaseLayer {
    #[default]
    Empty,
    Whole(RecordedScene),
    Axes(RecordedScene),
}

/// Monolithic and segmented data content are mutually exclusive by
/// construction.
#[derive(Debug, Default)]
enum DataLayer {
    #[default]
    Empty,
    Monolithic(RecordedScene),
    Segmented(IndexMap<SegmentKey, RecordedScene>),
}

/// One value-label recording plus the rectangles its labels occupy, kept so
/// hosts can hit-test and collision-resolve without replaying the scene.
#[derive(Debug)]
pub struct LabelSegment {
    scene: RecordedScene,
    placements: Vec<Rect>,
}

impl LabelSegment {
    #[must_use]
    pub fn scene(&self) -> &RecordedScene {
        &self.scene
    }

    #[must_use]
    pub fn placements(&self) -> &[Rect] {
        &self.placements
    }
}

/// Layered cache of recorded scenes for one chart.
///
/// Layers composite in a fixed order: base (whole content or axes), data,
/// axis text, value-label segments, legend. Every recording is owned by
/// exactly one slot; installing a replacement releases the prior recording
/// before the new one lands.
///
/// Stored layers are fingerprinted by frame bounds, a style hash, and a
/// [`RenderState`]; data-dependent layers are additionally gated by the
/// snapshot version (or snapshot identity when the host does not version).
#[derive(Debug, Default)]
pub struct SceneCache {
    base: BaseLayer,
    data: DataLayer,
    axis_text: Option<RecordedScene>,
    label_segments: IndexMap<SegmentKey, LabelSegment>,
    legend: Option<RecordedScene>,
    bounds: Option<Rect>,
    style_hash: Option<u64>,
    state: Option<RenderState>,
    data_version: u64,
    data_identity: Weak<DataSnapshot>,
    released_scenes: u64,
}

impl SceneCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative count of recordings this cache has released. Replacing a
    /// layer bumps it exactly once per displaced recording.
    #[must_use]
    pub fn released_scene_count(&self) -> u64 {
        self.released_scenes
    }

    #[must_use]
    pub fn data_segment_count(&self) -> usize {
        match &self.data {
            DataLayer::Segmented(map) => map.len(),
            DataLayer::Empty | DataLayer::Monolithic(_) => 0,
        }
    }

    #[must_use]
    pub fn label_segment_count(&self) -> usize {
        self.label_segments.len()
    }

    #[must_use]
    pub fn stored_state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    fn release(&mut self, scene: RecordedScene) {
        trace!(scene_id = scene.id().raw(), "release recorded scene");
        self.released_scenes += 1;
        drop(scene);
    }

    fn release_base(&mut self) {
        match std::mem::take(&mut self.base) {
            BaseLayer::Empty => {}
            BaseLayer::Whole(scene) | BaseLayer::Axes(scene) => self.release(scene),
        }
    }

    fn release_data(&mut self) {
        match std::mem::take(&mut self.data) {
            DataLayer::Empty => {}
            DataLayer::Monolithic(scene) => self.release(scene),
            DataLayer::Segmented(map) => {
                for (_, scene) in map {
                    self.release(scene);
                }
            }
        }
    }

    fn release_axis_text(&mut self) {
        if let Some(scene) = self.axis_text.take() {
            self.release(scene);
        }
    }

    fn release_label_segments(&mut self) {
        let segments = std::mem::take(&mut self.label_segments);
        for (_, segment) in segments {
            self.release(segment.scene);
        }
    }

    fn release_legend(&mut self) {
        if let Some(scene) = self.legend.take() {
            self.release(scene);
        }
    }

    fn record_shared(&mut self, bounds: Rect, style_hash: u64, state: &RenderState) {
        self.bounds = Some(bounds);
        self.style_hash = Some(style_hash);
        self.state = Some(state.clone());
    }

    fn record_data_source(&mut self, snapshot: &Arc<DataSnapshot>) {
        self.data_version = snapshot.version;
        self.data_identity = Arc::downgrade(snapshot);
    }

    fn shared_matches(&self, bounds: Rect, style_hash: u64) -> bool {
        self.bounds == Some(bounds) && self.style_hash == Some(style_hash)
    }

    /// Whether stored data-dependent content came from `snapshot`.
    ///
    /// Version zero means the host does not version snapshots; the check
    /// then falls back to identity of the `Arc` allocation.
    #[must_use]
    pub fn matches_snapshot(&self, snapshot: &Arc<DataSnapshot>) -> bool {
        if self.data_version != snapshot.version {
            return false;
        }
        if snapshot.version != 0 {
            return true;
        }
        self.data_identity
            .upgrade()
            .is_some_and(|held| Arc::ptr_eq(&held, snapshot))
    }

    /// Shared fingerprint check for every non-legend layer.
    #[must_use]
    pub fn is_compatible(&self, bounds: Rect, style_hash: u64, state: &RenderState) -> bool {
        let Some(stored) = &self.state else {
            return false;
        };
        self.shared_matches(bounds, style_hash) && stored.matches_base(state)
    }

    #[must_use]
    pub fn has_axes(&self, bounds: Rect, style_hash: u64, state: &RenderState) -> bool {
        matches!(self.base, BaseLayer::Axes(_)) && self.is_compatible(bounds, style_hash, state)
    }

    /// Whether the data layer can be replayed as-is. Any reported delta
    /// disqualifies it regardless of fingerprints.
    #[must_use]
    pub fn has_data(
        &self,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
        snapshot: &Arc<DataSnapshot>,
        delta: DataDelta,
    ) -> bool {
        if !delta.is_none() {
            return false;
        }
        let populated = match &self.data {
            DataLayer::Empty => false,
            DataLayer::Monolithic(_) => true,
            DataLayer::Segmented(map) => !map.is_empty(),
        };
        populated && self.is_compatible(bounds, style_hash, state) && self.matches_snapshot(snapshot)
    }

    #[must_use]
    pub fn has_axis_text(&self, bounds: Rect, style_hash: u64, state: &RenderState) -> bool {
        self.axis_text.is_some() && self.is_compatible(bounds, style_hash, state)
    }

    /// A chart with no legend is satisfied by a cache holding no legend
    /// layer; otherwise the stored legend scope must match.
    #[must_use]
    pub fn has_legend(&self, bounds: Rect, style_hash: u64, state: &RenderState) -> bool {
        if state.legend_rect.is_none() && self.legend.is_none() {
            return true;
        }
        let Some(stored) = &self.state else {
            return false;
        };
        self.legend.is_some()
            && self.shared_matches(bounds, style_hash)
            && stored.matches_legend(state)
    }

    /// Installs a recording of the entire chart, superseding every per-layer
    /// slot.
    pub fn store(
        &mut self,
        scene: RecordedScene,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
        snapshot: &Arc<DataSnapshot>,
    ) {
        debug!(scene_id = scene.id().raw(), "store whole-content scene");
        self.release_base();
        self.release_data();
        self.release_axis_text();
        self.release_label_segments();
        self.release_legend();
        self.base = BaseLayer::Whole(scene);
        self.record_shared(bounds, style_hash, state);
        self.record_data_source(snapshot);
    }

    pub fn store_axes(
        &mut self,
        scene: RecordedScene,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
    ) {
        debug!(scene_id = scene.id().raw(), "store axes scene");
        self.release_base();
        self.base = BaseLayer::Axes(scene);
        self.record_shared(bounds, style_hash, state);
    }

    /// Installs the monolithic data recording, displacing any segments.
    pub fn store_data(
        &mut self,
        scene: RecordedScene,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
        snapshot: &Arc<DataSnapshot>,
    ) {
        debug!(scene_id = scene.id().raw(), "store monolithic data scene");
        self.release_data();
        self.data = DataLayer::Monolithic(scene);
        self.record_shared(bounds, style_hash, state);
        self.record_data_source(snapshot);
    }

    /// Installs one data segment, displacing a monolithic recording or a
    /// prior recording under the same key.
    pub fn store_data_segment(
        &mut self,
        key: SegmentKey,
        scene: RecordedScene,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
        snapshot: &Arc<DataSnapshot>,
    ) {
        trace!(
            scene_id = scene.id().raw(),
            segment_kind = ?key.kind,
            series = key.series,
            "store data segment"
        );
        let mut map = match std::mem::take(&mut self.data) {
            DataLayer::Segmented(map) => map,
            DataLayer::Empty => IndexMap::new(),
            DataLayer::Monolithic(old) => {
                self.release(old);
                IndexMap::new()
            }
        };
        if let Some(old) = map.insert(key, scene) {
            self.release(old);
        }
        self.data = DataLayer::Segmented(map);
        self.record_shared(bounds, style_hash, state);
        self.record_data_source(snapshot);
    }

    pub fn store_axis_text(
        &mut self,
        scene: RecordedScene,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
    ) {
        debug!(scene_id = scene.id().raw(), "store axis text scene");
        self.release_axis_text();
        self.axis_text = Some(scene);
        self.record_shared(bounds, style_hash, state);
    }

    pub fn store_data_label_segment(
        &mut self,
        key: SegmentKey,
        scene: RecordedScene,
        placements: Vec<Rect>,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
        snapshot: &Arc<DataSnapshot>,
    ) {
        trace!(
            scene_id = scene.id().raw(),
            segment_kind = ?key.kind,
            series = key.series,
            labels = placements.len(),
            "store value-label segment"
        );
        if let Some(old) = self
            .label_segments
            .insert(key, LabelSegment { scene, placements })
        {
            self.release(old.scene);
        }
        self.record_shared(bounds, style_hash, state);
        self.record_data_source(snapshot);
    }

    pub fn store_legend(
        &mut self,
        scene: RecordedScene,
        bounds: Rect,
        style_hash: u64,
        state: &RenderState,
    ) {
        debug!(scene_id = scene.id().raw(), "store legend scene");
        self.release_legend();
        self.legend = Some(scene);
        self.record_shared(bounds, style_hash, state);
    }

    #[must_use]
    pub fn try_get_data_segment(&self, key: SegmentKey) -> Option<&RecordedScene> {
        match &self.data {
            DataLayer::Segmented(map) => map.get(&key),
            DataLayer::Empty | DataLayer::Monolithic(_) => None,
        }
    }

    #[must_use]
    pub fn try_get_data_label_segment(&self, key: SegmentKey) -> Option<&LabelSegment> {
        self.label_segments.get(&key)
    }

    /// Releases every data segment; a monolithic recording is untouched.
    pub fn clear_data_segments(&mut self) {
        if matches!(self.data, DataLayer::Segmented(_)) {
            trace!("clear data segments");
            self.release_data();
        }
    }

    pub fn clear_data_label_segments(&mut self) {
        if !self.label_segments.is_empty() {
            trace!("clear value-label segments");
            self.release_label_segments();
        }
    }

    fn any_layer_populated(&self) -> bool {
        !matches!(self.base, BaseLayer::Empty)
            || !matches!(self.data, DataLayer::Empty)
            || self.axis_text.is_some()
            || !self.label_segments.is_empty()
            || self.legend.is_some()
    }

    fn holds_data_content(&self) -> bool {
        matches!(self.base, BaseLayer::Whole(_))
            || !matches!(self.data, DataLayer::Empty)
            || !self.label_segments.is_empty()
    }

    /// Replays every populated layer in composite order. Returns `false`
    /// without drawing anything when nothing is populated, when bounds or
    /// style hash differ from what is stored, or when data-dependent layers
    /// were recorded from a different snapshot.
    ///
    /// `segment_order` fixes the draw order of data and label segments;
    /// without it they replay in insertion order.
    pub fn try_draw(
        &self,
        surface: &mut dyn Surface,
        bounds: Rect,
        snapshot: &Arc<DataSnapshot>,
        style_hash: u64,
        segment_order: Option<&[SegmentKey]>,
    ) -> bool {
        if !self.any_layer_populated() {
            trace!("cache replay skipped: no layers populated");
            return false;
        }
        if !self.shared_matches(bounds, style_hash) {
            debug!("cache replay skipped: bounds or style hash changed");
            return false;
        }
        if self.holds_data_content() && !self.matches_snapshot(snapshot) {
            debug!(
                stored_version = self.data_version,
                snapshot_version = snapshot.version,
                "cache replay skipped: stale data source"
            );
            return false;
        }

        match &self.base {
            BaseLayer::Empty => {}
            BaseLayer::Whole(scene) | BaseLayer::Axes(scene) => surface.draw_scene(scene),
        }
        match &self.data {
            DataLayer::Empty => {}
            DataLayer::Monolithic(scene) => surface.draw_scene(scene),
            DataLayer::Segmented(map) => match segment_order {
                Some(order) => {
                    for key in order {
                        if let Some(scene) = map.get(key) {
                            surface.draw_scene(scene);
                        }
                    }
                }
                None => {
                    for scene in map.values() {
                        surface.draw_scene(scene);
                    }
                }
            },
        }
        if let Some(scene) = &self.axis_text {
            surface.draw_scene(scene);
        }
        match segment_order {
            Some(order) => {
                for key in order {
                    if let Some(segment) = self.label_segments.get(key) {
                        surface.draw_scene(&segment.scene);
                    }
                }
            }
            None => {
                for segment in self.label_segments.values() {
                    surface.draw_scene(&segment.scene);
                }
            }
        }
        if let Some(scene) = &self.legend {
            surface.draw_scene(scene);
        }
        true
    }

    /// Releases everything and clears all bookkeeping. Idempotent.
    pub fn invalidate(&mut self) {
        debug!("invalidate scene cache");
        self.release_base();
        self.release_data();
        self.release_axis_text();
        self.release_label_segments();
        self.release_legend();
        self.bounds = None;
        self.style_hash = None;
        self.state = None;
        self.data_version = 0;
        self.data_identity = Weak::new();
    }
}
