use super::{Paint, Path, RecordedScene, SceneId, Surface, TextAlign, TextMeasurer};
use crate::core::{Point, Rect};

/// Fixed per-character advance used by the null measurer, as a fraction of
/// the font size.
const CHAR_ADVANCE_RATIO: f64 = 0.6;

/// Surface that draws nothing and counts what it was asked to draw.
///
/// Used by headless hosts and throughout the test suite to observe replay
/// behavior without a rendering backend. Text measurement is a fixed
/// per-character advance, which keeps prefix widths strictly monotonic.
#[derive(Debug, Default)]
pub struct NullSurface {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
    /// Ids of replayed scenes in the order they arrived.
    pub replayed_scene_ids: Vec<SceneId>,
}

impl NullSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total primitive draw calls received so far.
    #[must_use]
    pub fn primitives_drawn(&self) -> usize {
        self.lines_drawn + self.rects_drawn + self.circles_drawn + self.paths_drawn + self.texts_drawn
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Surface for NullSurface {
    fn draw_line(&mut self, _from: Point, _to: Point, _paint: &Paint) {
        self.lines_drawn += 1;
    }

    fn draw_rect(&mut self, _rect: Rect, _paint: &Paint) {
        self.rects_drawn += 1;
    }

    fn draw_circle(&mut self, _center: Point, _radius: f64, _paint: &Paint) {
        self.circles_drawn += 1;
    }

    fn draw_path(&mut self, _path: &Path, _paint: &Paint) {
        self.paths_drawn += 1;
    }

    fn draw_text(&mut self, _text: &str, _origin: Point, _size_px: f64, _align: TextAlign, _paint: &Paint) {
        self.texts_drawn += 1;
    }

    fn draw_scene(&mut self, scene: &RecordedScene) {
        self.replayed_scene_ids.push(scene.id());
        scene.replay(self);
    }
}

impl TextMeasurer for NullSurface {
    fn text_width(&self, text: &str, size_px: f64) -> f64 {
        text.chars().count() as f64 * size_px * CHAR_ADVANCE_RATIO
    }
}
