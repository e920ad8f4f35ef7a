use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

use super::{Paint, Path, Surface, TextAlign};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one recorded scene.
///
/// Replacing a cached layer installs a scene with a fresh id, so tests can
/// observe release-and-replace without instrumenting drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One primitive operation captured during recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        paint: Paint,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    Circle {
        center: Point,
        radius: f64,
        paint: Paint,
    },
    Path {
        path: Path,
        paint: Paint,
    },
    Text {
        text: String,
        origin: Point,
        size_px: f64,
        align: TextAlign,
        paint: Paint,
    },
}

/// Replayable sequence of draw commands.
///
/// A scene is owned by exactly one holder at a time; the layered cache moves
/// scenes in and out and drops superseded ones, never sharing them.
#[derive(Debug, PartialEq, Serialize)]
pub struct RecordedScene {
    id: SceneId,
    commands: Vec<DrawCommand>,
}

impl RecordedScene {
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Re-issues every recorded command against `surface` in order.
    pub fn replay(&self, surface: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::Line { from, to, paint } => surface.draw_line(*from, *to, paint),
                DrawCommand::Rect { rect, paint } => surface.draw_rect(*rect, paint),
                DrawCommand::Circle {
                    center,
                    radius,
                    paint,
                } => surface.draw_circle(*center, *radius, paint),
                DrawCommand::Path { path, paint } => surface.draw_path(path, paint),
                DrawCommand::Text {
                    text,
                    origin,
                    size_px,
                    align,
                    paint,
                } => surface.draw_text(text, *origin, *size_px, *align, paint),
            }
        }
    }

    /// Pretty-JSON dump of the recorded command list for snapshot tests and
    /// debugging; ids are included so dumps stay distinguishable.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::InvalidData(format!("scene serialization failed: {err}")))
    }
}

/// Captures primitive operations into a [`RecordedScene`].
///
/// The recorder implements [`Surface`], so layer builders draw through the
/// same trait whether they target a backend or a recording.
#[derive(Debug, Default)]
pub struct SceneRecorder {
    commands: Vec<DrawCommand>,
}

impl SceneRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn finish(self) -> RecordedScene {
        RecordedScene {
            id: SceneId::next(),
            commands: self.commands,
        }
    }
}

impl Surface for SceneRecorder {
    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            paint: paint.clone(),
        });
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::Rect {
            rect,
            paint: paint.clone(),
        });
    }

    fn draw_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::Path {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, size_px: f64, align: TextAlign, paint: &Paint) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            origin,
            size_px,
            align,
            paint: paint.clone(),
        });
    }

    fn draw_scene(&mut self, scene: &RecordedScene) {
        // Nested scenes are inlined so a recording never aliases another
        // scene's storage.
        self.commands.extend(scene.commands.iter().cloned());
    }
}

/// Records `build` into a fresh scene.
pub fn record_scene(build: impl FnOnce(&mut SceneRecorder)) -> RecordedScene {
    let mut recorder = SceneRecorder::new();
    build(&mut recorder);
    recorder.finish()
}

#[cfg(test)]
mod tests {
    use super::{record_scene, DrawCommand, SceneRecorder};
    use crate::core::{Point, Rect};
    use crate::surface::{Color, Paint, Surface};

    #[test]
    fn scene_ids_are_unique() {
        let first = record_scene(|_| {});
        let second = record_scene(|_| {});
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn recorder_preserves_command_order() {
        let paint = Paint::fill(Color::rgb(0.5, 0.5, 0.5));
        let scene = record_scene(|recorder| {
            recorder.draw_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &paint);
            recorder.draw_line(Point::new(0.0, 0.0), Point::new(4.0, 4.0), &paint);
        });

        assert_eq!(scene.len(), 2);
        assert!(matches!(scene.commands()[0], DrawCommand::Rect { .. }));
        assert!(matches!(scene.commands()[1], DrawCommand::Line { .. }));
    }

    #[test]
    fn nested_scene_draw_is_inlined() {
        let paint = Paint::fill(Color::rgb(0.1, 0.2, 0.3));
        let inner = record_scene(|recorder| {
            recorder.draw_circle(Point::new(1.0, 1.0), 2.0, &paint);
        });

        let mut recorder = SceneRecorder::new();
        recorder.draw_scene(&inner);
        let outer = recorder.finish();

        assert_eq!(outer.len(), 1);
        assert!(matches!(outer.commands()[0], DrawCommand::Circle { .. }));
    }
}
