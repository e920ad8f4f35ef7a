//! Drawing surface abstraction: paint and path primitives, recorded scenes,
//! and the backend traits the composition layer draws through.
//!
//! The engine never talks to a concrete backend directly. Layer builders
//! record into a [`SceneRecorder`], and composition replays the recordings
//! onto whatever [`Surface`] the host supplies.

mod paint;
mod path;
mod scene;

mod null;

#[cfg(feature = "cairo-backend")]
mod cairo_backend;

pub use null::NullSurface;
pub use paint::{Color, GradientStop, LinearGradient, Paint, PaintStyle};
pub use path::{Path, PathBuilder, PathCmd, sample_arc};
pub use scene::{DrawCommand, RecordedScene, SceneId, SceneRecorder, record_scene};

#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoSurface, CairoSurfaceStats};

use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};

/// Horizontal anchoring of drawn text relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Contract implemented by every drawing target.
///
/// Implementations draw immediately; recording and caching live above this
/// trait, so backends stay stateless apart from their own output buffer.
pub trait Surface {
    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint);
    fn draw_rect(&mut self, rect: Rect, paint: &Paint);
    fn draw_circle(&mut self, center: Point, radius: f64, paint: &Paint);
    fn draw_path(&mut self, path: &Path, paint: &Paint);
    fn draw_text(&mut self, text: &str, origin: Point, size_px: f64, align: TextAlign, paint: &Paint);

    /// Replays a previously recorded scene onto this surface.
    fn draw_scene(&mut self, scene: &RecordedScene);
}

/// Host-provided text measurement.
///
/// Legend layout and value-label placement need pixel widths before anything
/// is drawn, and recorded scenes cannot measure. Widths must be monotonic in
/// the character-prefix length of the input for truncation to be sound.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, size_px: f64) -> f64;
}
