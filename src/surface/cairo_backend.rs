use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::warn;

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

use super::{Paint, PaintStyle, Path, PathCmd, RecordedScene, Surface, TextAlign, TextMeasurer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoSurfaceStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
    pub scenes_replayed: usize,
}

/// Cairo + Pango + PangoCairo surface backend.
///
/// Draws into an offscreen ARGB image surface. Cairo errors cannot surface
/// through the `Surface` trait's immediate draw calls, so the first failure
/// is latched and reported by [`CairoSurface::finish`].
pub struct CairoSurface {
    surface: ImageSurface,
    context: Context,
    stats: CairoSurfaceStats,
    failure: Option<ChartError>,
}

impl CairoSurface {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            surface,
            context,
            stats: CairoSurfaceStats::default(),
            failure: None,
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn image_surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn stats(&self) -> CairoSurfaceStats {
        self.stats
    }

    /// Reports the first draw failure since the last call, if any.
    pub fn finish(&mut self) -> ChartResult<()> {
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn write_png(&mut self, writer: &mut impl std::io::Write) -> ChartResult<()> {
        self.surface.flush();
        self.surface
            .write_to_png(writer)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode png: {err}")))
    }

    fn record_failure(&mut self, prefix: &str, err: cairo::Error) {
        if self.failure.is_none() {
            warn!(%err, prefix, "cairo draw call failed");
            self.failure = Some(map_backend_error(prefix, err));
        }
    }

    fn finish_shape(&mut self, paint: &Paint, prefix: &str) {
        let result = match paint.style {
            PaintStyle::Fill => self.context.fill(),
            PaintStyle::Stroke => {
                self.context.set_line_width(paint.stroke_width);
                self.context.stroke()
            }
        };
        if let Err(err) = result {
            self.record_failure(prefix, err);
        }
    }
}

impl Surface for CairoSurface {
    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        apply_paint(&self.context, paint, segment_bounds(from, to));
        self.context.new_path();
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        self.context.set_line_width(paint.stroke_width);
        if let Err(err) = self.context.stroke() {
            self.record_failure("failed to stroke line", err);
        }
        self.stats.lines_drawn += 1;
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        apply_paint(
            &self.context,
            paint,
            (rect.left, rect.top, rect.right(), rect.bottom()),
        );
        self.context.new_path();
        self.context.rectangle(rect.left, rect.top, rect.width, rect.height);
        self.finish_shape(paint, "failed to draw rectangle");
        self.stats.rects_drawn += 1;
    }

    fn draw_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        apply_paint(
            &self.context,
            paint,
            (
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
        );
        self.context.new_path();
        self.context
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
        self.finish_shape(paint, "failed to draw circle");
        self.stats.circles_drawn += 1;
    }

    fn draw_path(&mut self, path: &Path, paint: &Paint) {
        if path.is_empty() {
            return;
        }
        apply_paint(&self.context, paint, path_bounds(path));
        self.context.new_path();
        for command in path.commands() {
            match command {
                PathCmd::MoveTo(point) => self.context.move_to(point.x, point.y),
                PathCmd::LineTo(point) => self.context.line_to(point.x, point.y),
                PathCmd::Close => self.context.close_path(),
            }
        }
        self.finish_shape(paint, "failed to draw path");
        self.stats.paths_drawn += 1;
    }

    fn draw_text(&mut self, text: &str, origin: Point, size_px: f64, align: TextAlign, paint: &Paint) {
        let layout = pangocairo::functions::create_layout(&self.context);
        let font_description = FontDescription::from_string(&format!("Sans {size_px}"));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);

        let (text_width, _text_height) = layout.pixel_size();
        let x = match align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - f64::from(text_width) / 2.0,
            TextAlign::Right => origin.x - f64::from(text_width),
        };

        apply_paint(&self.context, paint, (x, origin.y, x, origin.y));
        self.context.move_to(x, origin.y);
        pangocairo::functions::show_layout(&self.context, &layout);
        self.stats.texts_drawn += 1;
    }

    fn draw_scene(&mut self, scene: &RecordedScene) {
        scene.replay(self);
        self.stats.scenes_replayed += 1;
    }
}

impl TextMeasurer for CairoSurface {
    fn text_width(&self, text: &str, size_px: f64) -> f64 {
        let layout = pangocairo::functions::create_layout(&self.context);
        let font_description = FontDescription::from_string(&format!("Sans {size_px}"));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        f64::from(layout.pixel_size().0)
    }
}

/// Sets the draw source: flat color, or a linear gradient spanning the shape
/// bounds, plus the dash pattern for strokes.
fn apply_paint(context: &Context, paint: &Paint, bounds: (f64, f64, f64, f64)) {
    match &paint.gradient {
        Some(gradient) => {
            let (left, top, right, bottom) = bounds;
            let pattern = if gradient.vertical {
                cairo::LinearGradient::new(left, top, left, bottom)
            } else {
                cairo::LinearGradient::new(left, top, right, top)
            };
            for stop in &gradient.stops {
                pattern.add_color_stop_rgba(
                    stop.offset,
                    stop.color.red,
                    stop.color.green,
                    stop.color.blue,
                    stop.color.alpha,
                );
            }
            if let Err(err) = context.set_source(&pattern) {
                warn!(%err, "failed to set gradient source, keeping previous source");
            }
        }
        None => {
            let color = paint.color;
            context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
        }
    }

    match &paint.dash {
        Some(dash) => context.set_dash(dash, 0.0),
        None => context.set_dash(&[], 0.0),
    }
}

fn segment_bounds(from: Point, to: Point) -> (f64, f64, f64, f64) {
    (
        from.x.min(to.x),
        from.y.min(to.y),
        from.x.max(to.x),
        from.y.max(to.y),
    )
}

fn path_bounds(path: &Path) -> (f64, f64, f64, f64) {
    let mut left = f64::INFINITY;
    let mut top = f64::INFINITY;
    let mut right = f64::NEG_INFINITY;
    let mut bottom = f64::NEG_INFINITY;
    for command in path.commands() {
        let point = match command {
            PathCmd::MoveTo(point) | PathCmd::LineTo(point) => point,
            PathCmd::Close => continue,
        };
        left = left.min(point.x);
        top = top.min(point.y);
        right = right.max(point.x);
        bottom = bottom.max(point.y);
    }
    if left > right {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (left, top, right, bottom)
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
