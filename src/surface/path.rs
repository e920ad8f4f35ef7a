use serde::{Deserialize, Serialize};

use crate::core::Point;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// Polyline path with explicit subpath breaks.
///
/// Overlay curves use breaks to skip points that are invalid for the target
/// axis, so gaps stay gaps instead of being drawn as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    #[must_use]
    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Counts vertices actually placed on the path (moves and lines).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.cmds
            .iter()
            .filter(|cmd| matches!(cmd, PathCmd::MoveTo(_) | PathCmd::LineTo(_)))
            .count()
    }

    pub fn validate(&self) -> ChartResult<()> {
        for cmd in &self.cmds {
            if let PathCmd::MoveTo(point) | PathCmd::LineTo(point) = cmd {
                if !point.is_finite() {
                    return Err(ChartError::InvalidData(
                        "path vertices must be finite".to_owned(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Incremental [`Path`] builder.
///
/// `push` starts a new subpath after every `gap`, so callers can stream
/// per-point results and drop invalid ones without tracking pen state.
#[derive(Debug, Default)]
pub struct PathBuilder {
    cmds: Vec<PathCmd>,
    pen_down: bool,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) {
        if self.pen_down {
            self.cmds.push(PathCmd::LineTo(point));
        } else {
            self.cmds.push(PathCmd::MoveTo(point));
            self.pen_down = true;
        }
    }

    /// Lifts the pen; the next `push` starts a new subpath.
    pub fn gap(&mut self) {
        self.pen_down = false;
    }

    /// Pushes the point when present, otherwise records a gap.
    pub fn push_or_gap(&mut self, point: Option<Point>) {
        match point {
            Some(point) => self.push(point),
            None => self.gap(),
        }
    }

    pub fn close(&mut self) {
        if self.pen_down {
            self.cmds.push(PathCmd::Close);
            self.pen_down = false;
        }
    }

    #[must_use]
    pub fn build(self) -> Path {
        Path { cmds: self.cmds }
    }
}

/// Samples an arc into evenly spaced vertices, endpoints included.
///
/// Angles are in radians; a surface backend draws the polyline, so wedge and
/// ring geometry stays backend-agnostic.
#[must_use]
pub fn sample_arc(
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep_angle: f64,
    steps: usize,
) -> Vec<Point> {
    let steps = steps.max(1);
    let mut points = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let angle = start_angle + sweep_angle * (step as f64) / (steps as f64);
        points.push(Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::{PathBuilder, PathCmd, sample_arc};
    use crate::core::Point;

    #[test]
    fn gap_starts_a_new_subpath() {
        let mut builder = PathBuilder::new();
        builder.push(Point::new(0.0, 0.0));
        builder.push(Point::new(1.0, 1.0));
        builder.gap();
        builder.push(Point::new(2.0, 2.0));
        let path = builder.build();

        assert_eq!(path.commands().len(), 3);
        assert!(matches!(path.commands()[0], PathCmd::MoveTo(_)));
        assert!(matches!(path.commands()[1], PathCmd::LineTo(_)));
        assert!(matches!(path.commands()[2], PathCmd::MoveTo(_)));
    }

    #[test]
    fn push_or_gap_drops_missing_points() {
        let mut builder = PathBuilder::new();
        builder.push_or_gap(Some(Point::new(0.0, 0.0)));
        builder.push_or_gap(None);
        builder.push_or_gap(Some(Point::new(3.0, 3.0)));
        let path = builder.build();

        assert_eq!(path.vertex_count(), 2);
        assert!(matches!(path.commands()[1], PathCmd::MoveTo(_)));
    }

    #[test]
    fn arc_sampling_includes_both_endpoints() {
        let points = sample_arc(Point::new(0.0, 0.0), 1.0, 0.0, std::f64::consts::FRAC_PI_2, 4);
        assert_eq!(points.len(), 5);
        assert!((points[0].x - 1.0).abs() <= 1e-12);
        assert!(points[4].y - 1.0 <= 1e-12);
    }
}
