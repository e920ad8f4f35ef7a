use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Position in surface (pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle in surface coordinates.
///
/// Cache fingerprints compare rectangles with exact floating equality, so the
/// derived `PartialEq` is the comparison contract: two rectangles produced by
/// the same layout pass from the same inputs compare equal bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.left + self.width * 0.5
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        self.top + self.height * 0.5
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn validate(self) -> ChartResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ChartError::InvalidBounds {
                left: self.left,
                top: self.top,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Returns a copy shrunk by `dx`/`dy` on each side.
    #[must_use]
    pub fn inset(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            width: self.width - dx * 2.0,
            height: self.height - dy * 2.0,
        }
    }
}
