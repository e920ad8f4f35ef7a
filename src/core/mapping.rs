use crate::core::axis::{AxisKind, AxisRange, AxisSlot};
use crate::core::types::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// Pure axis model for one frame: category slots and value ranges on one
/// side, surface coordinates on the other.
///
/// All mapping methods are side-effect free and return `None` for values the
/// configured axis kind cannot place, so callers can skip points instead of
/// aborting.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMapper {
    plot: Rect,
    category_kind: AxisKind,
    category_count: usize,
    category_range: Option<AxisRange>,
    primary_kind: AxisKind,
    primary: AxisRange,
    secondary_kind: AxisKind,
    secondary: Option<AxisRange>,
    bar_oriented: bool,
}

impl PlotMapper {
    /// Categorical category axis, linear primary value axis, no secondary.
    pub fn new(plot: Rect, primary: AxisRange, category_count: usize) -> ChartResult<Self> {
        plot.validate()?;
        Ok(Self {
            plot,
            category_kind: AxisKind::Categorical,
            category_count,
            category_range: None,
            primary_kind: AxisKind::Linear,
            primary,
            secondary_kind: AxisKind::Linear,
            secondary: None,
            bar_oriented: false,
        })
    }

    /// Swaps the axes so categories run vertically and values horizontally.
    #[must_use]
    pub fn with_bar_orientation(mut self, bar_oriented: bool) -> Self {
        self.bar_oriented = bar_oriented;
        self
    }

    /// Numeric category axes require a range; the categorical kind ignores
    /// it and spaces slots uniformly.
    pub fn with_category_axis(
        mut self,
        kind: AxisKind,
        range: Option<AxisRange>,
    ) -> ChartResult<Self> {
        if kind != AxisKind::Categorical && range.is_none() {
            return Err(ChartError::InvalidData(
                "numeric category axis requires a range".to_owned(),
            ));
        }
        if let Some(range) = range {
            range.validate_for(kind)?;
        }
        self.category_kind = kind;
        self.category_range = range;
        Ok(self)
    }

    pub fn with_primary_kind(mut self, kind: AxisKind) -> ChartResult<Self> {
        validate_value_kind(kind, self.primary)?;
        self.primary_kind = kind;
        Ok(self)
    }

    pub fn with_secondary(mut self, kind: AxisKind, range: AxisRange) -> ChartResult<Self> {
        validate_value_kind(kind, range)?;
        self.secondary_kind = kind;
        self.secondary = Some(range);
        Ok(self)
    }

    #[must_use]
    pub fn plot(&self) -> Rect {
        self.plot
    }

    #[must_use]
    pub fn is_bar_oriented(&self) -> bool {
        self.bar_oriented
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.category_count
    }

    #[must_use]
    pub fn category_kind(&self) -> AxisKind {
        self.category_kind
    }

    /// Kind of the value axis in `slot`; `None` when the slot has no range.
    #[must_use]
    pub fn value_kind(&self, slot: AxisSlot) -> Option<AxisKind> {
        self.value_axis(slot).map(|(kind, _)| kind)
    }

    #[must_use]
    pub fn primary_range(&self) -> AxisRange {
        self.primary
    }

    #[must_use]
    pub fn secondary_range(&self) -> Option<AxisRange> {
        self.secondary
    }

    /// Extent of the category axis in surface units.
    #[must_use]
    pub fn category_extent(&self) -> f64 {
        if self.bar_oriented {
            self.plot.height
        } else {
            self.plot.width
        }
    }

    fn value_extent(&self) -> f64 {
        if self.bar_oriented {
            self.plot.width
        } else {
            self.plot.height
        }
    }

    /// Width of one category slot; zero when there are no slots.
    #[must_use]
    pub fn category_slot_extent(&self) -> f64 {
        if self.category_count == 0 {
            0.0
        } else {
            self.category_extent() / self.category_count as f64
        }
    }

    fn value_axis(&self, slot: AxisSlot) -> Option<(AxisKind, AxisRange)> {
        match slot {
            AxisSlot::Primary => Some((self.primary_kind, self.primary)),
            AxisSlot::Secondary => self.secondary.map(|range| (self.secondary_kind, range)),
        }
    }

    fn category_offset(&self, index: usize) -> Option<f64> {
        match self.category_kind {
            AxisKind::Categorical => {
                if self.category_count == 0 || index >= self.category_count {
                    return None;
                }
                let slot = (index as f64 + 0.5) / self.category_count as f64;
                Some(slot * self.category_extent())
            }
            AxisKind::Linear | AxisKind::Logarithmic => self.x_offset(index as f64),
        }
    }

    fn x_offset(&self, x: f64) -> Option<f64> {
        let range = self.category_range?;
        normalized(x, self.category_kind, range).map(|t| t * self.category_extent())
    }

    fn value_offset(&self, value: f64, slot: AxisSlot) -> Option<f64> {
        let (kind, range) = self.value_axis(slot)?;
        normalized(value, kind, range).map(|t| t * self.value_extent())
    }

    fn compose(&self, category_offset: f64, value_offset: f64) -> Point {
        if self.bar_oriented {
            Point::new(self.plot.left + value_offset, self.plot.top + category_offset)
        } else {
            Point::new(self.plot.left + category_offset, self.plot.bottom() - value_offset)
        }
    }

    /// Surface point of `value` in the category slot at `index`.
    #[must_use]
    pub fn map_category_value(&self, index: usize, value: f64, slot: AxisSlot) -> Option<Point> {
        let along_category = self.category_offset(index)?;
        let along_value = self.value_offset(value, slot)?;
        Some(self.compose(along_category, along_value))
    }

    /// Surface point of `(x, value)` on a numeric category axis.
    #[must_use]
    pub fn map_xy(&self, x: f64, value: f64, slot: AxisSlot) -> Option<Point> {
        let along_category = self.x_offset(x)?;
        let along_value = self.value_offset(value, slot)?;
        Some(self.compose(along_category, along_value))
    }

    /// Scalar surface coordinate of a category slot center: an x coordinate
    /// normally, a y coordinate in bar orientation.
    #[must_use]
    pub fn category_position(&self, index: usize) -> Option<f64> {
        self.category_offset(index).map(|offset| {
            if self.bar_oriented {
                self.plot.top + offset
            } else {
                self.plot.left + offset
            }
        })
    }

    /// Scalar surface coordinate of an explicit x value.
    #[must_use]
    pub fn x_position(&self, x: f64) -> Option<f64> {
        self.x_offset(x).map(|offset| {
            if self.bar_oriented {
                self.plot.top + offset
            } else {
                self.plot.left + offset
            }
        })
    }

    /// Scalar surface coordinate of a value on the given value axis: a y
    /// coordinate normally, an x coordinate in bar orientation.
    #[must_use]
    pub fn value_position(&self, value: f64, slot: AxisSlot) -> Option<f64> {
        self.value_offset(value, slot).map(|offset| {
            if self.bar_oriented {
                self.plot.left + offset
            } else {
                self.plot.bottom() - offset
            }
        })
    }

    /// Surface coordinate bars and areas grow from: zero clamped into the
    /// range, or the range minimum on a logarithmic axis.
    #[must_use]
    pub fn baseline_position(&self, slot: AxisSlot) -> Option<f64> {
        let (kind, range) = self.value_axis(slot)?;
        let baseline = match kind {
            AxisKind::Logarithmic => range.min,
            AxisKind::Linear | AxisKind::Categorical => 0.0_f64.clamp(range.min, range.max),
        };
        self.value_position(baseline, slot)
    }
}

fn validate_value_kind(kind: AxisKind, range: AxisRange) -> ChartResult<()> {
    if kind == AxisKind::Categorical {
        return Err(ChartError::InvalidData(
            "value axes must be linear or logarithmic".to_owned(),
        ));
    }
    range.validate_for(kind)
}

/// Position of `value` within `range` as a fraction; not clamped, so
/// out-of-range values land outside [0, 1] and are drawn outside the plot.
fn normalized(value: f64, kind: AxisKind, range: AxisRange) -> Option<f64> {
    if !kind.accepts(value) {
        return None;
    }
    match kind {
        AxisKind::Linear | AxisKind::Categorical => Some((value - range.min) / range.span()),
        AxisKind::Logarithmic => {
            let log_span = range.max.ln() - range.min.ln();
            Some((value.ln() - range.min.ln()) / log_span)
        }
    }
}
