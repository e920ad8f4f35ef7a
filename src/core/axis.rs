use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Mapping mode of one chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisKind {
    /// Uniform spacing in raw data units.
    #[default]
    Linear,
    /// Uniform spacing in natural-log units (all values must be > 0).
    Logarithmic,
    /// Discrete slots addressed by zero-based category index.
    Categorical,
}

impl AxisKind {
    /// Returns whether `value` can be placed on an axis of this kind.
    ///
    /// Values failing this check are dropped point-by-point; they never abort
    /// a whole computation.
    #[must_use]
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Self::Linear | Self::Categorical => value.is_finite(),
            Self::Logarithmic => value.is_finite() && value > 0.0,
        }
    }
}

/// Which value axis a series is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisSlot {
    #[default]
    Primary,
    Secondary,
}

/// Closed min/max domain of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ChartError::InvalidData(
                "axis range must be finite with min < max".to_owned(),
            ));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    /// Validates the range against the mapping mode it will be used with.
    pub fn validate_for(self, kind: AxisKind) -> ChartResult<()> {
        if kind == AxisKind::Logarithmic && self.min <= 0.0 {
            return Err(ChartError::InvalidData(
                "logarithmic axis range requires min > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisKind, AxisRange};

    #[test]
    fn log_axis_rejects_non_positive_values() {
        assert!(AxisKind::Logarithmic.accepts(0.5));
        assert!(!AxisKind::Logarithmic.accepts(0.0));
        assert!(!AxisKind::Logarithmic.accepts(-3.0));
        assert!(!AxisKind::Logarithmic.accepts(f64::NAN));
        assert!(AxisKind::Linear.accepts(-3.0));
    }

    #[test]
    fn range_requires_ordered_finite_endpoints() {
        assert!(AxisRange::new(0.0, 1.0).is_ok());
        assert!(AxisRange::new(1.0, 1.0).is_err());
        assert!(AxisRange::new(2.0, 1.0).is_err());
        assert!(AxisRange::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn log_range_needs_positive_min() {
        let range = AxisRange::new(-1.0, 10.0).expect("valid range");
        assert!(range.validate_for(AxisKind::Logarithmic).is_err());
        assert!(range.validate_for(AxisKind::Linear).is_ok());
    }
}
