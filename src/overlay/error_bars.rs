use crate::core::{ErrorBarConfig, ErrorBarKind, Point};

/// Low/high bound of one error bar in raw value space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBound {
    pub low: f64,
    pub high: f64,
}

/// Spread statistics shared by every point of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSpread {
    pub stddev: f64,
    pub standard_error: f64,
}

/// Sample standard deviation (n - 1 denominator) over the valid values of a
/// series; `None` with fewer than two valid values.
#[must_use]
pub fn series_spread(values: &[Option<f64>]) -> Option<SeriesSpread> {
    let mut count = 0_usize;
    let mut sum = 0.0;
    for value in values.iter().flatten() {
        if value.is_finite() {
            count += 1;
            sum += value;
        }
    }
    if count < 2 {
        return None;
    }
    let mean = sum / count as f64;
    let mut squared = 0.0;
    for value in values.iter().flatten() {
        if value.is_finite() {
            squared += (value - mean) * (value - mean);
        }
    }
    let stddev = (squared / (count as f64 - 1.0)).sqrt();
    Some(SeriesSpread {
        stddev,
        standard_error: stddev / (count as f64).sqrt(),
    })
}

/// Error bound for one point value.
///
/// `None` when the point itself is not finite or the derived error amount is
/// not finite and positive; such points simply get no bar.
#[must_use]
pub fn error_bound(
    value: f64,
    config: &ErrorBarConfig,
    spread: Option<SeriesSpread>,
) -> Option<ErrorBound> {
    if !value.is_finite() {
        return None;
    }
    let error = match config.kind {
        ErrorBarKind::Fixed => config.value,
        ErrorBarKind::Percentage => value.abs() * config.value / 100.0,
        ErrorBarKind::StandardDeviation => spread?.stddev * config.value,
        ErrorBarKind::StandardError => spread?.standard_error * config.value,
    };
    if !error.is_finite() || error <= 0.0 {
        return None;
    }
    Some(ErrorBound {
        low: value - error,
        high: value + error,
    })
}

/// Stroke geometry of one error bar: the main segment plus two perpendicular
/// caps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBarStrokes {
    pub main: (Point, Point),
    pub caps: [(Point, Point); 2],
}

/// Builds the strokes between two already-mapped bound endpoints.
/// `horizontal` selects bar-chart orientation, where the main segment runs
/// horizontally and the caps become vertical strokes.
#[must_use]
pub fn error_bar_strokes(
    low: Point,
    high: Point,
    horizontal: bool,
    cap_length: f64,
) -> ErrorBarStrokes {
    let half = cap_length * 0.5;
    let cap = |at: Point| {
        if horizontal {
            (Point::new(at.x, at.y - half), Point::new(at.x, at.y + half))
        } else {
            (Point::new(at.x - half, at.y), Point::new(at.x + half, at.y))
        }
    };
    ErrorBarStrokes {
        main: (low, high),
        caps: [cap(low), cap(high)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn percentage_error_scales_with_magnitude() {
        let config = ErrorBarConfig::new(ErrorBarKind::Percentage, 10.0);
        let bound = error_bound(50.0, &config, None).unwrap();
        assert_relative_eq!(bound.low, 45.0);
        assert_relative_eq!(bound.high, 55.0);

        // magnitude, not sign, drives the amount
        let negative = error_bound(-50.0, &config, None).unwrap();
        assert_relative_eq!(negative.low, -55.0);
        assert_relative_eq!(negative.high, -45.0);
    }

    #[test]
    fn non_positive_error_amounts_are_skipped() {
        let zero = ErrorBarConfig::new(ErrorBarKind::Fixed, 0.0);
        assert!(error_bound(10.0, &zero, None).is_none());

        let negative = ErrorBarConfig::new(ErrorBarKind::Fixed, -3.0);
        assert!(error_bound(10.0, &negative, None).is_none());

        let nan = ErrorBarConfig::new(ErrorBarKind::Fixed, f64::NAN);
        assert!(error_bound(10.0, &nan, None).is_none());

        let percentage = ErrorBarConfig::new(ErrorBarKind::Percentage, 10.0);
        assert!(error_bound(0.0, &percentage, None).is_none());
    }

    #[test]
    fn spread_uses_sample_denominator() {
        let values: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(5.0), Some(5.0), Some(7.0), Some(9.0)];
        let spread = series_spread(&values).unwrap();
        // squared deviations sum to 32; 32 / 7 under the sample convention
        assert_relative_eq!(spread.stddev, (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(
            spread.standard_error,
            spread.stddev / 8.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn spread_needs_two_valid_values() {
        assert!(series_spread(&[Some(1.0)]).is_none());
        assert!(series_spread(&[Some(1.0), None, Some(f64::NAN)]).is_none());
        assert!(series_spread(&[Some(1.0), Some(2.0)]).is_some());
    }

    #[test]
    fn stddev_kind_applies_the_multiplier() {
        let values: Vec<Option<f64>> = vec![Some(1.0), Some(3.0)];
        let spread = series_spread(&values);
        let config = ErrorBarConfig::new(ErrorBarKind::StandardDeviation, 2.0);
        let bound = error_bound(2.0, &config, spread).unwrap();
        // stddev of {1, 3} is sqrt(2), doubled
        assert_relative_eq!(bound.high - 2.0, 2.0 * 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn caps_run_perpendicular_to_the_bar() {
        let strokes = error_bar_strokes(
            Point::new(10.0, 30.0),
            Point::new(10.0, 10.0),
            false,
            6.0,
        );
        let (cap_start, cap_end) = strokes.caps[0];
        assert_relative_eq!(cap_start.y, cap_end.y);
        assert_relative_eq!(cap_end.x - cap_start.x, 6.0);

        let horizontal = error_bar_strokes(
            Point::new(10.0, 30.0),
            Point::new(40.0, 30.0),
            true,
            6.0,
        );
        let (cap_start, cap_end) = horizontal.caps[0];
        assert_relative_eq!(cap_start.x, cap_end.x);
        assert_relative_eq!(cap_end.y - cap_start.y, 6.0);
    }
}
