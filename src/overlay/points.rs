use crate::core::{AxisKind, SeriesData};

/// One fit sample in raw data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

impl SamplePoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Gathers the (x, y) samples a trend fit runs over.
///
/// The x coordinate comes from the explicit x channel when it is
/// length-consistent, otherwise from the zero-based index. Missing values and
/// values either axis kind cannot place are skipped point-by-point.
pub fn collect_fit_samples(
    series: &SeriesData,
    category_kind: AxisKind,
    value_kind: AxisKind,
    out: &mut Vec<SamplePoint>,
) {
    out.clear();
    let xs = series.explicit_x();
    for (index, value) in series.values.iter().enumerate() {
        let Some(y) = *value else {
            continue;
        };
        let x = match xs {
            Some(xs) => xs[index],
            None => index as f64,
        };
        if !category_kind.accepts(x) || !value_kind.accepts(y) {
            continue;
        }
        out.push(SamplePoint::new(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SeriesKind;

    #[test]
    fn gaps_and_non_finite_values_are_skipped() {
        let series = SeriesData::new(
            "s",
            SeriesKind::Line,
            vec![Some(1.0), None, Some(f64::NAN), Some(4.0)],
        );
        let mut out = Vec::new();
        collect_fit_samples(&series, AxisKind::Categorical, AxisKind::Linear, &mut out);
        assert_eq!(out, vec![SamplePoint::new(0.0, 1.0), SamplePoint::new(3.0, 4.0)]);
    }

    #[test]
    fn explicit_x_channel_is_used_when_consistent() {
        let series = SeriesData::from_values("s", SeriesKind::Scatter, &[5.0, 6.0])
            .with_x_values(vec![100.0, 200.0]);
        let mut out = Vec::new();
        collect_fit_samples(&series, AxisKind::Linear, AxisKind::Linear, &mut out);
        assert_eq!(out[0].x, 100.0);
        assert_eq!(out[1].x, 200.0);
    }

    #[test]
    fn logarithmic_value_axis_drops_non_positive_values() {
        let series = SeriesData::from_values("s", SeriesKind::Line, &[1.0, 0.0, -2.0, 8.0]);
        let mut out = Vec::new();
        collect_fit_samples(&series, AxisKind::Categorical, AxisKind::Logarithmic, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], SamplePoint::new(3.0, 8.0));
    }

    #[test]
    fn output_buffer_is_cleared_first() {
        let series = SeriesData::from_values("s", SeriesKind::Line, &[1.0]);
        let mut out = vec![SamplePoint::new(9.0, 9.0)];
        collect_fit_samples(&series, AxisKind::Categorical, AxisKind::Linear, &mut out);
        assert_eq!(out, vec![SamplePoint::new(0.0, 1.0)]);
    }
}
