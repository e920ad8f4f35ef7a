use proptest::prelude::*;
use statchart_rs::core::{ErrorBarConfig, ErrorBarKind};
use statchart_rs::legend::truncate_to_width;
use statchart_rs::overlay::{SamplePoint, TrendModel, error_bound, fit_linear, moving_average};
use statchart_rs::surface::{NullSurface, TextMeasurer};

proptest! {
    #[test]
    fn linear_fit_recovers_the_generating_line_property(
        slope in -100.0f64..100.0,
        intercept in -1_000.0f64..1_000.0,
        count in 3usize..40
    ) {
        let points: Vec<SamplePoint> = (0..count)
            .map(|i| {
                let x = i as f64;
                SamplePoint::new(x, intercept + slope * x)
            })
            .collect();

        let model = fit_linear(&points).expect("collinear points always fit");
        let TrendModel::Linear {
            slope: fitted_slope,
            intercept: fitted_intercept,
        } = model
        else {
            panic!("linear fit produced a non-linear model");
        };

        prop_assert!((fitted_slope - slope).abs() <= 1e-6 * (1.0 + slope.abs()));
        prop_assert!((fitted_intercept - intercept).abs() <= 1e-6 * (1.0 + intercept.abs()));
    }

    #[test]
    fn moving_average_window_count_property(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 0..200),
        period in 1usize..50
    ) {
        let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        let averaged = moving_average(&wrapped, period);

        if wrapped.len() < period {
            prop_assert!(averaged.is_empty());
        } else {
            prop_assert_eq!(averaged.len(), wrapped.len() - period + 1);
        }

        for (offset, slot) in averaged.iter().enumerate() {
            let window = &values[offset..offset + period];
            let low = window.iter().copied().fold(f64::INFINITY, f64::min);
            let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = slot.expect("fully populated windows always average");
            prop_assert!(mean >= low - 1e-9 && mean <= high + 1e-9);
        }
    }

    #[test]
    fn truncated_labels_always_fit_property(
        text in "[a-z ]{0,48}",
        max_width in 0.0f64..240.0,
        size_px in 8.0f64..24.0
    ) {
        let measurer = NullSurface::new();
        let truncated = truncate_to_width(&text, max_width, size_px, &measurer);

        prop_assert!(measurer.text_width(&truncated, size_px) <= max_width);
        if truncated != text {
            let stem = truncated
                .strip_suffix('…')
                .unwrap_or(truncated.as_str());
            prop_assert!(text.starts_with(stem));
        }
    }

    #[test]
    fn fixed_error_bounds_sit_symmetrically_property(
        value in -1_000_000.0f64..1_000_000.0,
        error in 0.001f64..1_000.0
    ) {
        let config = ErrorBarConfig::new(ErrorBarKind::Fixed, error);
        let bound = error_bound(value, &config, None).expect("finite inputs bound");

        prop_assert!(((bound.high - value) - (value - bound.low)).abs() <= 1e-9);
        prop_assert!(((bound.high - bound.low) - 2.0 * error).abs() <= 1e-9);
    }
}
