use statchart_rs::core::{ErrorBarConfig, ErrorBarKind, Point};
use statchart_rs::overlay::{error_bar_strokes, error_bound, series_spread};

#[test]
fn ten_percent_error_on_fifty_spans_forty_five_to_fifty_five() {
    let config = ErrorBarConfig::new(ErrorBarKind::Percentage, 10.0);
    let bound = error_bound(50.0, &config, None).expect("bound");
    assert!((bound.low - 45.0).abs() < 1e-12);
    assert!((bound.high - 55.0).abs() < 1e-12);
}

#[test]
fn percentage_errors_scale_with_magnitude_not_sign() {
    let config = ErrorBarConfig::new(ErrorBarKind::Percentage, 20.0);
    let negative = error_bound(-10.0, &config, None).expect("bound");
    assert!((negative.low - -12.0).abs() < 1e-12);
    assert!((negative.high - -8.0).abs() < 1e-12);
}

#[test]
fn useless_error_amounts_skip_the_point() {
    assert!(error_bound(10.0, &ErrorBarConfig::new(ErrorBarKind::Fixed, 0.0), None).is_none());
    assert!(error_bound(10.0, &ErrorBarConfig::new(ErrorBarKind::Fixed, -2.0), None).is_none());
    assert!(
        error_bound(10.0, &ErrorBarConfig::new(ErrorBarKind::Fixed, f64::INFINITY), None)
            .is_none()
    );
    // zero magnitude gives a zero percentage error
    assert!(
        error_bound(0.0, &ErrorBarConfig::new(ErrorBarKind::Percentage, 10.0), None).is_none()
    );
    // the point itself must be placeable
    assert!(
        error_bound(f64::NAN, &ErrorBarConfig::new(ErrorBarKind::Fixed, 1.0), None).is_none()
    );
}

#[test]
fn spread_kinds_need_series_statistics() {
    let values: Vec<Option<f64>> = vec![Some(1.0), Some(3.0), None, Some(f64::NAN)];
    let spread = series_spread(&values);
    let spread_value = spread.expect("two valid values");
    // stddev of {1, 3} under the sample convention
    assert!((spread_value.stddev - 2.0_f64.sqrt()).abs() < 1e-12);
    assert!((spread_value.standard_error - 1.0).abs() < 1e-12);

    let config = ErrorBarConfig::new(ErrorBarKind::StandardDeviation, 2.0);
    let bound = error_bound(5.0, &config, spread).expect("bound");
    assert!((bound.high - (5.0 + 2.0 * 2.0_f64.sqrt())).abs() < 1e-12);

    let sem = ErrorBarConfig::new(ErrorBarKind::StandardError, 1.0);
    let bound = error_bound(5.0, &sem, spread).expect("bound");
    assert!((bound.low - 4.0).abs() < 1e-12);

    // without spread statistics both kinds skip
    assert!(error_bound(5.0, &config, None).is_none());
    assert!(series_spread(&[Some(7.0)]).is_none());
}

#[test]
fn vertical_bars_grow_horizontal_caps() {
    let strokes = error_bar_strokes(Point::new(20.0, 80.0), Point::new(20.0, 40.0), false, 8.0);
    assert_eq!(strokes.main.0, Point::new(20.0, 80.0));
    assert_eq!(strokes.main.1, Point::new(20.0, 40.0));
    for (start, end) in strokes.caps {
        assert!((start.y - end.y).abs() < 1e-12);
        assert!((end.x - start.x - 8.0).abs() < 1e-12);
    }
}

#[test]
fn horizontal_bars_grow_vertical_caps() {
    let strokes = error_bar_strokes(Point::new(10.0, 30.0), Point::new(60.0, 30.0), true, 6.0);
    for (start, end) in strokes.caps {
        assert!((start.x - end.x).abs() < 1e-12);
        assert!((end.y - start.y - 6.0).abs() < 1e-12);
    }
    // caps sit on the bound endpoints
    assert!((strokes.caps[0].0.x - 10.0).abs() < 1e-12);
    assert!((strokes.caps[1].0.x - 60.0).abs() < 1e-12);
}
