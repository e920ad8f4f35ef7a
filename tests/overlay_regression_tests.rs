use statchart_rs::core::{
    AxisKind, AxisRange, AxisSlot, PlotMapper, Rect, SeriesData, SeriesKind, TrendlineConfig,
    TrendlineKind,
};
use statchart_rs::overlay::{
    CurveDomain, MAX_CURVE_SAMPLES, MIN_CURVE_SAMPLES, SamplePoint, TrendModel,
    collect_fit_samples, fit_trend_model, moving_average, moving_average_path, sample_trend_path,
};
use statchart_rs::surface::PathCmd;

fn linear_mapper(categories: usize) -> PlotMapper {
    PlotMapper::new(
        Rect::new(0.0, 0.0, 80.0, 100.0),
        AxisRange::new(0.0, 10.0).expect("range"),
        categories,
    )
    .expect("mapper")
}

#[test]
fn linear_fit_runs_over_collected_samples() {
    let series = SeriesData::new(
        "trend",
        SeriesKind::Line,
        vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)],
    )
    .with_trendline(TrendlineConfig::new(TrendlineKind::Linear));

    let mut samples = Vec::new();
    collect_fit_samples(&series, AxisKind::Categorical, AxisKind::Linear, &mut samples);
    // the gap at index 2 is skipped, the x coordinates stay index-based
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[2], SamplePoint::new(3.0, 4.0));

    let model = fit_trend_model(&samples, &series.trendlines[0]).expect("linear fit");
    let TrendModel::Linear { slope, intercept } = model else {
        panic!("expected a linear model");
    };
    assert!((slope - 1.0).abs() < 1e-9);
    assert!((intercept - 1.0).abs() < 1e-9);
}

#[test]
fn exponential_fit_drops_non_positive_values() {
    let mut samples: Vec<SamplePoint> = (0..5)
        .map(|i| {
            let x = f64::from(i);
            SamplePoint::new(x, 3.0 * (0.4 * x).exp())
        })
        .collect();
    samples.push(SamplePoint::new(5.0, 0.0));
    samples.push(SamplePoint::new(6.0, -2.0));

    let config = TrendlineConfig::new(TrendlineKind::Exponential);
    let Some(TrendModel::Exponential { slope, intercept }) = fit_trend_model(&samples, &config)
    else {
        panic!("expected an exponential model");
    };
    assert!((slope - 0.4).abs() < 1e-9);
    assert!((intercept.exp() - 3.0).abs() < 1e-9);
}

#[test]
fn logarithmic_fit_drops_non_positive_x() {
    let mut samples: Vec<SamplePoint> = [1.0_f64, 2.0, 3.0, 4.0]
        .iter()
        .map(|x| SamplePoint::new(*x, 2.0 + 5.0 * x.ln()))
        .collect();
    samples.push(SamplePoint::new(0.0, 99.0));
    samples.push(SamplePoint::new(-1.0, 99.0));

    let config = TrendlineConfig::new(TrendlineKind::Logarithmic);
    let Some(TrendModel::Logarithmic { slope, intercept }) = fit_trend_model(&samples, &config)
    else {
        panic!("expected a logarithmic model");
    };
    assert!((slope - 5.0).abs() < 1e-9);
    assert!((intercept - 2.0).abs() < 1e-9);
}

#[test]
fn power_fit_needs_the_positive_quadrant() {
    let mut samples: Vec<SamplePoint> = [1.0_f64, 2.0, 3.0]
        .iter()
        .map(|x| SamplePoint::new(*x, 2.0 * x * x))
        .collect();
    samples.push(SamplePoint::new(0.0, 0.0));

    let config = TrendlineConfig::new(TrendlineKind::Power);
    let Some(TrendModel::Power {
        coefficient,
        exponent,
    }) = fit_trend_model(&samples, &config)
    else {
        panic!("expected a power model");
    };
    assert!((coefficient - 2.0).abs() < 1e-9);
    assert!((exponent - 2.0).abs() < 1e-9);

    // with every point outside the positive quadrant nothing is fittable
    let dark = [SamplePoint::new(-1.0, -1.0), SamplePoint::new(-2.0, -4.0)];
    assert!(fit_trend_model(&dark, &config).is_none());
}

#[test]
fn polynomial_config_recovers_a_quadratic() {
    let config = TrendlineConfig::new(TrendlineKind::Polynomial).with_polynomial_order(2);
    let samples: Vec<SamplePoint> = [-2.0_f64, -1.0, 0.0, 1.0, 2.0]
        .iter()
        .map(|x| SamplePoint::new(*x, 2.0 * x * x + 3.0 * x + 1.0))
        .collect();

    let model = fit_trend_model(&samples, &config).expect("polynomial fit");
    // evaluate well outside the sample grid: 2*100 + 30 + 1
    assert!((model.evaluate(10.0) - 231.0).abs() < 1e-6);
}

#[test]
fn degenerate_inputs_never_produce_a_model() {
    let linear = TrendlineConfig::new(TrendlineKind::Linear);
    let vertical: Vec<SamplePoint> = (0..4).map(|i| SamplePoint::new(3.0, f64::from(i))).collect();
    assert!(fit_trend_model(&vertical, &linear).is_none());
    assert!(fit_trend_model(&[SamplePoint::new(1.0, 1.0)], &linear).is_none());
    assert!(fit_trend_model(&[], &linear).is_none());

    // a cubic over two points is underdetermined
    let cubic = TrendlineConfig::new(TrendlineKind::Polynomial).with_polynomial_order(3);
    let few = [SamplePoint::new(0.0, 0.0), SamplePoint::new(1.0, 1.0)];
    assert!(fit_trend_model(&few, &cubic).is_none());

    // coincident points make the normal equations singular
    let squared = TrendlineConfig::new(TrendlineKind::Polynomial).with_polynomial_order(2);
    let coincident = vec![SamplePoint::new(1.0, 2.0); 5];
    assert!(fit_trend_model(&coincident, &squared).is_none());
}

#[test]
fn moving_average_pipeline_places_means_at_window_ends() {
    let values: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
    let means = moving_average(&values, 2);
    assert_eq!(means, vec![Some(3.0), Some(5.0), Some(7.0)]);

    let path = moving_average_path(&means, 2, None, &linear_mapper(4), AxisSlot::Primary);
    assert_eq!(path.vertex_count(), 3);
    // the first mean belongs to index 1: the center of slot 1 of 4 at width 80
    let PathCmd::MoveTo(first) = path.commands()[0] else {
        panic!("expected MoveTo");
    };
    assert!((first.x - 30.0).abs() < 1e-9);
}

#[test]
fn moving_average_counts_shrink_with_the_window() {
    let values: Vec<Option<f64>> = (1..=6).map(|i| Some(f64::from(i))).collect();
    assert_eq!(moving_average(&values, 1).len(), 6);
    assert_eq!(moving_average(&values, 4).len(), 3);
    assert_eq!(moving_average(&values, 6).len(), 1);
    assert!(moving_average(&values, 7).is_empty());
    assert!(moving_average(&values, 0).is_empty());
}

#[test]
fn sampled_curves_respect_the_budget() {
    let samples = [
        SamplePoint::new(0.0, 1.0),
        SamplePoint::new(50.0, 3.0),
        SamplePoint::new(100.0, 5.0),
    ];
    let config = TrendlineConfig::new(TrendlineKind::Linear);
    let model = fit_trend_model(&samples, &config).expect("fit");
    let domain = CurveDomain::explicit_from_samples(&samples).expect("domain");

    let mapper = PlotMapper::new(
        Rect::new(0.0, 0.0, 200.0, 100.0),
        AxisRange::new(0.0, 10.0).expect("range"),
        0,
    )
    .expect("mapper")
    .with_category_axis(AxisKind::Linear, Some(AxisRange::new(0.0, 100.0).expect("range")))
    .expect("category axis");

    // three data points still sample at the curve floor
    let path = sample_trend_path(&model, domain, &mapper, AxisSlot::Primary);
    assert_eq!(path.vertex_count(), MIN_CURVE_SAMPLES);

    let dense = CurveDomain::ExplicitX {
        min_x: 0.0,
        max_x: 100.0,
        point_count: 50_000,
    };
    let path = sample_trend_path(&model, dense, &mapper, AxisSlot::Primary);
    assert_eq!(path.vertex_count(), MAX_CURVE_SAMPLES);
}

#[test]
fn indexed_curves_evaluate_once_per_category_slot() {
    let model = TrendModel::Linear {
        slope: 0.5,
        intercept: 2.0,
    };
    let path = sample_trend_path(
        &model,
        CurveDomain::Indexed { count: 6 },
        &linear_mapper(6),
        AxisSlot::Primary,
    );
    assert_eq!(path.vertex_count(), 6);
}
