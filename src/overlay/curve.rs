use crate::core::{AxisSlot, PlotMapper};
use crate::surface::{Path, PathBuilder};

use super::{SamplePoint, TrendModel};

pub const MIN_CURVE_SAMPLES: usize = 8;
pub const MAX_CURVE_SAMPLES: usize = 128;

/// X domain a fitted curve is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveDomain {
    /// One evaluation per category index.
    Indexed { count: usize },
    /// Evenly spaced evaluations across an explicit x span; the sample
    /// count tracks the series point count within a clamped range.
    ExplicitX {
        min_x: f64,
        max_x: f64,
        point_count: usize,
    },
}

impl CurveDomain {
    /// Explicit-x domain covering the sampled span; `None` when no samples
    /// remain.
    #[must_use]
    pub fn explicit_from_samples(samples: &[SamplePoint]) -> Option<Self> {
        let first = samples.first()?;
        let mut min_x = first.x;
        let mut max_x = first.x;
        for sample in samples {
            min_x = min_x.min(sample.x);
            max_x = max_x.max(sample.x);
        }
        Some(Self::ExplicitX {
            min_x,
            max_x,
            point_count: samples.len(),
        })
    }
}

/// Samples `model` across `domain` and maps the predictions into surface
/// space. Predictions the mapper rejects become path gaps, never zeros, so a
/// curve leaving its domain breaks visibly instead of collapsing onto an
/// axis.
#[must_use]
pub fn sample_trend_path(
    model: &TrendModel,
    domain: CurveDomain,
    mapper: &PlotMapper,
    slot: AxisSlot,
) -> Path {
    let mut builder = PathBuilder::new();
    match domain {
        CurveDomain::Indexed { count } => {
            for index in 0..count {
                let predicted = model.evaluate(index as f64);
                builder.push_or_gap(mapper.map_category_value(index, predicted, slot));
            }
        }
        CurveDomain::ExplicitX {
            min_x,
            max_x,
            point_count,
        } => {
            let span = max_x - min_x;
            if !span.is_finite() || span <= 0.0 {
                let predicted = model.evaluate(min_x);
                builder.push_or_gap(mapper.map_xy(min_x, predicted, slot));
            } else {
                let steps = point_count.clamp(MIN_CURVE_SAMPLES, MAX_CURVE_SAMPLES);
                for step in 0..steps {
                    let x = min_x + span * step as f64 / (steps - 1) as f64;
                    let predicted = model.evaluate(x);
                    builder.push_or_gap(mapper.map_xy(x, predicted, slot));
                }
            }
        }
    }
    builder.build()
}

/// Maps trailing-window means onto the plot; the i-th mean belongs to the
/// data index `period - 1 + i`. Empty windows become path gaps.
#[must_use]
pub fn moving_average_path(
    window_means: &[Option<f64>],
    period: usize,
    x_values: Option<&[f64]>,
    mapper: &PlotMapper,
    slot: AxisSlot,
) -> Path {
    let mut builder = PathBuilder::new();
    for (offset, mean) in window_means.iter().enumerate() {
        let index = period - 1 + offset;
        let point = mean.and_then(|value| match x_values {
            Some(xs) if index < xs.len() => mapper.map_xy(xs[index], value, slot),
            Some(_) | None => mapper.map_category_value(index, value, slot),
        });
        builder.push_or_gap(point);
    }
    builder.build()
}
