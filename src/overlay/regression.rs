use smallvec::SmallVec;
use tracing::trace;

use crate::core::{TrendlineConfig, TrendlineKind};

use super::SamplePoint;

/// Pivot and denominator magnitudes below this are treated as singular.
const SINGULARITY_EPSILON: f64 = 1e-12;

pub const MIN_POLYNOMIAL_ORDER: u32 = 2;
pub const MAX_POLYNOMIAL_ORDER: u32 = 6;

/// Fitted trend model, evaluated in raw data space.
///
/// Log-linearized models keep their transformed-space coefficients, so
/// evaluation can leave the model's domain (for example `ln x` at `x <= 0`);
/// such predictions come back non-finite and downstream mapping drops them.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendModel {
    /// `y = intercept + slope * x`
    Linear { slope: f64, intercept: f64 },
    /// `y = exp(intercept + slope * x)`
    Exponential { slope: f64, intercept: f64 },
    /// `y = intercept + slope * ln x`
    Logarithmic { slope: f64, intercept: f64 },
    /// `y = coefficient * x ^ exponent`
    Power { coefficient: f64, exponent: f64 },
    /// Coefficients in ascending power order.
    Polynomial { coefficients: SmallVec<[f64; 7]> },
}

impl TrendModel {
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Linear { slope, intercept } => intercept + slope * x,
            Self::Exponential { slope, intercept } => (intercept + slope * x).exp(),
            Self::Logarithmic { slope, intercept } => intercept + slope * x.ln(),
            Self::Power {
                coefficient,
                exponent,
            } => coefficient * x.powf(*exponent),
            Self::Polynomial { coefficients } => coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, coefficient| acc * x + coefficient),
        }
    }
}

struct OlsFit {
    slope: f64,
    intercept: f64,
}

/// Ordinary least squares over an already-transformed point stream.
///
/// `None` when fewer than two points remain or the x variance collapses.
fn ols(points: impl Iterator<Item = (f64, f64)>) -> Option<OlsFit> {
    let mut n = 0.0_f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for (x, y) in points {
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }
    if n < 2.0 {
        return None;
    }
    let denominator = n * sum_xx - sum_x * sum_x;
    if !denominator.is_finite() || denominator.abs() < SINGULARITY_EPSILON {
        trace!(denominator, "least-squares fit degenerate");
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope.is_finite() && intercept.is_finite()).then_some(OlsFit { slope, intercept })
}

#[must_use]
pub fn fit_linear(points: &[SamplePoint]) -> Option<TrendModel> {
    ols(points.iter().map(|p| (p.x, p.y))).map(|fit| TrendModel::Linear {
        slope: fit.slope,
        intercept: fit.intercept,
    })
}

/// Log-linearized exponential fit over (x, ln y); points with `y <= 0` are
/// excluded before fitting.
#[must_use]
pub fn fit_exponential(points: &[SamplePoint]) -> Option<TrendModel> {
    ols(points
        .iter()
        .filter(|p| p.y > 0.0)
        .map(|p| (p.x, p.y.ln())))
    .map(|fit| TrendModel::Exponential {
        slope: fit.slope,
        intercept: fit.intercept,
    })
}

/// Fit over (ln x, y); points with `x <= 0` are excluded before fitting.
#[must_use]
pub fn fit_logarithmic(points: &[SamplePoint]) -> Option<TrendModel> {
    ols(points
        .iter()
        .filter(|p| p.x > 0.0)
        .map(|p| (p.x.ln(), p.y)))
    .map(|fit| TrendModel::Logarithmic {
        slope: fit.slope,
        intercept: fit.intercept,
    })
}

/// Fit over (ln x, ln y); points outside the positive quadrant are excluded
/// before fitting.
#[must_use]
pub fn fit_power(points: &[SamplePoint]) -> Option<TrendModel> {
    ols(points
        .iter()
        .filter(|p| p.x > 0.0 && p.y > 0.0)
        .map(|p| (p.x.ln(), p.y.ln())))
    .map(|fit| TrendModel::Power {
        coefficient: fit.intercept.exp(),
        exponent: fit.slope,
    })
}

/// Least-squares polynomial fit via the normal equations.
///
/// The requested order is clamped to the supported range, and the fit needs
/// at least `order + 1` points. A near-singular system yields `None`.
#[must_use]
pub fn fit_polynomial(points: &[SamplePoint], order: u32) -> Option<TrendModel> {
    let order = order.clamp(MIN_POLYNOMIAL_ORDER, MAX_POLYNOMIAL_ORDER) as usize;
    if points.len() < order + 1 {
        return None;
    }
    let size = order + 1;

    // Power sums up to x^(2*order) and the y moments.
    let mut power_sums = [0.0_f64; 2 * MAX_POLYNOMIAL_ORDER as usize + 1];
    let mut moments = [0.0_f64; MAX_POLYNOMIAL_ORDER as usize + 1];
    for point in points {
        let mut x_power = 1.0;
        for exponent in 0..=(2 * order) {
            power_sums[exponent] += x_power;
            if exponent < size {
                moments[exponent] += x_power * point.y;
            }
            x_power *= point.x;
        }
    }

    let mut matrix: SmallVec<[SmallVec<[f64; 8]>; 7]> = SmallVec::new();
    for row in 0..size {
        let mut augmented_row: SmallVec<[f64; 8]> = SmallVec::new();
        for column in 0..size {
            augmented_row.push(power_sums[row + column]);
        }
        augmented_row.push(moments[row]);
        matrix.push(augmented_row);
    }

    let coefficients = gauss_jordan(&mut matrix, size)?;
    coefficients
        .iter()
        .all(|coefficient| coefficient.is_finite())
        .then_some(TrendModel::Polynomial { coefficients })
}

/// Gauss-Jordan elimination with partial pivoting over an augmented matrix.
fn gauss_jordan(matrix: &mut [SmallVec<[f64; 8]>], size: usize) -> Option<SmallVec<[f64; 7]>> {
    for pivot in 0..size {
        let mut best = pivot;
        for row in (pivot + 1)..size {
            if matrix[row][pivot].abs() > matrix[best][pivot].abs() {
                best = row;
            }
        }
        if best != pivot {
            matrix.swap(pivot, best);
        }
        let lead = matrix[pivot][pivot];
        if !lead.is_finite() || lead.abs() < SINGULARITY_EPSILON {
            trace!(pivot, lead, "polynomial normal equations singular");
            return None;
        }
        for column in pivot..=size {
            matrix[pivot][column] /= lead;
        }
        for row in 0..size {
            if row == pivot {
                continue;
            }
            let factor = matrix[row][pivot];
            if factor == 0.0 {
                continue;
            }
            for column in pivot..=size {
                matrix[row][column] -= factor * matrix[pivot][column];
            }
        }
    }
    Some(matrix.iter().map(|row| row[size]).collect())
}

/// Trailing-window means over a value sequence, one slot per complete
/// window.
///
/// With `n` values and period `p` the result has `n - p + 1` slots (empty
/// when `n < p` or `p == 0`). A window whose valid values were all missing
/// or non-finite yields `None`, which downstream path building turns into a
/// gap; partially valid windows average what is present.
#[must_use]
pub fn moving_average(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len() - period + 1);
    for end in period..=values.len() {
        let window = &values[end - period..end];
        let mut sum = 0.0;
        let mut count = 0_usize;
        for value in window.iter().flatten() {
            if value.is_finite() {
                sum += value;
                count += 1;
            }
        }
        out.push((count > 0).then(|| sum / count as f64));
    }
    out
}

/// Fits the model family named by `config`; `None` when the data cannot
/// support it. Moving averages are windowed per index rather than fitted and
/// are handled by the caller.
#[must_use]
pub fn fit_trend_model(points: &[SamplePoint], config: &TrendlineConfig) -> Option<TrendModel> {
    match config.kind {
        TrendlineKind::Linear => fit_linear(points),
        TrendlineKind::Exponential => fit_exponential(points),
        TrendlineKind::Logarithmic => fit_logarithmic(points),
        TrendlineKind::Power => fit_power(points),
        TrendlineKind::Polynomial => fit_polynomial(points, config.polynomial_order),
        TrendlineKind::MovingAverage => None,
    }
}
