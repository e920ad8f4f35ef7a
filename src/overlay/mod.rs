//! Statistical overlays derived from raw series data: trend fits, moving
//! averages, and error bars.
//!
//! Everything here is pure math over slices; drawing and caching happen in
//! the composition layer. Fits that the data cannot support return `None`
//! rather than an error, so a bad overlay quietly disappears instead of
//! failing the frame. Kind eligibility lives on
//! [`SeriesKind::supports_overlays`](crate::core::SeriesKind::supports_overlays).

mod curve;
mod error_bars;
mod points;
mod regression;

pub use curve::{
    CurveDomain, MAX_CURVE_SAMPLES, MIN_CURVE_SAMPLES, moving_average_path, sample_trend_path,
};
pub use error_bars::{
    ErrorBarStrokes, ErrorBound, SeriesSpread, error_bar_strokes, error_bound, series_spread,
};
pub use points::{SamplePoint, collect_fit_samples};
pub use regression::{
    MAX_POLYNOMIAL_ORDER, MIN_POLYNOMIAL_ORDER, TrendModel, fit_exponential, fit_linear,
    fit_logarithmic, fit_polynomial, fit_power, fit_trend_model, moving_average,
};
