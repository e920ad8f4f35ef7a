//! Tick inputs for frame composition.
//!
//! Tick selection is the host's job; the composer only consumes the marks
//! handed to it. The helpers below cover the common case of evenly spaced
//! value ticks and one mark per category slot.

use crate::core::AxisRange;

pub const VALUE_AXIS_TARGET_SPACING_PX: f64 = 48.0;
pub const CATEGORY_AXIS_TARGET_SPACING_PX: f64 = 72.0;

/// One tick: the domain value it sits at plus its preformatted label.
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub value: f64,
    pub label: String,
}

impl TickMark {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Tick marks for one frame, one list per axis the chart may show.
///
/// `category` values are slot indices for categorical axes and domain x
/// values for numeric category axes; `primary`/`secondary` values live in
/// the matching [`AxisRange`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisTicks {
    pub category: Vec<TickMark>,
    pub primary: Vec<TickMark>,
    pub secondary: Vec<TickMark>,
}

impl AxisTicks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, ticks: Vec<TickMark>) -> Self {
        self.category = ticks;
        self
    }

    #[must_use]
    pub fn with_primary(mut self, ticks: Vec<TickMark>) -> Self {
        self.primary = ticks;
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, ticks: Vec<TickMark>) -> Self {
        self.secondary = ticks;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_empty() && self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Tick count a span supports at the given spacing, clamped to a range.
#[must_use]
pub fn tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Rounds a raw step up to the nearest 1, 2, 5 or 10 times a power of ten.
#[must_use]
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }

    let magnitude = 10.0_f64.powf(raw_step.log10().floor());
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return raw_step;
    }

    let normalized = raw_step / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn precision_from_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    let text = format!("{:.12}", step.abs());
    let Some((_, fraction)) = text.split_once('.') else {
        return 0;
    };
    fraction.trim_end_matches('0').len().clamp(0, 12)
}

/// Formats a tick value with just enough decimals for the given step.
#[must_use]
pub fn format_tick_label(value: f64, step: f64) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    let precision = precision_from_step(step);
    let text = format!("{value:.precision$}");
    if text == "-0" { "0".to_owned() } else { text }
}

/// Evenly spaced value ticks on a nice step covering `range`.
#[must_use]
pub fn linear_ticks(range: AxisRange, target_count: usize) -> Vec<TickMark> {
    let count = target_count.max(2);
    let step = nice_step(range.span() / (count - 1) as f64);
    let first = (range.min / step).ceil() * step;

    let mut ticks = Vec::new();
    let mut index = 0_u32;
    loop {
        let value = first + f64::from(index) * step;
        if value > range.max + step * 1e-9 {
            break;
        }
        ticks.push(TickMark::new(value, format_tick_label(value, step)));
        index += 1;
    }
    ticks
}

/// Decade ticks for a logarithmic range; endpoints when no power of ten
/// falls inside it.
#[must_use]
pub fn log_ticks(range: AxisRange) -> Vec<TickMark> {
    if range.min <= 0.0 {
        return Vec::new();
    }
    let start = range.min.log10().ceil() as i32;
    let end = range.max.log10().floor() as i32;
    if start > end {
        return vec![
            TickMark::new(range.min, format_tick_label(range.min, range.min)),
            TickMark::new(range.max, format_tick_label(range.max, range.max)),
        ];
    }

    (start..=end)
        .map(|exponent| {
            let value = 10.0_f64.powi(exponent);
            TickMark::new(value, format_tick_label(value, value))
        })
        .collect()
}

/// One mark per category slot; slots beyond the label list fall back to
/// their 1-based index.
#[must_use]
pub fn category_ticks(categories: &[String], count: usize) -> Vec<TickMark> {
    (0..count)
        .map(|index| {
            let label = categories
                .get(index)
                .cloned()
                .unwrap_or_else(|| (index + 1).to_string());
            TickMark::new(index as f64, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_step_snaps_to_the_ladder() {
        assert_eq!(nice_step(0.9), 1.0);
        assert_eq!(nice_step(1.7), 2.0);
        assert_eq!(nice_step(4.0), 5.0);
        assert_eq!(nice_step(8.0), 10.0);
        assert_eq!(nice_step(0.034), 0.05);
    }

    #[test]
    fn linear_ticks_cover_the_range_on_a_nice_step() {
        let range = AxisRange::new(0.0, 10.0).unwrap();
        let ticks = linear_ticks(range, 6);
        let values: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks[1].label, "2");
    }

    #[test]
    fn fractional_steps_format_with_matching_precision() {
        let range = AxisRange::new(0.0, 1.0).unwrap();
        let ticks = linear_ticks(range, 5);
        assert_eq!(ticks[1].label, "0.25");
    }

    #[test]
    fn log_ticks_mark_decades() {
        let range = AxisRange::new(0.5, 2000.0).unwrap();
        let values: Vec<f64> = log_ticks(range).iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![1.0, 10.0, 100.0, 1000.0]);
    }

    #[test]
    fn category_ticks_fall_back_to_indices() {
        let labels = vec!["Q1".to_owned(), "Q2".to_owned()];
        let ticks = category_ticks(&labels, 3);
        assert_eq!(ticks[0].label, "Q1");
        assert_eq!(ticks[2].label, "3");
        assert_eq!(ticks[2].value, 2.0);
    }

    #[test]
    fn target_count_scales_with_span() {
        assert_eq!(tick_target_count(480.0, VALUE_AXIS_TARGET_SPACING_PX, 2, 12), 11);
        assert_eq!(tick_target_count(-1.0, VALUE_AXIS_TARGET_SPACING_PX, 2, 12), 2);
    }
}
