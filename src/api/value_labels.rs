//! Per-segment value labels with placement rectangles.
//!
//! Placements are kept alongside the recording so hosts can hit-test or
//! collide labels without replaying the scene.

use crate::core::{ChartStyle, PlotMapper, Point, Rect, SeriesData};
use crate::surface::{Paint, RecordedScene, Surface, TextAlign, TextMeasurer, record_scene};

const LABEL_LINE_HEIGHT_FACTOR: f64 = 1.2;

fn format_value_label(value: f64) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1.0e9 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Records the value labels of one series: above each point, or trailing it
/// in bar orientation. `None` when labels are disabled or nothing is
/// placeable.
pub(super) fn record_value_label_segment(
    series: &SeriesData,
    style: &ChartStyle,
    mapper: &PlotMapper,
    measurer: &dyn TextMeasurer,
) -> Option<(RecordedScene, Vec<Rect>)> {
    let labels = &style.value_labels;
    if !labels.visible {
        return None;
    }
    let xs = series.explicit_x();
    let slot = series.axis;
    let height = labels.font_size * LABEL_LINE_HEIGHT_FACTOR;
    let mut texts: Vec<(String, Point, TextAlign)> = Vec::new();
    let mut placements: Vec<Rect> = Vec::new();

    for (index, value) in series.values.iter().enumerate() {
        let Some(value) = *value else {
            continue;
        };
        let point = match xs {
            Some(xs) => mapper.map_xy(xs[index], value, slot),
            None => mapper.map_category_value(index, value, slot),
        };
        let Some(point) = point else {
            continue;
        };
        let text = format_value_label(value);
        let width = measurer.text_width(&text, labels.font_size);
        let (origin, align, rect) = if mapper.is_bar_oriented() {
            let origin = Point::new(point.x + labels.offset, point.y - height / 2.0);
            (
                origin,
                TextAlign::Left,
                Rect::new(origin.x, origin.y, width, height),
            )
        } else {
            let origin = Point::new(point.x, point.y - labels.offset - height);
            (
                origin,
                TextAlign::Center,
                Rect::new(point.x - width / 2.0, origin.y, width, height),
            )
        };
        texts.push((text, origin, align));
        placements.push(rect);
    }
    if placements.is_empty() {
        return None;
    }

    let paint = Paint::fill(labels.color);
    let scene = record_scene(|recorder| {
        for (text, origin, align) in &texts {
            recorder.draw_text(text, *origin, labels.font_size, *align, &paint);
        }
    });
    Some((scene, placements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AxisRange, SeriesKind};
    use crate::surface::NullSurface;

    fn mapper() -> PlotMapper {
        PlotMapper::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            AxisRange::new(0.0, 10.0).unwrap(),
            2,
        )
        .unwrap()
    }

    fn labeled_style() -> ChartStyle {
        let mut style = ChartStyle::default();
        style.value_labels.visible = true;
        style
    }

    #[test]
    fn integers_format_without_decimals() {
        assert_eq!(format_value_label(5.0), "5");
        assert_eq!(format_value_label(-2.0), "-2");
        assert_eq!(format_value_label(2.5), "2.5");
        assert_eq!(format_value_label(2.25), "2.25");
    }

    #[test]
    fn labels_follow_valid_points_only() {
        let series = SeriesData::new("s", SeriesKind::Line, vec![Some(4.0), None]);
        let measurer = NullSurface::new();
        let (scene, placements) =
            record_value_label_segment(&series, &labeled_style(), &mapper(), &measurer).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(placements.len(), 1);
        // centered on the slot at x 25, above the point at y 60
        let rect = placements[0];
        assert_eq!(rect.center_x(), 25.0);
        assert!(rect.bottom() <= 60.0);
    }

    #[test]
    fn disabled_labels_record_nothing() {
        let series = SeriesData::from_values("s", SeriesKind::Line, &[4.0]);
        let measurer = NullSurface::new();
        let result =
            record_value_label_segment(&series, &ChartStyle::default(), &mapper(), &measurer);
        assert!(result.is_none());
    }
}
