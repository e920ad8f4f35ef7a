//! Recorded scenes for the axes layer and the axis text layer.
//!
//! Both layers read tick positions through the mapper, so bar orientation
//! swaps grid directions and label edges without any special casing here.

use crate::core::{AxisKind, AxisSlot, ChartStyle, PlotMapper, Point};
use crate::surface::{Paint, RecordedScene, Surface, TextAlign, record_scene};

use super::ticks::AxisTicks;

const TICK_TEXT_GAP: f64 = 2.0;

/// Surface coordinate of a category tick: slot index for categorical axes,
/// domain x otherwise.
fn category_tick_position(mapper: &PlotMapper, tick_value: f64) -> Option<f64> {
    match mapper.category_kind() {
        AxisKind::Categorical => {
            if tick_value < 0.0 {
                return None;
            }
            mapper.category_position(tick_value.round() as usize)
        }
        AxisKind::Linear | AxisKind::Logarithmic => mapper.x_position(tick_value),
    }
}

/// Records plot background, grid, frame and tick marks.
///
/// Charts without plot axes (pie, donut, radar, funnel) still get the
/// background fill so the base layer composites the same way.
pub(super) fn record_axes_scene(
    style: &ChartStyle,
    mapper: &PlotMapper,
    ticks: &AxisTicks,
    draw_plot_axes: bool,
) -> RecordedScene {
    record_scene(|recorder| {
        let plot = mapper.plot();
        recorder.draw_rect(plot, &Paint::fill(style.plot_background));
        if !draw_plot_axes {
            return;
        }

        let axis = &style.axis;
        if axis.grid_visible {
            let grid_paint = Paint::stroke(axis.grid_color, 1.0);
            for tick in &ticks.primary {
                let Some(position) = mapper.value_position(tick.value, AxisSlot::Primary) else {
                    continue;
                };
                if mapper.is_bar_oriented() {
                    recorder.draw_line(
                        Point::new(position, plot.top),
                        Point::new(position, plot.bottom()),
                        &grid_paint,
                    );
                } else {
                    recorder.draw_line(
                        Point::new(plot.left, position),
                        Point::new(plot.right(), position),
                        &grid_paint,
                    );
                }
            }
            for tick in &ticks.category {
                let Some(position) = category_tick_position(mapper, tick.value) else {
                    continue;
                };
                if mapper.is_bar_oriented() {
                    recorder.draw_line(
                        Point::new(plot.left, position),
                        Point::new(plot.right(), position),
                        &grid_paint,
                    );
                } else {
                    recorder.draw_line(
                        Point::new(position, plot.top),
                        Point::new(position, plot.bottom()),
                        &grid_paint,
                    );
                }
            }
        }

        let line_paint = Paint::stroke(style.axis_line_color(), axis.line_width);
        recorder.draw_line(
            Point::new(plot.left, plot.bottom()),
            Point::new(plot.right(), plot.bottom()),
            &line_paint,
        );
        recorder.draw_line(
            Point::new(plot.left, plot.top),
            Point::new(plot.left, plot.bottom()),
            &line_paint,
        );
        if mapper.secondary_range().is_some() {
            if mapper.is_bar_oriented() {
                recorder.draw_line(
                    Point::new(plot.left, plot.top),
                    Point::new(plot.right(), plot.top),
                    &line_paint,
                );
            } else {
                recorder.draw_line(
                    Point::new(plot.right(), plot.top),
                    Point::new(plot.right(), plot.bottom()),
                    &line_paint,
                );
            }
        }

        record_tick_marks(recorder, mapper, ticks, axis.tick_length, &line_paint);
    })
}

fn record_tick_marks(
    recorder: &mut dyn Surface,
    mapper: &PlotMapper,
    ticks: &AxisTicks,
    tick_length: f64,
    paint: &Paint,
) {
    let plot = mapper.plot();

    for tick in &ticks.primary {
        let Some(position) = mapper.value_position(tick.value, AxisSlot::Primary) else {
            continue;
        };
        if mapper.is_bar_oriented() {
            recorder.draw_line(
                Point::new(position, plot.bottom()),
                Point::new(position, plot.bottom() + tick_length),
                paint,
            );
        } else {
            recorder.draw_line(
                Point::new(plot.left - tick_length, position),
                Point::new(plot.left, position),
                paint,
            );
        }
    }

    if mapper.secondary_range().is_some() {
        for tick in &ticks.secondary {
            let Some(position) = mapper.value_position(tick.value, AxisSlot::Secondary) else {
                continue;
            };
            if mapper.is_bar_oriented() {
                recorder.draw_line(
                    Point::new(position, plot.top - tick_length),
                    Point::new(position, plot.top),
                    paint,
                );
            } else {
                recorder.draw_line(
                    Point::new(plot.right(), position),
                    Point::new(plot.right() + tick_length, position),
                    paint,
                );
            }
        }
    }

    for tick in &ticks.category {
        let Some(position) = category_tick_position(mapper, tick.value) else {
            continue;
        };
        if mapper.is_bar_oriented() {
            recorder.draw_line(
                Point::new(plot.left - tick_length, position),
                Point::new(plot.left, position),
                paint,
            );
        } else {
            recorder.draw_line(
                Point::new(position, plot.bottom()),
                Point::new(position, plot.bottom() + tick_length),
                paint,
            );
        }
    }
}

/// Records every tick label. Kept apart from the axes layer because label
/// text changes with formatting and locale while the grid does not.
pub(super) fn record_axis_text_scene(
    style: &ChartStyle,
    mapper: &PlotMapper,
    ticks: &AxisTicks,
    draw_plot_axes: bool,
) -> RecordedScene {
    record_scene(|recorder| {
        if !draw_plot_axes {
            return;
        }
        let plot = mapper.plot();
        let axis = &style.axis;
        let size = axis.label_size;
        let paint = Paint::fill(axis.label_color);
        let edge_gap = axis.tick_length + TICK_TEXT_GAP;

        for tick in &ticks.primary {
            let Some(position) = mapper.value_position(tick.value, AxisSlot::Primary) else {
                continue;
            };
            if mapper.is_bar_oriented() {
                recorder.draw_text(
                    &tick.label,
                    Point::new(position, plot.bottom() + edge_gap),
                    size,
                    TextAlign::Center,
                    &paint,
                );
            } else {
                recorder.draw_text(
                    &tick.label,
                    Point::new(plot.left - edge_gap, position - size / 2.0),
                    size,
                    TextAlign::Right,
                    &paint,
                );
            }
        }

        if mapper.secondary_range().is_some() {
            for tick in &ticks.secondary {
                let Some(position) = mapper.value_position(tick.value, AxisSlot::Secondary) else {
                    continue;
                };
                if mapper.is_bar_oriented() {
                    recorder.draw_text(
                        &tick.label,
                        Point::new(position, plot.top - edge_gap - size),
                        size,
                        TextAlign::Center,
                        &paint,
                    );
                } else {
                    recorder.draw_text(
                        &tick.label,
                        Point::new(plot.right() + edge_gap, position - size / 2.0),
                        size,
                        TextAlign::Left,
                        &paint,
                    );
                }
            }
        }

        for tick in &ticks.category {
            let Some(position) = category_tick_position(mapper, tick.value) else {
                continue;
            };
            if mapper.is_bar_oriented() {
                recorder.draw_text(
                    &tick.label,
                    Point::new(plot.left - edge_gap, position - size / 2.0),
                    size,
                    TextAlign::Right,
                    &paint,
                );
            } else {
                recorder.draw_text(
                    &tick.label,
                    Point::new(position, plot.bottom() + edge_gap),
                    size,
                    TextAlign::Center,
                    &paint,
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::super::ticks::{TickMark, category_ticks, linear_ticks};
    use super::*;
    use crate::core::{AxisRange, Rect};
    use crate::surface::DrawCommand;

    fn mapper() -> PlotMapper {
        PlotMapper::new(
            Rect::new(0.0, 0.0, 100.0, 50.0),
            AxisRange::new(0.0, 10.0).unwrap(),
            4,
        )
        .unwrap()
    }

    fn ticks() -> AxisTicks {
        AxisTicks::new()
            .with_primary(linear_ticks(AxisRange::new(0.0, 10.0).unwrap(), 3))
            .with_category(category_ticks(&[], 4))
    }

    #[test]
    fn grid_lines_follow_orientation() {
        let style = ChartStyle::default();
        let scene = record_axes_scene(&style, &mapper(), &ticks(), true);
        let horizontal_grid = scene.commands().iter().any(|command| {
            matches!(command, DrawCommand::Line { from, to, .. }
                if from.y == to.y && from.x == 0.0 && to.x == 100.0 && from.y == 25.0)
        });
        assert!(horizontal_grid);

        let swapped = mapper().with_bar_orientation(true);
        let scene = record_axes_scene(&style, &swapped, &ticks(), true);
        let vertical_grid = scene.commands().iter().any(|command| {
            matches!(command, DrawCommand::Line { from, to, .. }
                if from.x == to.x && from.y == 0.0 && to.y == 50.0 && from.x == 50.0)
        });
        assert!(vertical_grid);
    }

    #[test]
    fn axisless_kinds_keep_only_the_background() {
        let style = ChartStyle::default();
        let scene = record_axes_scene(&style, &mapper(), &ticks(), false);
        assert_eq!(scene.len(), 1);
        assert!(matches!(scene.commands()[0], DrawCommand::Rect { .. }));

        let text = record_axis_text_scene(&style, &mapper(), &ticks(), false);
        assert!(text.is_empty());
    }

    #[test]
    fn disabled_grid_drops_grid_lines_but_keeps_the_frame() {
        let mut style = ChartStyle::default();
        style.axis.grid_visible = false;
        let with_frame = record_axes_scene(&style, &mapper(), &ticks(), true);

        style.axis.grid_visible = true;
        let with_grid = record_axes_scene(&style, &mapper(), &ticks(), true);
        assert!(with_grid.len() > with_frame.len());
        assert!(with_frame.len() > 1);
    }

    #[test]
    fn value_labels_sit_left_of_the_plot() {
        let style = ChartStyle::default();
        let scene = record_axis_text_scene(&style, &mapper(), &ticks(), true);
        let left_labels = scene
            .commands()
            .iter()
            .filter(|command| {
                matches!(command, DrawCommand::Text { origin, align, .. }
                    if origin.x < 0.0 && *align == TextAlign::Right)
            })
            .count();
        assert_eq!(left_labels, 3);
    }

    #[test]
    fn secondary_ticks_need_a_secondary_range() {
        let style = ChartStyle::default();
        let ticks = AxisTicks::new().with_secondary(vec![TickMark::new(5.0, "5")]);
        let without = record_axis_text_scene(&style, &mapper(), &ticks, true);
        assert!(without.is_empty());

        let with_secondary = mapper()
            .with_secondary(AxisKind::Linear, AxisRange::new(0.0, 10.0).unwrap())
            .unwrap();
        let scene = record_axis_text_scene(&style, &with_secondary, &ticks, true);
        assert_eq!(scene.len(), 1);
    }
}
