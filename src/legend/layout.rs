use tracing::debug;

use crate::core::{ChartStyle, DataSnapshot, LegendFlow, LegendStyle, Point, Rect};
use crate::surface::{Color, Paint, Surface, TextAlign, TextMeasurer};

use super::{LegendEntry, collect_entries, collect_grouped_entries};

const ELLIPSIS: &str = "…";
const SWATCH_TEXT_GAP: f64 = 4.0;
const LINE_HEIGHT_FACTOR: f64 = 1.2;
const HEADER_GAP: f64 = 4.0;

/// Size one legend layout occupies, in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegendSize {
    pub width: f64,
    pub height: f64,
}

impl LegendSize {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Longest prefix of `text` that fits `max_width` once the ellipsis is
/// appended; the full text passes through untouched when it already fits.
///
/// Returns an empty string only when the ellipsis alone overflows. The
/// binary search over the prefix length is sound because measured widths are
/// monotonic in the prefix.
#[must_use]
pub fn truncate_to_width(
    text: &str,
    max_width: f64,
    size_px: f64,
    measurer: &dyn TextMeasurer,
) -> String {
    if measurer.text_width(text, size_px) <= max_width {
        return text.to_owned();
    }
    if measurer.text_width(ELLIPSIS, size_px) > max_width {
        debug!(max_width, "label dropped entirely: ellipsis alone overflows");
        return String::new();
    }

    let chars: Vec<char> = text.chars().collect();
    // low always fits with the ellipsis, high never does
    let mut low = 0_usize;
    let mut high = chars.len();
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        let mut candidate: String = chars[..mid].iter().collect();
        candidate.push_str(ELLIPSIS);
        if measurer.text_width(&candidate, size_px) <= max_width {
            low = mid;
        } else {
            high = mid;
        }
    }

    let mut truncated: String = chars[..low].iter().collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[derive(Debug, Clone, PartialEq)]
struct EntryPlacement {
    swatch: Rect,
    text_origin: Point,
    text: String,
    color: Color,
}

#[derive(Debug, Clone, PartialEq)]
struct HeaderPlacement {
    origin: Point,
    text: String,
}

/// Placements relative to the legend origin, shared by measure and draw so
/// the two passes cannot diverge.
#[derive(Debug, Clone, PartialEq, Default)]
struct LegendPlan {
    entries: Vec<EntryPlacement>,
    headers: Vec<HeaderPlacement>,
    max_right: f64,
    max_bottom: f64,
}

impl LegendPlan {
    fn size(&self) -> LegendSize {
        LegendSize {
            width: self.max_right,
            height: self.max_bottom,
        }
    }

    fn extend_to(&mut self, right: f64, bottom: f64) {
        self.max_right = self.max_right.max(right);
        self.max_bottom = self.max_bottom.max(bottom);
    }
}

fn entry_row_height(legend: &LegendStyle) -> f64 {
    legend.swatch_size.max(legend.font_size * LINE_HEIGHT_FACTOR)
}

/// Lays one entry block out starting at `start_y`; returns the block's
/// bottom edge.
fn plan_block(
    entries: &[LegendEntry],
    legend: &LegendStyle,
    start_y: f64,
    avail_width: f64,
    avail_height: f64,
    measurer: &dyn TextMeasurer,
    plan: &mut LegendPlan,
) -> f64 {
    if entries.is_empty() {
        return start_y;
    }
    let row_height = entry_row_height(legend);
    let text_budget = (avail_width - legend.swatch_size - SWATCH_TEXT_GAP).max(0.0);
    let mut x = 0.0_f64;
    let mut y = start_y;
    let mut block_bottom = start_y;
    let mut column_width = 0.0_f64;

    for entry in entries {
        let text = truncate_to_width(&entry.name, text_budget, legend.font_size, measurer);
        let text_width = measurer.text_width(&text, legend.font_size);
        let entry_width = legend.swatch_size + SWATCH_TEXT_GAP + text_width;

        match legend.flow {
            LegendFlow::Row => {
                // never wrap the first item of a line
                if legend.wrap && x > 0.0 && x + entry_width > avail_width {
                    x = 0.0;
                    y += row_height + legend.line_spacing;
                }
            }
            LegendFlow::Column => {
                // never wrap the first item of a column
                if y > start_y && y + row_height > avail_height {
                    x += column_width + legend.item_spacing;
                    y = start_y;
                    column_width = 0.0;
                }
            }
        }

        let swatch = Rect::new(
            x,
            y + (row_height - legend.swatch_size) / 2.0,
            legend.swatch_size,
            legend.swatch_size,
        );
        let text_origin = Point::new(
            x + legend.swatch_size + SWATCH_TEXT_GAP,
            y + (row_height - legend.font_size * LINE_HEIGHT_FACTOR) / 2.0,
        );
        plan.entries.push(EntryPlacement {
            swatch,
            text_origin,
            text,
            color: entry.color,
        });
        plan.extend_to(x + entry_width, y + row_height);
        block_bottom = block_bottom.max(y + row_height);

        match legend.flow {
            LegendFlow::Row => x += entry_width + legend.item_spacing,
            LegendFlow::Column => {
                column_width = column_width.max(entry_width);
                y += row_height + legend.line_spacing;
            }
        }
    }
    block_bottom
}

/// Places a group header line; returns the y coordinate content below it
/// starts at.
fn plan_header(
    header: Option<&str>,
    legend: &LegendStyle,
    start_y: f64,
    avail_width: f64,
    measurer: &dyn TextMeasurer,
    plan: &mut LegendPlan,
) -> f64 {
    let Some(header) = header else {
        return start_y;
    };
    let text = truncate_to_width(header, avail_width.max(0.0), legend.font_size, measurer);
    if text.is_empty() {
        return start_y;
    }
    let height = legend.font_size * LINE_HEIGHT_FACTOR;
    let width = measurer.text_width(&text, legend.font_size);
    plan.headers.push(HeaderPlacement {
        origin: Point::new(0.0, start_y),
        text,
    });
    plan.extend_to(width, start_y + height);
    start_y + height + HEADER_GAP
}

fn build_plan(
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    avail_width: f64,
    avail_height: f64,
    measurer: &dyn TextMeasurer,
) -> LegendPlan {
    let legend = &style.legend;
    let mut plan = LegendPlan::default();
    if !legend.visible {
        return plan;
    }

    if let Some(grouping) = &legend.grouping {
        let groups = collect_grouped_entries(snapshot, style);
        // grouping needs both blocks; otherwise the flat list reads better
        if !groups.standard.is_empty() && !groups.stacked.is_empty() {
            let mut y = plan_header(
                grouping.standard_header.as_deref(),
                legend,
                0.0,
                avail_width,
                measurer,
                &mut plan,
            );
            y = plan_block(
                &groups.standard,
                legend,
                y,
                avail_width,
                avail_height,
                measurer,
                &mut plan,
            );
            y += grouping.group_gap;
            y = plan_header(
                grouping.stacked_header.as_deref(),
                legend,
                y,
                avail_width,
                measurer,
                &mut plan,
            );
            plan_block(
                &groups.stacked,
                legend,
                y,
                avail_width,
                avail_height,
                measurer,
                &mut plan,
            );
            return plan;
        }
    }

    let entries = collect_entries(snapshot, style);
    plan_block(
        &entries,
        legend,
        0.0,
        avail_width,
        avail_height,
        measurer,
        &mut plan,
    );
    plan
}

/// Measures the size drawing into `avail_width` x `avail_height` would
/// occupy.
///
/// Handing [`draw`] a rectangle of exactly this size reproduces the measured
/// layout: every placed entry satisfied the wrap bound, so replanning
/// against the measured extents makes the same decisions and never escapes
/// the rectangle.
#[must_use]
pub fn measure(
    snapshot: &DataSnapshot,
    style: &ChartStyle,
    avail_width: f64,
    avail_height: f64,
    measurer: &dyn TextMeasurer,
) -> LegendSize {
    build_plan(snapshot, style, avail_width, avail_height, measurer).size()
}

/// Draws the legend into `rect`, replanning against the rectangle's size.
pub fn draw(
    surface: &mut dyn Surface,
    measurer: &dyn TextMeasurer,
    rect: Rect,
    snapshot: &DataSnapshot,
    style: &ChartStyle,
) {
    let plan = build_plan(snapshot, style, rect.width, rect.height, measurer);
    let legend = &style.legend;
    let text_paint = Paint::fill(legend.text_color);

    for header in &plan.headers {
        surface.draw_text(
            &header.text,
            Point::new(rect.left + header.origin.x, rect.top + header.origin.y),
            legend.font_size,
            TextAlign::Left,
            &text_paint,
        );
    }
    for entry in &plan.entries {
        let swatch = Rect::new(
            rect.left + entry.swatch.left,
            rect.top + entry.swatch.top,
            entry.swatch.width,
            entry.swatch.height,
        );
        surface.draw_rect(swatch, &Paint::fill(entry.color));
        if !entry.text.is_empty() {
            surface.draw_text(
                &entry.text,
                Point::new(
                    rect.left + entry.text_origin.x,
                    rect.top + entry.text_origin.y,
                ),
                legend.font_size,
                TextAlign::Left,
                &text_paint,
            );
        }
    }
    debug!(
        entries = plan.entries.len(),
        headers = plan.headers.len(),
        "legend drawn"
    );
}
