//! Frame composition: the per-frame orchestration that turns a data
//! snapshot, a style, and host-supplied ticks into cached layer recordings
//! and a composite replay.

mod axes_scenes;
mod composer;
mod series_scenes;
mod ticks;
mod value_labels;

pub use composer::{ChartComposer, FrameRequest, FrameStats};
pub use ticks::{
    AxisTicks, CATEGORY_AXIS_TARGET_SPACING_PX, TickMark, VALUE_AXIS_TARGET_SPACING_PX,
    category_ticks, format_tick_label, linear_ticks, log_ticks, nice_step, tick_target_count,
};
