//! statchart-rs: statistical charting core with a layered render cache.
//!
//! The engine records chart layers (axes, data, axis text, value labels,
//! legend) as replayable scenes, fingerprints them by frame state, and
//! rebuilds only the layers a change invalidates. Statistical overlays
//! (trend fits, moving averages, error bars) are derived in pure math
//! modules and cached as their own segments.

pub mod api;
pub mod cache;
pub mod core;
pub mod error;
pub mod legend;
pub mod overlay;
pub mod pool;
pub mod surface;
pub mod telemetry;

pub use api::{AxisTicks, ChartComposer, FrameRequest, FrameStats, TickMark};
pub use cache::{SceneCache, SegmentKey, SegmentKind};
pub use core::{
    AxisKind, AxisRange, AxisSlot, ChartStyle, DataDelta, DataSnapshot, SeriesData, SeriesKind,
};
pub use error::{ChartError, ChartResult};
pub use surface::{NullSurface, Surface, TextMeasurer};
