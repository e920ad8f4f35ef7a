use serde::{Deserialize, Serialize};

use crate::core::{AxisSlot, SeriesKind};

/// Family of one independently rebuildable data recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Whole-chart figure kinds that never segment (pie, donut, radar,
    /// funnel); stored through the monolithic data slot instead.
    Full,
    Series,
    StackedPrimary,
    StackedSecondary,
    Stacked100Primary,
    Stacked100Secondary,
    Trendlines,
    ErrorBars,
}

/// Addresses one data or value-label segment in the scene cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentKey {
    pub kind: SegmentKind,
    pub series: usize,
}

impl SegmentKey {
    #[must_use]
    pub const fn new(kind: SegmentKind, series: usize) -> Self {
        Self { kind, series }
    }

    /// Main data segment key for the series at `series_index`.
    #[must_use]
    pub fn for_series(series_index: usize, kind: SeriesKind, slot: AxisSlot) -> Self {
        let segment_kind = match kind {
            SeriesKind::Line
            | SeriesKind::Area
            | SeriesKind::Column
            | SeriesKind::Bar
            | SeriesKind::Scatter
            | SeriesKind::Bubble
            | SeriesKind::Histogram
            | SeriesKind::Pareto
            | SeriesKind::BoxWhisker
            | SeriesKind::Waterfall => SegmentKind::Series,
            SeriesKind::StackedColumn | SeriesKind::StackedBar | SeriesKind::StackedArea => {
                match slot {
                    AxisSlot::Primary => SegmentKind::StackedPrimary,
                    AxisSlot::Secondary => SegmentKind::StackedSecondary,
                }
            }
            SeriesKind::Stacked100Column
            | SeriesKind::Stacked100Bar
            | SeriesKind::Stacked100Area => match slot {
                AxisSlot::Primary => SegmentKind::Stacked100Primary,
                AxisSlot::Secondary => SegmentKind::Stacked100Secondary,
            },
            SeriesKind::Pie | SeriesKind::Donut | SeriesKind::Radar | SeriesKind::Funnel => {
                SegmentKind::Full
            }
        };
        Self::new(segment_kind, series_index)
    }

    #[must_use]
    pub const fn trendlines(series_index: usize) -> Self {
        Self::new(SegmentKind::Trendlines, series_index)
    }

    #[must_use]
    pub const fn error_bars(series_index: usize) -> Self {
        Self::new(SegmentKind::ErrorBars, series_index)
    }
}
