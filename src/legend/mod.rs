//! Legend entry collection and two-pass layout.
//!
//! [`measure`] and [`draw`] share one planner, so the rectangle a measure
//! pass reserves always reproduces the exact layout the draw pass renders.

mod entries;
mod layout;

pub use entries::{GroupedEntries, LegendEntry, collect_entries, collect_grouped_entries};
pub use layout::{LegendSize, draw, measure, truncate_to_width};
