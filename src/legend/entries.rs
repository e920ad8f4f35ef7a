use crate::core::{ChartStyle, DataSnapshot};

use crate::surface::Color;

/// One legend row: display name plus swatch color.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub color: Color,
}

/// Entries split into the standard and stacked blocks of a grouped legend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedEntries {
    pub standard: Vec<LegendEntry>,
    pub stacked: Vec<LegendEntry>,
}

/// Flat entry list for a snapshot.
///
/// Charts led by a category-legend kind (pie, donut, funnel) list one entry
/// per data point, labeled from the category list or synthesized from the
/// kind's prefix, and colored straight from the palette cycle. All other
/// charts list visible series names with their resolved series colors.
#[must_use]
pub fn collect_entries(snapshot: &DataSnapshot, style: &ChartStyle) -> Vec<LegendEntry> {
    let mut entries = Vec::new();
    if let Some((_, series)) = snapshot
        .visible_series()
        .find(|(_, series)| series.kind.uses_category_legend())
    {
        let prefix = series.kind.category_label_prefix();
        for index in 0..series.point_count() {
            let name = snapshot
                .categories
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("{prefix} {}", index + 1));
            entries.push(LegendEntry {
                name,
                color: style.palette.color(index),
            });
        }
        return entries;
    }

    for (index, series) in snapshot.visible_series() {
        entries.push(LegendEntry {
            name: series.name.clone(),
            color: style.series_color(index),
        });
    }
    entries
}

/// Entries split by series stacking for the grouped legend mode. Category
/// legends never group, so only series-name entries are considered.
#[must_use]
pub fn collect_grouped_entries(snapshot: &DataSnapshot, style: &ChartStyle) -> GroupedEntries {
    let mut groups = GroupedEntries::default();
    for (index, series) in snapshot.visible_series() {
        if series.kind.uses_category_legend() {
            continue;
        }
        let entry = LegendEntry {
            name: series.name.clone(),
            color: style.series_color(index),
        };
        if series.kind.is_stacked() {
            groups.stacked.push(entry);
        } else {
            groups.standard.push(entry);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SeriesData, SeriesKind};

    #[test]
    fn series_legend_uses_visible_series_names() {
        let snapshot = DataSnapshot::new(
            vec![
                SeriesData::from_values("revenue", SeriesKind::Line, &[1.0]),
                SeriesData::from_values("hidden", SeriesKind::Line, &[1.0]).with_visible(false),
                SeriesData::from_values("cost", SeriesKind::Line, &[1.0]),
            ],
            vec![],
        );
        let entries = collect_entries(&snapshot, &ChartStyle::default());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "revenue");
        assert_eq!(entries[1].name, "cost");
    }

    #[test]
    fn pie_legend_lists_categories_with_palette_colors() {
        let style = ChartStyle::default();
        let snapshot = DataSnapshot::new(
            vec![SeriesData::from_values(
                "share",
                SeriesKind::Pie,
                &[3.0, 5.0, 2.0],
            )],
            vec!["North".to_owned(), "South".to_owned()],
        );
        let entries = collect_entries(&snapshot, &style);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "North");
        assert_eq!(entries[1].name, "South");
        // third slice has no category label and falls back to the prefix
        assert_eq!(entries[2].name, "Category 3");
        assert_eq!(entries[1].color, style.palette.color(1));
    }

    #[test]
    fn funnel_fallback_labels_use_stage_prefix() {
        let snapshot = DataSnapshot::new(
            vec![SeriesData::from_values(
                "conversion",
                SeriesKind::Funnel,
                &[10.0, 4.0],
            )],
            vec![],
        );
        let entries = collect_entries(&snapshot, &ChartStyle::default());
        assert_eq!(entries[0].name, "Stage 1");
        assert_eq!(entries[1].name, "Stage 2");
    }

    #[test]
    fn grouping_splits_stacked_series_out() {
        let snapshot = DataSnapshot::new(
            vec![
                SeriesData::from_values("a", SeriesKind::Line, &[1.0]),
                SeriesData::from_values("b", SeriesKind::StackedColumn, &[1.0]),
                SeriesData::from_values("c", SeriesKind::Stacked100Area, &[1.0]),
            ],
            vec![],
        );
        let groups = collect_grouped_entries(&snapshot, &ChartStyle::default());
        assert_eq!(groups.standard.len(), 1);
        assert_eq!(groups.stacked.len(), 2);
        assert_eq!(groups.stacked[0].name, "b");
    }
}
