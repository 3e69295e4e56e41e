//! Combined legend across all axes of a figure.

use std::collections::HashSet;

use crate::domain::chart::{AxisHandle, Figure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPlacement {
    /// Renderer picks the corner with the least overlap.
    Best,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub axis: AxisHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub placement: LegendPlacement,
    pub shadow: bool,
}

impl Legend {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }
}

/// Every plotted line in axis order, then per-axis draw order.
pub fn collect_entries(figure: &Figure, handles: &[AxisHandle]) -> Vec<LegendEntry> {
    handles
        .iter()
        .filter_map(|&h| figure.axis(h).map(|axis| (h, axis)))
        .flat_map(|(h, axis)| {
            axis.plots().iter().map(move |plot| LegendEntry {
                label: plot.label.clone(),
                color: plot.color.clone(),
                axis: h,
            })
        })
        .collect()
}

/// Keep the first entry for each label, in first-seen order.
pub fn dedupe_entries(entries: Vec<LegendEntry>) -> Vec<LegendEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.label.clone()))
        .collect()
}

/// Build the deduplicated legend and attach it to the figure's primary axis.
pub fn attach_legend(figure: &mut Figure, handles: &[AxisHandle]) {
    let entries = dedupe_entries(collect_entries(figure, handles));
    figure.legend = Some(Legend {
        entries,
        placement: LegendPlacement::Best,
        shadow: true,
    });
}
