//! Series selection: which columns are plotted and in which colors.
//!
//! Series come from four fixed slots named after their default hue. The
//! first occupied slot is drawn on the primary axis, the rest on twin axes.

use crate::domain::error::PlotError;

/// Most series a single chart can overlay.
pub const MAX_SERIES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesSlot {
    Red,
    Blue,
    Green,
    Orange,
}

impl SeriesSlot {
    /// Slots in precedence order.
    pub const ALL: [SeriesSlot; MAX_SERIES] = [
        SeriesSlot::Red,
        SeriesSlot::Blue,
        SeriesSlot::Green,
        SeriesSlot::Orange,
    ];

    pub fn default_color(self) -> &'static str {
        match self {
            SeriesSlot::Red => "#E74C3C",
            SeriesSlot::Blue => "#3498DB",
            SeriesSlot::Green => "#2ECC71",
            SeriesSlot::Orange => "#F39C12",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SeriesSlot::Red => "red",
            SeriesSlot::Blue => "blue",
            SeriesSlot::Green => "green",
            SeriesSlot::Orange => "orange",
        }
    }
}

/// Caller's choice for one slot: a column and an optional color override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotChoice {
    pub column: Option<String>,
    pub color: Option<String>,
}

impl SlotChoice {
    pub fn column(column: &str) -> Self {
        Self {
            column: Some(column.to_string()),
            color: None,
        }
    }

    pub fn with_color(column: &str, color: &str) -> Self {
        Self {
            column: Some(column.to_string()),
            color: Some(color.to_string()),
        }
    }
}

/// All four slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSlots {
    pub red: SlotChoice,
    pub blue: SlotChoice,
    pub green: SlotChoice,
    pub orange: SlotChoice,
}

impl SeriesSlots {
    pub fn get(&self, slot: SeriesSlot) -> &SlotChoice {
        match slot {
            SeriesSlot::Red => &self.red,
            SeriesSlot::Blue => &self.blue,
            SeriesSlot::Green => &self.green,
            SeriesSlot::Orange => &self.orange,
        }
    }

    pub fn get_mut(&mut self, slot: SeriesSlot) -> &mut SlotChoice {
        match slot {
            SeriesSlot::Red => &mut self.red,
            SeriesSlot::Blue => &mut self.blue,
            SeriesSlot::Green => &mut self.green,
            SeriesSlot::Orange => &mut self.orange,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDescriptor {
    pub slot: SeriesSlot,
    pub column: String,
    pub color: String,
}

/// Output of series selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSelection {
    /// Date column first, then each selected column once.
    pub columns: Vec<String>,
    /// Series in render order; index 0 is the primary axis.
    pub series: Vec<SeriesDescriptor>,
}

impl SeriesSelection {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn build_selection<'a, I>(date_column: &str, picks: I) -> SeriesSelection
where
    I: IntoIterator<Item = (SeriesSlot, &'a str, Option<&'a str>)>,
{
    let mut columns = vec![date_column.to_string()];
    let mut series = Vec::new();

    for (slot, column, color) in picks {
        if !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
        let color = non_empty(color).unwrap_or(slot.default_color());
        series.push(SeriesDescriptor {
            slot,
            column: column.to_string(),
            color: color.to_string(),
        });
    }

    SeriesSelection { columns, series }
}

/// Resolve the four slots into an ordered selection. Empty slots are skipped.
pub fn select_series(date_column: &str, slots: &SeriesSlots) -> SeriesSelection {
    let picks = SeriesSlot::ALL.iter().filter_map(|&slot| {
        let choice = slots.get(slot);
        let column = non_empty(choice.column.as_deref())?;
        Some((slot, column, choice.color.as_deref()))
    });
    build_selection(date_column, picks)
}

/// Assign `(column, color)` pairs to slots in order.
///
/// More than [`MAX_SERIES`] entries is rejected rather than truncated.
pub fn select_series_list(
    date_column: &str,
    entries: &[(&str, Option<&str>)],
) -> Result<SeriesSelection, PlotError> {
    if entries.len() > MAX_SERIES {
        return Err(PlotError::TooManySeries {
            requested: entries.len(),
            max: MAX_SERIES,
        });
    }
    let mut slots = SeriesSlots::default();
    for (slot, (column, color)) in SeriesSlot::ALL.iter().zip(entries) {
        *slots.get_mut(*slot) = SlotChoice {
            column: Some(column.to_string()),
            color: color.map(str::to_string),
        };
    }
    Ok(select_series(date_column, &slots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_slot_uses_default_color() {
        let slots = SeriesSlots {
            red: SlotChoice::column("equity"),
            ..Default::default()
        };
        let sel = select_series("date", &slots);
        assert_eq!(sel.columns, vec!["date", "equity"]);
        assert_eq!(sel.series.len(), 1);
        assert_eq!(sel.series[0].color, "#E74C3C");
        assert_eq!(sel.series[0].slot, SeriesSlot::Red);
    }

    #[test]
    fn explicit_color_wins() {
        let slots = SeriesSlots {
            blue: SlotChoice::with_color("cash", "#000000"),
            ..Default::default()
        };
        let sel = select_series("date", &slots);
        assert_eq!(sel.series[0].color, "#000000");
    }

    #[test]
    fn empty_color_falls_back() {
        let slots = SeriesSlots {
            green: SlotChoice::with_color("cash", "  "),
            ..Default::default()
        };
        let sel = select_series("date", &slots);
        assert_eq!(sel.series[0].color, SeriesSlot::Green.default_color());
    }

    #[test]
    fn empty_slots_are_skipped_without_placeholder() {
        let slots = SeriesSlots {
            red: SlotChoice::column("equity"),
            blue: SlotChoice::column(""),
            orange: SlotChoice::column("close"),
            ..Default::default()
        };
        let sel = select_series("date", &slots);
        assert_eq!(sel.columns, vec!["date", "equity", "close"]);
        assert_eq!(sel.series.len(), 2);
        assert_eq!(sel.series[1].slot, SeriesSlot::Orange);
        assert_eq!(sel.series[1].color, "#F39C12");
    }

    #[test]
    fn repeated_column_listed_once_but_plotted_twice() {
        let slots = SeriesSlots {
            red: SlotChoice::column("close"),
            blue: SlotChoice::column("close"),
            ..Default::default()
        };
        let sel = select_series("date", &slots);
        assert_eq!(sel.columns, vec!["date", "close"]);
        assert_eq!(sel.series.len(), 2);
    }

    #[test]
    fn no_slots_gives_date_only() {
        let sel = select_series("date", &SeriesSlots::default());
        assert!(sel.is_empty());
        assert_eq!(sel.columns, vec!["date"]);
    }

    #[test]
    fn list_rejects_more_than_four() {
        let entries = [
            ("a", None),
            ("b", None),
            ("c", None),
            ("d", None),
            ("e", None),
        ];
        let err = select_series_list("date", &entries).unwrap_err();
        assert_eq!(
            err,
            PlotError::TooManySeries {
                requested: 5,
                max: 4
            }
        );
    }

    #[test]
    fn list_assigns_slots_in_order() {
        let sel = select_series_list("date", &[("a", None), ("b", Some("#111111"))]).unwrap();
        assert_eq!(sel.series[0].slot, SeriesSlot::Red);
        assert_eq!(sel.series[1].slot, SeriesSlot::Blue);
        assert_eq!(sel.series[1].color, "#111111");
    }

    proptest! {
        #[test]
        fn column_list_starts_with_date_and_has_no_duplicates(
            picks in proptest::collection::vec(
                proptest::option::of(prop_oneof![
                    Just("equity"), Just("cash"), Just("close"), Just("date"), Just("")
                ]),
                4,
            )
        ) {
            let mut slots = SeriesSlots::default();
            for (slot, pick) in SeriesSlot::ALL.iter().zip(&picks) {
                slots.get_mut(*slot).column = pick.map(str::to_string);
            }
            let sel = select_series("date", &slots);

            prop_assert_eq!(sel.columns[0].as_str(), "date");
            let mut seen = std::collections::HashSet::new();
            for c in &sel.columns {
                prop_assert!(seen.insert(c.clone()));
            }
            for s in &sel.series {
                prop_assert!(sel.columns.contains(&s.column));
            }
            let expected = picks.iter().filter(|p| matches!(p, Some(c) if !c.is_empty())).count();
            prop_assert_eq!(sel.series.len(), expected);
        }
    }
}
