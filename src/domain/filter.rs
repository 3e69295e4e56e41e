//! Row filtering ahead of plotting.
//!
//! Steps run in a fixed order: start-date cutoff, row mask, incomplete-row
//! drop. The result is always projected to the selected columns.

use chrono::NaiveDateTime;

use crate::domain::dataset::{Dataset, Row};
use crate::domain::error::PlotError;

/// Format accepted for `start_date`.
pub const START_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Boolean per row of the originally loaded dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowMask {
    keep: Vec<bool>,
}

impl RowMask {
    pub fn new(keep: Vec<bool>) -> Self {
        Self { keep }
    }

    /// Evaluate `pred` against every row of `dataset`.
    pub fn from_fn<F>(dataset: &Dataset, mut pred: F) -> Self
    where
        F: FnMut(&Dataset, &Row) -> bool,
    {
        let len = dataset.rows().iter().map(|r| r.index + 1).max().unwrap_or(0);
        let mut keep = vec![false; len];
        for row in dataset.rows() {
            keep[row.index] = pred(dataset, row);
        }
        Self { keep }
    }

    /// Rows where `column` is strictly greater than `threshold`.
    pub fn above(dataset: &Dataset, column: &str, threshold: f64) -> Result<Self, PlotError> {
        let idx = dataset.column_index(column)?;
        Ok(Self::from_fn(dataset, |_, row| {
            row.values[idx].as_number().is_some_and(|v| v > threshold)
        }))
    }

    /// Rows outside the mask are not kept.
    pub fn keeps(&self, row: &Row) -> bool {
        self.keep.get(row.index).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterSpec<'a> {
    pub start_date: Option<&'a str>,
    pub mask: Option<&'a RowMask>,
    pub drop_incomplete_rows: bool,
}

pub fn parse_start_date(value: &str) -> Result<NaiveDateTime, PlotError> {
    NaiveDateTime::parse_from_str(value.trim(), START_DATE_FORMAT).map_err(|e| {
        PlotError::StartDateParse {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Apply `spec` to `dataset` and project to `columns`.
///
/// Filtering every row away is not an error.
pub fn apply_filters(
    dataset: &Dataset,
    date_column: &str,
    columns: &[String],
    spec: &FilterSpec<'_>,
) -> Result<Dataset, PlotError> {
    let start = spec.start_date.map(parse_start_date).transpose()?;

    let mut view = dataset.project(columns)?;

    if let Some(start) = start {
        let date_idx = view.column_index(date_column)?;
        view = view.retain_rows(|r| r.values[date_idx].as_date().is_some_and(|d| d >= start));
        log::debug!(
            "start_date={} kept {} of {} rows",
            start,
            view.len(),
            dataset.len()
        );
    }

    if let Some(mask) = spec.mask {
        let before = view.len();
        view = view.retain_rows(|r| mask.keeps(r));
        log::debug!("row mask kept {} of {} rows", view.len(), before);
    }

    if spec.drop_incomplete_rows {
        let before = view.len();
        view = view.retain_rows(|r| !r.values.iter().any(|c| c.is_missing()));
        log::debug!("dropped {} incomplete rows", before - view.len());
    }

    Ok(view)
}
