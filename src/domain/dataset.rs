//! Tabular dataset representation.
//!
//! A [`Dataset`] is an ordered table of rows addressed by column name. Rows
//! keep their position in the originally loaded table so a [`RowMask`] built
//! against the full dataset still lines up after earlier filtering.
//!
//! [`RowMask`]: crate::domain::filter::RowMask

use chrono::NaiveDateTime;

use crate::domain::error::PlotError;

/// A single cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Date(NaiveDateTime),
    Number(f64),
    Missing,
}

impl Cell {
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// NaN numbers count as missing, same as an empty cell.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(v) => v.is_nan(),
            Cell::Date(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position of this row in the originally loaded dataset.
    pub index: usize,
    pub values: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row; its original index is its insertion position.
    pub fn push_row(&mut self, values: Vec<Cell>) -> Result<(), PlotError> {
        if values.len() != self.columns.len() {
            return Err(PlotError::DataLoad {
                reason: format!(
                    "row {} has {} values, expected {}",
                    self.rows.len(),
                    values.len(),
                    self.columns.len()
                ),
            });
        }
        let index = self.rows.len();
        self.rows.push(Row { index, values });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, PlotError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PlotError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    /// Cell at `column` for the given row.
    pub fn cell(&self, row: &Row, column: &str) -> Result<Cell, PlotError> {
        let idx = self.column_index(column)?;
        Ok(row.values.get(idx).copied().unwrap_or(Cell::Missing))
    }

    /// Keep rows matching `keep`, preserving order and original indices.
    pub fn retain_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&Row) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Restrict the table to `columns`, in that order.
    pub fn project(&self, columns: &[String]) -> Result<Dataset, PlotError> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|r| Row {
                index: r.index,
                values: indices.iter().map(|&i| r.values[i]).collect(),
            })
            .collect();

        Ok(Dataset {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// `(date, value)` pairs for a numeric column, skipping missing cells.
    pub fn series_points(
        &self,
        date_column: &str,
        column: &str,
    ) -> Result<Vec<(NaiveDateTime, f64)>, PlotError> {
        let date_idx = self.column_index(date_column)?;
        let value_idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|r| Some((r.values[date_idx].as_date()?, r.values[value_idx].as_number()?)))
            .collect())
    }

    /// Earliest and latest value of the date column.
    pub fn date_range(
        &self,
        date_column: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime)>, PlotError> {
        let idx = self.column_index(date_column)?;
        let mut dates = self.rows.iter().filter_map(|r| r.values[idx].as_date());
        let Some(first) = dates.next() else {
            return Ok(None);
        };
        Ok(Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))))
    }
}
