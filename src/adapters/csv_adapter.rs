//! CSV file data adapter.

use crate::domain::dataset::{Cell, Dataset};
use crate::domain::error::PlotError;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<String, PlotError> {
        fs::read_to_string(&self.path).map_err(|e| PlotError::DataLoad {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn is_missing(value: &str) -> bool {
    matches!(value, "" | "NaN" | "nan" | "NA" | "None" | "null")
}

/// Date cells must parse. Other cells that are not numbers become
/// [`Cell::Missing`]; the returned flag reports that coercion.
fn parse_cell(
    value: &str,
    is_date: bool,
    column: &str,
    line: usize,
) -> Result<(Cell, bool), PlotError> {
    let value = value.trim();
    if is_missing(value) {
        return Ok((Cell::Missing, false));
    }
    if is_date {
        return parse_timestamp(value)
            .map(|d| (Cell::Date(d), false))
            .ok_or_else(|| PlotError::DataLoad {
                reason: format!("invalid {column} value {value:?} on line {line}"),
            });
    }
    Ok(match value.parse::<f64>() {
        Ok(v) => (Cell::Number(v), false),
        Err(_) => (Cell::Missing, true),
    })
}

impl DataPort for CsvAdapter {
    fn load_dataset(&self, date_column: &str) -> Result<Dataset, PlotError> {
        let content = self.read()?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| PlotError::DataLoad {
                reason: format!("CSV header error: {}", e),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut dataset = Dataset::new(columns.clone());
        let date_idx = dataset.column_index(date_column)?;
        let mut coerced = vec![0usize; columns.len()];

        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| PlotError::DataLoad {
                reason: format!("CSV parse error: {}", e),
            })?;
            // header is line 1
            let line = i + 2;
            let mut values = Vec::with_capacity(columns.len());
            for (idx, (value, column)) in record.iter().zip(&columns).enumerate() {
                let (cell, was_coerced) = parse_cell(value, idx == date_idx, column, line)?;
                if was_coerced {
                    coerced[idx] += 1;
                }
                values.push(cell);
            }
            dataset.push_row(values)?;
        }

        for (column, count) in columns.iter().zip(&coerced) {
            if *count > 0 {
                log::debug!("{column}: {count} non-numeric values read as missing");
            }
        }

        log::debug!(
            "loaded {} rows x {} columns from {}",
            dataset.len(),
            columns.len(),
            self.path.display()
        );
        Ok(dataset)
    }

    fn list_columns(&self) -> Result<Vec<String>, PlotError> {
        let content = self.read()?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| PlotError::DataLoad {
            reason: format!("CSV header error: {}", e),
        })?;
        Ok(headers.iter().map(|h| h.trim().to_string()).collect())
    }
}
