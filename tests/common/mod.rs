#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use tradeplot::domain::chart::Figure;
use tradeplot::domain::dataset::{Cell, Dataset};
use tradeplot::domain::error::PlotError;
use tradeplot::domain::options::PlotOptions;
use tradeplot::domain::series::{SeriesSlots, SlotChoice};
use tradeplot::ports::data_port::DataPort;
use tradeplot::ports::render_port::RenderPort;

/// Records every figure it is asked to display.
pub struct MockRenderPort {
    pub displayed: Vec<Figure>,
    pub error: Option<String>,
}

impl MockRenderPort {
    pub fn new() -> Self {
        Self {
            displayed: Vec::new(),
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            displayed: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl RenderPort for MockRenderPort {
    fn display(&mut self, figure: &Figure) -> Result<(), PlotError> {
        if let Some(reason) = &self.error {
            return Err(PlotError::Render {
                reason: reason.clone(),
            });
        }
        self.displayed.push(figure.clone());
        Ok(())
    }
}

pub struct MockDataPort {
    pub dataset: Dataset,
}

impl DataPort for MockDataPort {
    fn load_dataset(&self, date_column: &str) -> Result<Dataset, PlotError> {
        self.dataset.column_index(date_column)?;
        Ok(self.dataset.clone())
    }

    fn list_columns(&self) -> Result<Vec<String>, PlotError> {
        Ok(self.dataset.columns().to_vec())
    }
}

pub fn ts(date: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// `days` consecutive daily rows from 2020-01-01 with equity, cash and close.
pub fn daily_history(days: u32) -> Dataset {
    let mut ds = Dataset::new(vec![
        "date".into(),
        "equity".into(),
        "cash".into(),
        "close".into(),
    ]);
    let start = ts("2020-01-01");
    for i in 0..days {
        ds.push_row(vec![
            Cell::Date(start + chrono::Duration::days(i as i64)),
            Cell::Number(10_000.0 + 150.0 * i as f64),
            Cell::Number(5_000.0 - 100.0 * i as f64),
            Cell::Number(20.0 + (i % 4) as f64),
        ])
        .unwrap();
    }
    ds
}

pub fn options_with(columns: &[&str]) -> PlotOptions {
    let mut series = SeriesSlots::default();
    for (slot, column) in tradeplot::domain::series::SeriesSlot::ALL
        .iter()
        .zip(columns)
    {
        *series.get_mut(*slot) = SlotChoice::column(column);
    }
    PlotOptions {
        series,
        show_plot: false,
        ..PlotOptions::titled("Trading History")
    }
}

pub const HISTORY_CSV: &str = "date,equity,cash,close\n\
2020-01-01 00:00:00,10000,5000,20\n\
2020-01-02 00:00:00,10150,4900,21\n\
2020-01-03 00:00:00,10300,,22\n\
2020-01-04 00:00:00,10450,4700,23\n\
2020-01-05 00:00:00,10600,4600,20\n\
2020-01-06 00:00:00,10750,4500,21\n\
2020-01-07 00:00:00,10900,4400,0.005\n\
2020-01-08 00:00:00,11050,4300,23\n\
2020-01-09 00:00:00,11200,4200,20\n\
2020-01-10 00:00:00,11350,4100,21\n";
