//! CLI integration tests for the plot command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_plot_options, build_row_mask)
//! - Path resolution (resolve_data_path)
//! - Full pipeline with real INI and CSV files on disk
//! - Exit codes for each failure class

mod common;

use clap::Parser;
use common::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;
use tradeplot::adapters::csv_adapter::CsvAdapter;
use tradeplot::adapters::file_config_adapter::FileConfigAdapter;
use tradeplot::cli::{self, Cli};
use tradeplot::domain::error::PlotError;
use tradeplot::domain::plot::plot_trading_history;
use tradeplot::domain::series::SeriesSlot;
use tradeplot::ports::data_port::DataPort;

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    path
}

const VALID_INI: &str = r#"
[data]
date_column = date

[series]
red = equity
blue = cash
blue_color = 1f77b4
green = equity

[plot]
title = Equity vs Cash
ylabel = Dollars
width = 10
height = 5
date_format = %d\n%b
scale_y = true
show_plot = true

[footnote]
text = backtest 42
xpos = 0.5
ypos = 0.02
"#;

fn run_args(args: &[&str]) -> ExitCode {
    let mut argv = vec!["tradeplot"];
    argv.extend_from_slice(args);
    cli::run(Cli::try_parse_from(argv).unwrap())
}

mod config_loading {
    use super::*;

    #[test]
    fn build_plot_options_reads_every_section() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let options = cli::build_plot_options(&adapter).unwrap();

        assert_eq!(options.title, "Equity vs Cash");
        assert_eq!(options.ylabel, "Dollars");
        assert_eq!(options.xlabel, "Date");
        assert_eq!(options.width, 10.0);
        assert_eq!(options.height, 5.0);
        assert_eq!(options.date_format, "%d\n%b");
        assert!(options.scale_y);
        assert!(options.show_plot);
        assert!(!options.drop_incomplete_rows);

        let blue = options.series.get(SeriesSlot::Blue);
        assert_eq!(blue.column.as_deref(), Some("cash"));
        assert_eq!(blue.color.as_deref(), Some("#1F77B4"));
        assert!(options.series.get(SeriesSlot::Orange).column.is_none());

        assert_eq!(options.footnote.text.as_deref(), Some("backtest 42"));
        assert_eq!(options.footnote.x_pos, 0.5);
        assert_eq!(options.footnote.y_pos, 0.02);
        assert_eq!(options.footnote.color, "#888888");
    }

    #[test]
    fn defaults_apply_to_sparse_config() {
        let adapter = FileConfigAdapter::from_string("[series]\nred = equity\n").unwrap();
        let options = cli::build_plot_options(&adapter).unwrap();
        assert_eq!(options.date_column, "date");
        assert_eq!(options.ylabel, "Algo Values");
        assert_eq!(options.line_style, "-");
        assert_eq!(options.date_format, "%d\n%b");
        assert!(options.start_date.is_none());
        assert!(!options.scale_y);
    }

    #[test]
    fn invalid_series_color_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[series]\nred_color = nope\n").unwrap();
        let err = cli::build_plot_options(&adapter).unwrap_err();
        assert!(matches!(err, PlotError::ConfigInvalid { ref key, .. } if key == "red_color"));
    }

    #[test]
    fn data_path_needs_config_or_override() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let err = cli::resolve_data_path(None, &adapter).unwrap_err();
        assert!(matches!(err, PlotError::ConfigMissing { ref key, .. } if key == "path"));

        let over = PathBuf::from("history.csv");
        assert_eq!(cli::resolve_data_path(Some(&over), &adapter).unwrap(), over);
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        let err = cli::load_config(Path::new("/nonexistent/plot.ini")).unwrap_err();
        assert!(matches!(err, PlotError::ConfigParse { .. }));
    }
}

mod row_mask {
    use super::*;

    #[test]
    fn filter_section_builds_threshold_mask() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        let ds = CsvAdapter::new(csv).load_dataset("date").unwrap();

        let adapter =
            FileConfigAdapter::from_string("[filter]\ncolumn = close\nmin = 0.01\n").unwrap();
        let mask = cli::build_row_mask(&adapter, &ds).unwrap().unwrap();
        let kept = ds.rows().iter().filter(|r| mask.keeps(r)).count();
        assert_eq!(kept, 9);
    }

    #[test]
    fn no_filter_section_means_no_mask() {
        let ds = daily_history(3);
        let adapter = FileConfigAdapter::from_string("[plot]\n").unwrap();
        assert!(cli::build_row_mask(&adapter, &ds).unwrap().is_none());
    }

    #[test]
    fn unknown_filter_column_is_lookup_error() {
        let ds = daily_history(3);
        let adapter =
            FileConfigAdapter::from_string("[filter]\ncolumn = volume\nmin = 1\n").unwrap();
        assert!(cli::build_row_mask(&adapter, &ds).unwrap_err().is_lookup());
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn csv_with_gap_plots_remaining_points() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        let ds = CsvAdapter::new(csv).load_dataset("date").unwrap();

        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let mut options = cli::build_plot_options(&adapter).unwrap();
        options.show_plot = false;

        let env = plot_trading_history(&ds, &options, None, &mut MockRenderPort::new());
        assert!(env.is_success());
        assert_eq!(env.axis_count(), 3);
        let fig = env.figure.unwrap();
        assert_eq!(fig.axes()[0].point_count(), 10);
        assert_eq!(fig.axes()[1].point_count(), 9);
        assert_eq!(fig.axes()[2].point_count(), 10);
        // equity twice shows once
        assert_eq!(fig.legend.as_ref().unwrap().labels(), vec!["equity", "cash"]);
        assert_eq!(fig.title, "Equity vs Cash");
        assert_eq!(
            fig.footnote.unwrap().text.as_deref(),
            Some("backtest 42")
        );
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn plot_writes_svg() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        let ini = write_file(dir.path(), "plot.ini", VALID_INI);
        let out = dir.path().join("charts").join("history.svg");

        let code = run_args(&[
            "plot",
            "--config",
            ini.to_str().unwrap(),
            "--data",
            csv.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);
        assert_eq!(code, ExitCode::SUCCESS);

        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Equity vs Cash"));
        assert!(svg.contains("backtest 42"));
        assert_eq!(svg.matches("class=\"series\"").count(), 3);
        assert_eq!(svg.matches("class=\"legend-label\"").count(), 2);
    }

    #[test]
    fn no_show_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        let ini = write_file(dir.path(), "plot.ini", VALID_INI);
        let out = dir.path().join("history.svg");

        let code = run_args(&[
            "plot",
            "--config",
            ini.to_str().unwrap(),
            "--data",
            csv.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--no-show",
        ]);
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!out.exists());
    }

    #[test]
    fn bad_start_date_override_exits_4() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        let ini = write_file(dir.path(), "plot.ini", VALID_INI);

        let code = run_args(&[
            "plot",
            "--config",
            ini.to_str().unwrap(),
            "--data",
            csv.to_str().unwrap(),
            "--start-date",
            "05/01/2020",
            "--no-show",
        ]);
        assert_eq!(code, ExitCode::from(4));
    }

    #[test]
    fn unknown_series_column_exits_5() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        let ini = write_file(dir.path(), "plot.ini", "[series]\nred = drawdown\n");

        let code = run_args(&[
            "plot",
            "--config",
            ini.to_str().unwrap(),
            "--data",
            csv.to_str().unwrap(),
            "--no-show",
        ]);
        assert_eq!(code, ExitCode::from(5));
    }

    #[test]
    fn malformed_csv_exits_3() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", "date,equity\n01/02/2020,1\n");
        let ini = write_file(dir.path(), "plot.ini", "[series]\nred = equity\n");

        let code = run_args(&[
            "plot",
            "--config",
            ini.to_str().unwrap(),
            "--data",
            csv.to_str().unwrap(),
            "--no-show",
        ]);
        assert_eq!(code, ExitCode::from(3));
    }

    #[test]
    fn text_column_does_not_block_plotting() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(
            dir.path(),
            "history.csv",
            "date,ticker,equity\n\
             2020-01-01 00:00:00,SPY,1\n\
             2020-01-02 00:00:00,SPY,2\n\
             2020-01-03 00:00:00,SPY,3\n",
        );
        let ini = write_file(dir.path(), "plot.ini", "[series]\nred = equity\n");
        let out = dir.path().join("history.svg");

        let code = run_args(&[
            "plot",
            "--config",
            ini.to_str().unwrap(),
            "--data",
            csv.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);
        assert_eq!(code, ExitCode::SUCCESS);
        let svg = std::fs::read_to_string(&out).unwrap();
        assert_eq!(svg.matches("class=\"series\"").count(), 1);
    }

    #[test]
    fn validate_rejects_bad_config_with_2() {
        let dir = TempDir::new().unwrap();
        let ini = write_file(dir.path(), "plot.ini", "[plot]\nheight = -1\n");
        assert_eq!(
            run_args(&["validate", "--config", ini.to_str().unwrap()]),
            ExitCode::from(2)
        );

        let good = write_file(dir.path(), "good.ini", VALID_INI);
        assert_eq!(
            run_args(&["validate", "--config", good.to_str().unwrap()]),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn columns_lists_header() {
        let dir = TempDir::new().unwrap();
        let csv = write_file(dir.path(), "history.csv", HISTORY_CSV);
        assert_eq!(
            run_args(&["columns", "--data", csv.to_str().unwrap()]),
            ExitCode::SUCCESS
        );
        let missing = dir.path().join("missing.csv");
        assert_eq!(
            run_args(&["columns", "--data", missing.to_str().unwrap()]),
            ExitCode::from(3)
        );
    }
}
