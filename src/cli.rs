//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_render_adapter::SvgRenderAdapter;
use crate::domain::config_validation::{normalize_color, unescape_newlines, validate_plot_config};
use crate::domain::dataset::Dataset;
use crate::domain::envelope::ResultEnvelope;
use crate::domain::error::PlotError;
use crate::domain::filter::RowMask;
use crate::domain::options::{FootnoteSpec, PlotOptions};
use crate::domain::plot::plot_trading_history;
use crate::domain::series::{SeriesSlot, SeriesSlots, SlotChoice};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_OUTPUT: &str = "trading_history.svg";

#[derive(Parser, Debug)]
#[command(name = "tradeplot", about = "Plot trading history series on a shared date axis")]
pub struct Cli {
    /// Log pipeline progress at info level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a chart from a CSV dataset
    Plot {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [data] path
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Overrides [plot] output
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overrides [filter] start_date (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        start_date: Option<String>,
        /// Build the chart without writing it
        #[arg(long)]
        no_show: bool,
    },
    /// Validate a plot configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the columns of a CSV dataset
    Columns {
        #[arg(short, long)]
        data: PathBuf,
    },
}

/// Install env_logger; `RUST_LOG` wins over the verbose flag.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Plot {
            config,
            data,
            output,
            start_date,
            no_show,
        } => run_plot(
            &config,
            data.as_ref(),
            output.as_ref(),
            start_date.as_deref(),
            no_show,
            cli.verbose,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Columns { data } => run_columns(&data),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PlotError> {
    FileConfigAdapter::from_file(path).map_err(|e| PlotError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn fail(err: &PlotError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn run_plot(
    config_path: &Path,
    data_override: Option<&PathBuf>,
    output_override: Option<&PathBuf>,
    start_date_override: Option<&str>,
    no_show: bool,
    verbose: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    log::info!("loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    if let Err(e) = validate_plot_config(&adapter) {
        return fail(&e);
    }

    // Stage 2: Build options
    let mut options = match build_plot_options(&adapter) {
        Ok(o) => o,
        Err(e) => return fail(&e),
    };
    if let Some(start) = start_date_override {
        options.start_date = Some(start.to_string());
    }
    if no_show {
        options.show_plot = false;
    }
    options.verbose |= verbose;

    // Stage 3: Load dataset
    let data_path = match resolve_data_path(data_override, &adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let dataset = match CsvAdapter::new(data_path).load_dataset(&options.date_column) {
        Ok(ds) => ds,
        Err(e) => return fail(&e),
    };

    // Stage 4: Row mask
    let mask = match build_row_mask(&adapter, &dataset) {
        Ok(m) => m,
        Err(e) => return fail(&e),
    };

    // Stage 5: Compose and display
    let output = resolve_output_path(output_override, &adapter);
    let mut renderer = SvgRenderAdapter::new(output.clone());
    let envelope = plot_trading_history(&dataset, &options, mask.as_ref(), &mut renderer);
    report(envelope, &options, &output)
}

fn report(envelope: ResultEnvelope, options: &PlotOptions, output: &Path) -> ExitCode {
    let status = envelope.status;
    let axis_count = envelope.axis_count();
    let figure = match envelope.into_result() {
        Ok(f) => f,
        Err(e) => return fail(&e),
    };
    eprintln!(
        "{}: {} series plotted across {} axes",
        status,
        axis_count,
        figure.axes().len()
    );
    if options.show_plot {
        eprintln!("chart written to {}", output.display());
    }
    ExitCode::SUCCESS
}

pub fn build_plot_options(adapter: &dyn ConfigPort) -> Result<PlotOptions, PlotError> {
    let defaults = PlotOptions::default();

    let mut series = SeriesSlots::default();
    for slot in SeriesSlot::ALL {
        let color_key = format!("{}_color", slot.name());
        *series.get_mut(slot) = SlotChoice {
            column: adapter.get_non_empty("series", slot.name()),
            color: adapter
                .get_non_empty("series", &color_key)
                .map(|c| {
                    normalize_color(&c).ok_or_else(|| PlotError::ConfigInvalid {
                        section: "series".into(),
                        key: color_key.clone(),
                        reason: format!("invalid color {c:?}"),
                    })
                })
                .transpose()?,
        };
    }

    let footnote_defaults = FootnoteSpec::default();
    let footnote = FootnoteSpec {
        text: adapter.get_non_empty("footnote", "text"),
        x_pos: adapter.get_double("footnote", "xpos", footnote_defaults.x_pos),
        y_pos: adapter.get_double("footnote", "ypos", footnote_defaults.y_pos),
        color: adapter
            .get_non_empty("footnote", "color")
            .and_then(|c| normalize_color(&c))
            .unwrap_or(footnote_defaults.color),
        font_size: adapter.get_double("footnote", "fontsize", footnote_defaults.font_size),
    };

    Ok(PlotOptions {
        title: adapter.get_string("plot", "title").unwrap_or_default(),
        series,
        date_column: adapter
            .get_non_empty("data", "date_column")
            .unwrap_or(defaults.date_column),
        xlabel: adapter.get_string("plot", "xlabel").unwrap_or(defaults.xlabel),
        ylabel: adapter.get_string("plot", "ylabel").unwrap_or(defaults.ylabel),
        line_style: adapter
            .get_non_empty("plot", "linestyle")
            .unwrap_or(defaults.line_style),
        width: adapter.get_double("plot", "width", defaults.width),
        height: adapter.get_double("plot", "height", defaults.height),
        date_format: adapter
            .get_non_empty("plot", "date_format")
            .map(|f| unescape_newlines(&f))
            .unwrap_or(defaults.date_format),
        start_date: adapter.get_non_empty("filter", "start_date"),
        footnote,
        scale_y: adapter.get_bool("plot", "scale_y", defaults.scale_y),
        show_plot: adapter.get_bool("plot", "show_plot", defaults.show_plot),
        drop_incomplete_rows: adapter.get_bool(
            "plot",
            "dropna_for_all",
            defaults.drop_incomplete_rows,
        ),
        verbose: adapter.get_bool("plot", "verbose", defaults.verbose),
    })
}

/// `[filter] column` / `min` select rows where `column > min`.
pub fn build_row_mask(
    adapter: &dyn ConfigPort,
    dataset: &Dataset,
) -> Result<Option<RowMask>, PlotError> {
    let Some(column) = adapter.get_non_empty("filter", "column") else {
        return Ok(None);
    };
    let min = adapter
        .get_non_empty("filter", "min")
        .ok_or_else(|| PlotError::ConfigMissing {
            section: "filter".into(),
            key: "min".into(),
        })?
        .parse::<f64>()
        .map_err(|e| PlotError::ConfigInvalid {
            section: "filter".into(),
            key: "min".into(),
            reason: e.to_string(),
        })?;
    RowMask::above(dataset, &column, min).map(Some)
}

pub fn resolve_data_path(
    data_override: Option<&PathBuf>,
    adapter: &dyn ConfigPort,
) -> Result<PathBuf, PlotError> {
    if let Some(path) = data_override {
        return Ok(path.clone());
    }
    adapter
        .get_non_empty("data", "path")
        .map(PathBuf::from)
        .ok_or_else(|| PlotError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

pub fn resolve_output_path(output_override: Option<&PathBuf>, adapter: &dyn ConfigPort) -> PathBuf {
    output_override
        .cloned()
        .or_else(|| adapter.get_non_empty("plot", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating plot config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    if let Err(e) = validate_plot_config(&adapter) {
        return fail(&e);
    }
    let options = match build_plot_options(&adapter) {
        Ok(o) => o,
        Err(e) => return fail(&e),
    };

    eprintln!("\nSeries:");
    for slot in SeriesSlot::ALL {
        if let Some(column) = &options.series.get(slot).column {
            let color = options
                .series
                .get(slot)
                .color
                .as_deref()
                .unwrap_or(slot.default_color());
            eprintln!("  {:<7} {} ({})", slot.name(), column, color);
        }
    }
    if let Some(start) = &options.start_date {
        eprintln!("\nStart date: {}", start);
    }
    eprintln!("\nConfiguration is valid");
    ExitCode::SUCCESS
}

fn run_columns(data_path: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_path.to_path_buf());
    match adapter.list_columns() {
        Ok(columns) => {
            for column in &columns {
                println!("{}", column);
            }
            eprintln!("{} columns found", columns.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
